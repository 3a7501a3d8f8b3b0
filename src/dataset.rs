use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;

use crate::types::{OutputDirs, SplitData, StagedImage};

/// Split the staged images into training and validation sets.
///
/// The list is sorted by stem before shuffling so the result only depends on the
/// random source and the set of staged images, never on directory listing order.
/// The first `floor(len * train_ratio)` shuffled images form the training set.
pub fn split_dataset<R: Rng + ?Sized>(
    mut staged: Vec<StagedImage>,
    train_ratio: f64,
    rng: &mut R,
) -> SplitData {
    staged.sort_by(|a, b| a.stem.cmp(&b.stem));
    staged.shuffle(rng);

    let train_len = ((staged.len() as f64 * train_ratio) as usize).min(staged.len());
    let val = staged.split_off(train_len);

    SplitData { train: staged, val }
}

/// Move every staged image and label into its split directory.
pub fn move_split(split_data: &SplitData, output_dirs: &OutputDirs) -> std::io::Result<()> {
    let targets = [
        (
            &split_data.train,
            &output_dirs.train_images_dir,
            &output_dirs.train_labels_dir,
        ),
        (
            &split_data.val,
            &output_dirs.val_images_dir,
            &output_dirs.val_labels_dir,
        ),
    ];

    for (members, images_dir, labels_dir) in targets {
        for staged in members {
            fs::rename(
                output_dirs.staging_images_dir.join(&staged.image_file),
                images_dir.join(&staged.image_file),
            )?;
            fs::rename(
                output_dirs.staging_labels_dir.join(staged.label_file()),
                labels_dir.join(staged.label_file()),
            )?;
        }
    }
    Ok(())
}

/// Remove the staging directories if they are empty. Failures are ignored.
pub fn cleanup_staging(output_dirs: &OutputDirs) {
    for dir in [&output_dirs.staging_images_dir, &output_dirs.staging_labels_dir] {
        if let Err(e) = fs::remove_dir(dir) {
            log::debug!("Leaving staging directory {:?} in place: {}", dir, e);
        }
    }
}
