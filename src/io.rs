use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::types::{OutputDirs, StagedImage};
use crate::utils::create_output_directory;

pub const STAGING_IMAGES_DIR: &str = "images_all";
pub const STAGING_LABELS_DIR: &str = "labels_all";
pub const MANIFEST_FILE: &str = "data.yaml";

/// Set up the directory structure for YOLO dataset output
pub fn setup_output_directories(output_root: &Path) -> std::io::Result<OutputDirs> {
    let root = create_output_directory(output_root)?;
    let staging_images_dir = create_output_directory(&root.join(STAGING_IMAGES_DIR))?;
    let staging_labels_dir = create_output_directory(&root.join(STAGING_LABELS_DIR))?;

    let images_dir = root.join("images");
    let labels_dir = root.join("labels");
    let train_images_dir = create_output_directory(&images_dir.join("train"))?;
    let val_images_dir = create_output_directory(&images_dir.join("val"))?;
    let train_labels_dir = create_output_directory(&labels_dir.join("train"))?;
    let val_labels_dir = create_output_directory(&labels_dir.join("val"))?;

    Ok(OutputDirs {
        root,
        staging_images_dir,
        staging_labels_dir,
        train_images_dir,
        val_images_dir,
        train_labels_dir,
        val_labels_dir,
    })
}

/// Name used for an image in the output tree: the zero-padded image id.
pub fn staged_stem(image_id: u32) -> String {
    format!("{:08}", image_id)
}

/// Copy a source image into the staging area and write its label file next to it.
pub fn stage_image(
    output_dirs: &OutputDirs,
    image_id: u32,
    source: &Path,
    label_contents: &str,
) -> std::io::Result<StagedImage> {
    let stem = staged_stem(image_id);
    let image_file = match source.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{}.{}", stem, ext.to_lowercase()),
        None => stem.clone(),
    };

    fs::copy(source, output_dirs.staging_images_dir.join(&image_file))?;

    let staged = StagedImage { stem, image_file };
    let label_path = output_dirs.staging_labels_dir.join(staged.label_file());
    let mut writer = BufWriter::new(File::create(&label_path)?);
    writer.write_all(label_contents.as_bytes())?;
    writer.flush()?;

    Ok(staged)
}

/// Create the data.yaml manifest for YOLO training
pub fn create_dataset_yaml(output_root: &Path, names: &[String]) -> std::io::Result<PathBuf> {
    let dataset_yaml_path = output_root.join(MANIFEST_FILE);
    let absolute_path = fs::canonicalize(output_root)?;

    let mut yaml_content = format!(
        "path: {}\ntrain: images/train\nval: images/val\n",
        absolute_path.to_string_lossy()
    );
    yaml_content.push_str("\nnames:\n");
    for (id, name) in names.iter().enumerate() {
        yaml_content.push_str(&format!("  {}: {}\n", id, name));
    }

    let mut dataset_yaml = BufWriter::new(File::create(&dataset_yaml_path)?);
    dataset_yaml.write_all(yaml_content.as_bytes())?;
    dataset_yaml.flush()?;
    Ok(dataset_yaml_path)
}
