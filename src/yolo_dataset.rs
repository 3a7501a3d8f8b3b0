use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

use crate::categories::{group_by_image, select_categories};
use crate::config::Args;
use crate::conversion::{convert_annotations, render_label_file};
use crate::dataset::{cleanup_staging, move_split, split_dataset};
use crate::error::ConvertError;
use crate::io::{create_dataset_yaml, setup_output_directories, stage_image};
use crate::resolver::ImageResolver;
use crate::types::{AnnotationIndex, ConversionReport, ProcessingStats, StagedImage};
use crate::utils::{create_progress_bar, load_annotation_index, read_image_dimensions};

/// Main dataset conversion pipeline.
///
/// Loads the annotation document, selects categories, stages every resolvable
/// image with its label file, splits the staged set and writes `data.yaml`.
/// The annotation document is fully parsed before any output is created.
pub fn process_dataset(args: &Args) -> Result<ConversionReport, ConvertError> {
    let annotations_path = args.annotations_path();
    info!("Reading annotations from {}", annotations_path.display());
    let index = load_annotation_index(&annotations_path)?;

    let resolver = ImageResolver::new(&args.data_dir);
    let mut rng = StdRng::seed_from_u64(args.seed);
    convert_index(&index, args, &resolver, &args.output_path(), &mut rng)
}

/// Convert an already loaded annotation index into a YOLO dataset at `output_root`.
pub fn convert_index<R: Rng + ?Sized>(
    index: &AnnotationIndex,
    args: &Args,
    resolver: &ImageResolver,
    output_root: &Path,
    rng: &mut R,
) -> Result<ConversionReport, ConvertError> {
    let label_space = select_categories(&index.categories, &index.annotations, args.top_k);
    info!("Selected {} categories.", label_space.len());
    let by_image = group_by_image(&index.annotations, &label_space);

    let output_dirs = setup_output_directories(output_root)?;
    let mut stats = ProcessingStats::new();
    let mut staged: Vec<StagedImage> = Vec::with_capacity(index.images.len());

    let pb = create_progress_bar(index.images.len() as u64, "Convert");
    for (&image_id, image) in &index.images {
        pb.inc(1);

        if image.file_name.is_empty() {
            warn!("Image {} has no file name, skipping", image_id);
            stats.increment_skipped_no_file_name();
            continue;
        }

        let annotations = by_image.get(&image_id).map(Vec::as_slice).unwrap_or(&[]);
        if annotations.is_empty() && args.exclude_background {
            stats.increment_excluded_background();
            continue;
        }

        let source = match resolver.resolve(&image.file_name) {
            Ok(source) => source,
            Err(ConvertError::ImageNotFound { file_name }) => {
                warn!("Image file not found, skipping: {}", file_name);
                stats.increment_skipped_missing_image();
                continue;
            }
            Err(e) => return Err(e),
        };

        let (width, height) = match image.recorded_size() {
            Some(size) => size,
            None => read_image_dimensions(&source)?,
        };

        let lines = convert_annotations(annotations, &label_space, width, height);
        stats.add_boxes(lines.len());
        staged.push(stage_image(
            &output_dirs,
            image_id,
            &source,
            &render_label_file(&lines),
        )?);
        stats.increment_kept();
    }
    pb.finish_with_message("Conversion complete");
    stats.print_summary();

    let split_data = split_dataset(staged, args.train_ratio, rng);
    info!(
        "Split into {} train and {} val images.",
        split_data.train.len(),
        split_data.val.len()
    );
    move_split(&split_data, &output_dirs)?;
    cleanup_staging(&output_dirs);

    info!("Creating data.yaml file...");
    let manifest_path = create_dataset_yaml(&output_dirs.root, &label_space.names)?;

    Ok(ConversionReport {
        stats,
        num_labels: label_space.len(),
        train: split_data.train.len(),
        val: split_data.val.len(),
        manifest_path,
    })
}
