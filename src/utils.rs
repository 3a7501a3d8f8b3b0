use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::types::{AnnotationDocument, AnnotationIndex};

/// Read and parse the COCO-style annotation document.
///
/// Parses directly from a buffered file stream instead of loading the whole
/// file into memory first.
pub fn load_annotation_document(path: &Path) -> Result<AnnotationDocument, ConvertError> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|source| ConvertError::DataFormat {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the annotation document and index it by id.
pub fn load_annotation_index(path: &Path) -> Result<AnnotationIndex, ConvertError> {
    let document = load_annotation_document(path)?;
    log::info!(
        "Loaded {} images, {} annotations, {} categories from {}",
        document.images.len(),
        document.annotations.len(),
        document.categories.len(),
        path.display()
    );
    Ok(AnnotationIndex::from_document(document))
}

/// Read image width and height from the file header
pub fn read_image_dimensions(path: &Path) -> Result<(u32, u32), ConvertError> {
    let size = imagesize::size(path).map_err(|source| ConvertError::ImageDimensions {
        path: path.to_path_buf(),
        source,
    })?;
    // Saturate oversized header values
    let width = u32::try_from(size.width).unwrap_or(u32::MAX);
    let height = u32::try_from(size.height).unwrap_or(u32::MAX);
    Ok((width, height))
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .progress_chars("#>-"),
    );
    pb
}

/// Create an output directory if it does not exist yet and return its path.
///
/// Existing contents are left alone; output from a failed run has to be removed by hand.
pub fn create_output_directory(path: &Path) -> std::io::Result<PathBuf> {
    if path.exists() {
        log::debug!("Reusing existing directory {:?}", path);
    } else {
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}
