use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

// The image entry of a COCO-style annotation document
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ImageRecord {
    pub id: u32,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl ImageRecord {
    /// Width and height recorded in the document, if both are present and non-zero.
    pub fn recorded_size(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CategoryRecord {
    pub id: u32,
    pub name: String,
}

// The annotation entry; bbox is [x_min, y_min, width, height] in pixels
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnnotationRecord {
    pub image_id: u32,
    pub category_id: u32,
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
}

/// The three top-level collections of the annotation document.
///
/// Any other top-level keys (`info`, `licenses`, `scene_annotations`, ...) are ignored.
#[derive(Debug, Deserialize, Clone)]
pub struct AnnotationDocument {
    pub images: Vec<ImageRecord>,
    pub annotations: Vec<AnnotationRecord>,
    pub categories: Vec<CategoryRecord>,
}

/// In-memory indices built from an [`AnnotationDocument`].
#[derive(Debug, Clone, Default)]
pub struct AnnotationIndex {
    pub images: BTreeMap<u32, ImageRecord>,
    pub categories: BTreeMap<u32, String>,
    pub annotations: Vec<AnnotationRecord>,
}

impl AnnotationIndex {
    pub fn from_document(document: AnnotationDocument) -> Self {
        let mut images = BTreeMap::new();
        for image in document.images {
            if let Some(previous) = images.insert(image.id, image) {
                log::warn!("Duplicate image id {}, keeping the last entry", previous.id);
            }
        }

        let mut categories = BTreeMap::new();
        for category in document.categories {
            if let Some(previous) = categories.insert(category.id, category.name) {
                log::warn!(
                    "Duplicate category id {} ({}), keeping the last entry",
                    category.id,
                    previous
                );
            }
        }

        Self {
            images,
            categories,
            annotations: document.annotations,
        }
    }
}

/// Dense label space: original category id -> class index in `[0, names.len())`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelSpace {
    pub remap: HashMap<u32, usize>,
    pub names: Vec<String>,
}

impl LabelSpace {
    pub fn class_id(&self, category_id: u32) -> Option<usize> {
        self.remap.get(&category_id).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A bounding box in YOLO form, every component in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedBox {
    pub fn to_label_line(&self, class_id: usize) -> String {
        format!(
            "{} {:.6} {:.6} {:.6} {:.6}",
            class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

/// An image/label pair sitting in the staging area.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StagedImage {
    /// Zero-padded image id shared by the image and its label file
    pub stem: String,
    pub image_file: String,
}

impl StagedImage {
    pub fn label_file(&self) -> String {
        format!("{}.txt", self.stem)
    }
}

// Struct to hold the paths to the output directories
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub root: PathBuf,
    pub staging_images_dir: PathBuf,
    pub staging_labels_dir: PathBuf,
    pub train_images_dir: PathBuf,
    pub val_images_dir: PathBuf,
    pub train_labels_dir: PathBuf,
    pub val_labels_dir: PathBuf,
}

// Struct to hold the train/val partition of the staged images
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitData {
    pub train: Vec<StagedImage>,
    pub val: Vec<StagedImage>,
}

// Struct to hold processing statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProcessingStats {
    pub images_kept: usize,
    pub skipped_missing_image: usize,
    pub skipped_no_file_name: usize,
    pub excluded_background: usize,
    pub boxes_written: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_kept(&mut self) {
        self.images_kept += 1;
    }

    pub fn increment_skipped_missing_image(&mut self) {
        self.skipped_missing_image += 1;
    }

    pub fn increment_skipped_no_file_name(&mut self) {
        self.skipped_no_file_name += 1;
    }

    pub fn increment_excluded_background(&mut self) {
        self.excluded_background += 1;
    }

    pub fn add_boxes(&mut self, count: usize) {
        self.boxes_written += count;
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Images kept: {}", self.images_kept);
        log::info!(
            "Skipped (image file not found): {}",
            self.skipped_missing_image
        );
        log::info!("Boxes written: {}", self.boxes_written);

        if self.skipped_no_file_name > 0 {
            log::warn!(
                "Skipped (no file name in annotations): {}",
                self.skipped_no_file_name
            );
        }
        if self.excluded_background > 0 {
            log::info!("Excluded background images: {}", self.excluded_background);
        }
    }
}

/// What a run produced, handed back to the caller.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub stats: ProcessingStats,
    pub num_labels: usize,
    pub train: usize,
    pub val: usize,
    pub manifest_path: PathBuf,
}
