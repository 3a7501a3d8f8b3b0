//! TACO to YOLO format converter
//!
//! This library converts COCO-style TACO litter annotations into a YOLO
//! detection dataset: normalized label files, a seeded train/val split and a
//! `data.yaml` manifest.

pub mod categories;
pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod io;
pub mod resolver;
pub mod types;
pub mod utils;
pub mod yolo_dataset;

// Re-export commonly used types and functions
pub use config::Args;
pub use error::ConvertError;
pub use resolver::ImageResolver;
pub use types::{
    AnnotationIndex, ConversionReport, LabelSpace, NormalizedBox, OutputDirs, ProcessingStats,
    SplitData, StagedImage,
};
pub use yolo_dataset::{convert_index, process_dataset};
