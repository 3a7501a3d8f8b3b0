use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

/// Command-line arguments for converting TACO annotations to a YOLO dataset.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Directory containing the images and `batch_*` subdirectories
    #[arg(short = 'd', long = "data_dir")]
    pub data_dir: String,

    /// COCO-style annotation file, defaults to `<data_dir>/annotations.json`
    #[arg(short = 'a', long = "annotations")]
    pub annotations: Option<String>,

    /// Output directory, defaults to `<data_dir>/YOLODataset`
    #[arg(short = 'o', long = "output_dir")]
    pub output_dir: Option<String>,

    /// Proportion of the dataset to use for training
    #[arg(long = "train_ratio", default_value_t = 0.8, value_parser = validate_ratio)]
    pub train_ratio: f64,

    /// Seed for random shuffling
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,

    /// Keep only the K most frequently annotated categories
    #[arg(long = "top_k", value_parser = validate_top_k)]
    pub top_k: Option<usize>,

    /// Drop images that have no annotations instead of keeping them as background
    #[arg(long = "exclude_background")]
    pub exclude_background: bool,
}

impl Args {
    pub fn annotations_path(&self) -> PathBuf {
        match &self.annotations {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.data_dir).join("annotations.json"),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        match &self.output_dir {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.data_dir).join("YOLODataset"),
        }
    }
}

// Validate that the ratio is between 0.0 and 1.0
pub fn validate_ratio(s: &str) -> Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if (0.0..=1.0).contains(&val) => Ok(val),
        _ => Err("RATIO must be between 0.0 and 1.0".to_string()),
    }
}

pub fn validate_top_k(s: &str) -> Result<usize, String> {
    match usize::from_str(s) {
        Ok(val) if val >= 1 => Ok(val),
        _ => Err("TOP_K must be a positive integer".to_string()),
    }
}
