use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use taco2yolo::{process_dataset, Args};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let dirname = PathBuf::from(&args.data_dir);
    if !dirname.exists() {
        error!("The specified data_dir does not exist: {}", args.data_dir);
        return ExitCode::FAILURE;
    }
    let annotations_path = args.annotations_path();
    if !annotations_path.is_file() {
        error!(
            "The annotation file does not exist: {}",
            annotations_path.display()
        );
        return ExitCode::FAILURE;
    }

    info!("Starting the conversion process...");

    match process_dataset(&args) {
        Ok(report) => {
            info!(
                "Images kept: {}, skipped: {}",
                report.stats.images_kept, report.stats.skipped_missing_image
            );
            info!("Number of labels: {}", report.num_labels);
            info!("Dataset ready: {}", report.manifest_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to process dataset: {}", e);
            ExitCode::FAILURE
        }
    }
}
