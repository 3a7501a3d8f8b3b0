use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while converting a TACO dataset.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The annotation document is not valid JSON or misses a required collection.
    #[error("malformed annotation document {}: {source}", path.display())]
    DataFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No file matching the recorded path exists under the data directory.
    #[error("image not found: {file_name}")]
    ImageNotFound { file_name: String },

    #[error("failed to read image dimensions from {}: {source}", path.display())]
    ImageDimensions {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
