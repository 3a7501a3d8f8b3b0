use glob::{glob, Pattern};
use std::path::{Path, PathBuf};

use crate::error::ConvertError;

/// Locates source images under the dataset root.
///
/// TACO records `file_name` as `batch_N/xxx.jpg`, but some exports only keep the
/// bare file name, so a lookup across `batch_*` directories is used as fallback.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    data_dir: PathBuf,
}

impl ImageResolver {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolve a recorded relative path to an existing file.
    pub fn resolve(&self, recorded_path: &str) -> Result<PathBuf, ConvertError> {
        let candidate = self.data_dir.join(recorded_path);
        if candidate.is_file() {
            return Ok(candidate);
        }

        self.find_in_batches(recorded_path)
            .ok_or_else(|| ConvertError::ImageNotFound {
                file_name: recorded_path.to_string(),
            })
    }

    // First `batch_*/<basename>` match in lexical order
    fn find_in_batches(&self, recorded_path: &str) -> Option<PathBuf> {
        let base_name = Path::new(recorded_path).file_name()?.to_str()?;
        let pattern = format!(
            "{}/batch_*/{}",
            Pattern::escape(&self.data_dir.to_string_lossy()),
            Pattern::escape(base_name)
        );

        let entries = match glob(&pattern) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Invalid search pattern {}: {}", pattern, e);
                return None;
            }
        };

        let mut hits: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect();
        hits.sort();
        hits.into_iter().next()
    }
}
