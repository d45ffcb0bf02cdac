use std::env;
use std::path::PathBuf;

use crate::env_or;

/// Upload location for assignment documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub base_url: String,
    pub max_bytes: usize,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            upload_dir: PathBuf::from(
                env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            ),
            base_url: env::var("UPLOAD_BASE_URL").unwrap_or_else(|_| "/uploads".to_string()),
            max_bytes: env_or("UPLOAD_MAX_BYTES", 10 * 1024 * 1024),
        }
    }
}
