//! JSON file token store

use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;

use super::ServerDetails;
use super::TokenStore;
use crate::error::StoreError;
use crate::fs;

/// Default file name of the stored server details inside the config directory.
pub const SERVER_DETAILS_FILE: &str = "server_details.json";

/// A token store backed by a single JSON file.
///
/// Writes go through a temp file and a rename, so a crash mid-write leaves
/// the previous file intact. On Unix the file is readable by the owner only.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store that reads and writes `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store for [`SERVER_DETAILS_FILE`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SERVER_DETAILS_FILE))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn save(&self, details: &ServerDetails) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(details).map_err(StoreError::Serialize)?;
        fs::write_private(&self.path, &json)
            .await
            .map_err(|e| self.io_error(e))?;

        log::info!("Saved server details to {}", self.path.display());
        Ok(())
    }

    async fn load(&self) -> Result<Option<ServerDetails>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let details = serde_json::from_str(&contents).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(details))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                log::info!("Removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
