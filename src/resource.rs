use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

/// URI under which the readme is served
pub const README_URI: &str = "mcpreadme://";

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Error: {0} file not found")]
    NotFound(String),

    #[error("Error reading file: {0}")]
    Read(#[from] std::io::Error),
}

/// A local file read fresh on every request
#[derive(Debug, Clone)]
pub struct ReadmeResource {
    path: PathBuf,
}

impl ReadmeResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn display_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or(self.path.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Read the whole file as UTF-8. Relative paths resolve against the current directory.
    pub async fn read(&self) -> Result<String, ResourceError> {
        // An uninspectable path (e.g. permission denied) is a read error, not a missing file
        if !tokio::fs::try_exists(&self.path).await? {
            return Err(ResourceError::NotFound(self.display_name()));
        }
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    /// Contents, or a message describing why they could not be read
    pub async fn read_text(&self) -> String {
        match self.read().await {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "resource read failed");
                e.to_string()
            }
        }
    }
}
