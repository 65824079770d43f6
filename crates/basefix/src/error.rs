use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FixError>;

#[derive(Debug, Error)]
pub enum FixError {
    #[error("Log file not found: {}", .0.display())]
    LogNotFound(PathBuf),

    #[error("Failed to read log {}: {source}", path.display())]
    ReadLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read fixture {}: {source}", path.display())]
    ReadFixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write fixture {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid anchor segment: {0:?}")]
    InvalidAnchor(String),
}
