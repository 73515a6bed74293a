//! Content store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for content store operations.
pub type ContentResult<T> = Result<T, ContentError>;

/// Errors raised while enumerating a build directory.
#[derive(Error, Debug)]
pub enum ContentError {
    /// The root does not exist or is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// An entry could not be read.
    #[error("failed to read {}: {message}", .path.display())]
    Walk { path: PathBuf, message: String },

    /// A file name is not valid UTF-8 and cannot become an object key.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}

impl From<walkdir::Error> for ContentError {
    fn from(e: walkdir::Error) -> Self {
        ContentError::Walk {
            path: e.path().map(|p| p.to_path_buf()).unwrap_or_default(),
            message: e.to_string(),
        }
    }
}
