//! Error types surfaced by [`Image`](crate::handle::Image).

use crate::imaging::BackendError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    /// `READ` was requested and the backend could not load the file.
    #[error("The file {} couldn't be found/read!", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    /// `WRITE` was requested, nothing was loaded, and allocation failed.
    #[error("The allocation for the image {} failed.", .path.display())]
    AllocationFailed {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("There was an attempt to edit a read-only image!")]
    ReadOnly,
    #[error("There was an attempt to read a write-only image!")]
    WriteOnly,
}

/// Result type for image handle operations.
pub type Result<T> = std::result::Result<T, ImageError>;
