use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from terminal or filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// The browser could not be opened at any start directory.
    #[error("Cannot open start directory: {0}")]
    Navigation(#[from] NavigationError),
}

/// A directory could not be enumerated.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("{} does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("failed to read directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ListingError {
    /// Classify an I/O error raised while reading `path`.
    pub fn from_io(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => ListingError::NotFound { path },
            io::ErrorKind::PermissionDenied => ListingError::PermissionDenied { path },
            _ => ListingError::Io { path, source },
        }
    }
}

/// A user-initiated navigation failed. State stays at its prior position.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("cannot resolve {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Listing(#[from] ListingError),
}

/// Opening a file in an external program failed.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("no program could open {}", path.display())]
    NoProgram { path: PathBuf },
}
