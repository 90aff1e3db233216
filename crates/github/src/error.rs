use std::{io, path::PathBuf};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No artifact named '{name}' found for workflow run {run_id}")]
    ArtifactNotFound { run_id: u64, name: String },
    #[error("GitHub request failed: {operation}")]
    RemoteService {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
    #[error("Malformed pull request number {value:?} in {}", .path.display())]
    MalformedPrNumber { path: PathBuf, value: String },
    #[error("Failed to read {}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write {}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to extract artifact archive")]
    Archive(#[from] zip::result::ZipError),
}

impl Error {
    /// Wraps a failed call to the remote service.
    pub fn remote<E: Into<BoxError>>(operation: &'static str) -> impl FnOnce(E) -> Self {
        move |e| Self::RemoteService { operation, source: e.into() }
    }

    pub fn read(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::FileRead { path, source }
    }

    pub fn write(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::FileWrite { path, source }
    }
}
