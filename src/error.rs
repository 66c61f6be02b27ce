use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures of a filtering run. There is no partial success: either
/// both filtered outputs are produced from a consistent index, or the run
/// aborts and the dataset directory is left untouched.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The alignment input could not be decoded into triples. A partially
    /// built index would silently drop real entities from the outputs, so
    /// this aborts before any filtering begins.
    #[error("malformed alignment file {path}: {message}")]
    MalformedAlignment { path: PathBuf, message: String },

    /// An expected dataset input file is missing.
    #[error("dataset file not found: {path}")]
    DatasetNotFound { path: PathBuf },

    /// A read or write failed, reported with the offending path and operation.
    #[error("failed to {op} {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FilterError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
