use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Convenience result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Error type returned by every loader in this crate.
///
/// Variants are grouped into a small taxonomy by [`LoadError::kind`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The path does not exist or could not be read.
    #[error("not found or unreadable: {path}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A line of line-delimited JSON is not a valid JSON object.
    #[error("failed to parse json at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The Parquet reader rejected the file (corrupt footer, unsupported encoding, bad page).
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The input is not in a layout this crate can decode (e.g. a corrupt compressed stream).
    #[error("invalid format: {message}")]
    Format { message: String },

    /// Read failure from a caller-supplied reader.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The requested format/compression combination or pattern cannot be honored.
    #[error("invalid load options: {message}")]
    InvalidOptions { message: String },
}

/// Coarse classification of a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadErrorKind {
    NotFound,
    Parse,
    Format,
    Io,
    InvalidOptions,
}

impl LoadError {
    pub(crate) fn not_found(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::NotFound {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }

    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            Self::NotFound { .. } => LoadErrorKind::NotFound,
            Self::Parse { .. } => LoadErrorKind::Parse,
            Self::Parquet(_) | Self::Format { .. } => LoadErrorKind::Format,
            Self::Io(_) => LoadErrorKind::Io,
            Self::InvalidOptions { .. } => LoadErrorKind::InvalidOptions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadError, LoadErrorKind};

    #[test]
    fn kind_groups_parquet_and_format_errors() {
        let pq = LoadError::Parquet(parquet::errors::ParquetError::General("bad footer".into()));
        let fmt = LoadError::Format {
            message: "truncated zstd frame".to_string(),
        };
        assert_eq!(pq.kind(), LoadErrorKind::Format);
        assert_eq!(fmt.kind(), LoadErrorKind::Format);
    }

    #[test]
    fn not_found_message_names_the_path() {
        let err = LoadError::not_found(
            "data/IpawsArchivedAlerts_2025_001.jsonl",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert_eq!(err.kind(), LoadErrorKind::NotFound);
        assert!(err.to_string().contains("IpawsArchivedAlerts_2025_001.jsonl"));
    }
}
