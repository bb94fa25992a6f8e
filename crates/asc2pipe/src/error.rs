//! Errors raised while converting a `.hdr` + `.asc` pair.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AscError {
    #[error("filename should end in \".asc\": {}", path.display())]
    Naming { path: PathBuf },

    #[error("unsupported dimension count {dims}: only 1D and 2D files can be handled")]
    Unsupported { dims: i64 },

    #[error(
        "{}:{line}: invalid column count, expected {expected} got {found}",
        path.display()
    )]
    InvalidFormat {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("header field `{field}` is missing")]
    MissingField { field: String },

    #[error("header field `{field}` is invalid: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("{}:{line}: `{token}` is not a number", path.display())]
    InvalidNumber {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error(
        "{}:{line}: more data rows than the declared shape holds ({capacity})",
        path.display()
    )]
    ShapeOverflow {
        path: PathBuf,
        line: usize,
        capacity: usize,
    },

    #[error("{}: expected {expected} data rows, found {found}", path.display())]
    Truncated {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error(
        "{}:{line}: row coordinate {found} does not continue row {row} (coordinate {expected})",
        path.display()
    )]
    IndexMismatch {
        path: PathBuf,
        line: usize,
        row: usize,
        expected: f64,
        found: f64,
    },

    #[error("states interleave needs an even row count, got {rows}")]
    Layout { rows: usize },
}

impl AscError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AscError::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        AscError::MissingField {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        AscError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AscError>;
