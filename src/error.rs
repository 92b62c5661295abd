//! Errors raised while loading observations and producing diagrams.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindRoseError {
    #[error("'{}' not found", path.display())]
    MissingInputFile { path: PathBuf },

    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("invalid direction {token:?} at line {line}")]
    InvalidDirection { token: String, line: usize },

    #[error("unsupported statistic {0:?}")]
    UnsupportedStatistic(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = WindRoseError> = std::result::Result<T, E>;
