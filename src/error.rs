//! Error type shared by the ordering library and the command line tool.

use thiserror::Error as ThisError;

use crate::shp::PathShape;

#[derive(Debug, ThisError)]
pub enum OrderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("index {index} appears more than once in a renumbering")]
    DuplicateIndex { index: usize },
    #[error("{solver} does not implement the {shape:?} path shape")]
    Unsupported { solver: String, shape: PathShape },
    #[error("best path never set; the upper limit {limit} may be too low")]
    UpperLimitTooLow { limit: f64 },
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, OrderError>;

impl OrderError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath(message.into())
    }

    pub fn unsupported(solver: &str, shape: PathShape) -> Self {
        Self::Unsupported {
            solver: solver.to_string(),
            shape,
        }
    }

    /// True when retrying with a larger upper limit may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpperLimitTooLow { .. })
    }
}
