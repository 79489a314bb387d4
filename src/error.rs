//! Error type shared by the loaders, the solver facade and the CLI.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid input size: need at least 2 points, got {0}")]
    InvalidInputSize(usize),
    #[error("invalid iteration count: need at least 1 trial, got {0}")]
    InvalidIterations(usize),
    #[error("invalid point {index}: coordinates must be finite")]
    InvalidPoint { index: usize },
    #[error("invalid tour: {0}")]
    InvalidTour(String),
    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_tour(message: impl Into<String>) -> Self {
        Self::InvalidTour(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
