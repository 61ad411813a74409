use thiserror::Error;

/// Top-level failure taxonomy for the engine and its adapters.
///
/// Only [`TimetableError::Structural`] aborts a run; input rows that fail
/// to parse are reported through [`TimetableError::InputRejected`] and
/// skipped by the loader rather than propagated as a hard error.
#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("row {row} rejected: {reason}")]
    InputRejected { row: usize, reason: String },

    #[error("structural failure: {detail}")]
    Structural { detail: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TimetableError>;

/// One input row the loader could not parse, kept for the CLI's end-of-run
/// summary instead of being raised as an error.
#[derive(Debug, Clone)]
pub struct RejectedRow {
    pub row: usize,
    pub reason: String,
}
