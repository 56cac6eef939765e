use thiserror::Error;

/// Errors from the fallible edges of the crate: configuration parsing and
/// the CLI's input handling. The two core normalize operations are total
/// and never return one of these.
#[derive(Error, Debug)]
pub enum NormalizerError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, NormalizerError>;
