use kalenda_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("no pattern for request: {0}")]
    MissingPattern(String),
    #[error("invalid locale data: {0}")]
    InvalidData(String),
    #[error("numbering system `{0}` does not define ten digits")]
    InvalidDigits(String),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
