use core::fmt;

use crate::store::DataPath;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// The pattern requests a field this engine never implements.
    UnsupportedField(char),
    /// A required locale fragment is not present in the loaded data.
    MissingData(DataPath),
    /// Input text stopped matching the pattern at this byte offset.
    ParseMismatch(usize),
    InvalidInput(&'static str),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::UnsupportedField(chr) => write!(f, "unsupported pattern field `{chr}`"),
            CoreError::MissingData(path) => write!(f, "missing locale data: {path}"),
            CoreError::ParseMismatch(offset) => write!(f, "parse mismatch at offset {offset}"),
            CoreError::InvalidInput(message) => write!(f, "invalid input: {message}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CoreError {}
