use thiserror::Error;

/// Errors raised while building values, filters or parsing Zinc text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A value was constructed from an illegal payload (bad unit, bad id,
    /// out-of-range date component, ...). No partial value exists.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A filter node was built from illegal arguments.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Malformed Haystack JSON.
    #[error("Invalid JSON: {0}")]
    Json(String),

    /// Malformed Zinc or filter text. Fatal to the current parse.
    #[error("{message} [Line {line}]")]
    Parse { message: String, line: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_value(msg: impl Into<String>) -> Self {
        Error::InvalidValue(msg.into())
    }

    pub(crate) fn invalid_filter(msg: impl Into<String>) -> Self {
        Error::InvalidFilter(msg.into())
    }

    /// Line number for parse errors, `None` for construction errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Re-tag a construction error as a parse error at `line`.
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            Error::InvalidValue(message) | Error::InvalidFilter(message) => {
                Error::Parse { message, line }
            }
            parse => parse,
        }
    }
}
