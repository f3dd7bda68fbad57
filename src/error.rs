use crate::models::ObjectKind;
use thiserror::Error;

pub type EpsgResult<T> = Result<T, EpsgError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EpsgError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("XML error: {0}")]
    XmlError(String),

    #[error("Unsupported code type: {0}")]
    UnsupportedType(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Code {code} refers to a {found}, expected a {expected}")]
    UnexpectedKind {
        code: String,
        expected: ObjectKind,
        found: ObjectKind,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid code: {0}")]
    InvalidCode(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for EpsgError {
    fn from(err: reqwest::Error) -> Self {
        EpsgError::NetworkError(err.to_string())
    }
}

impl From<roxmltree::Error> for EpsgError {
    fn from(err: roxmltree::Error) -> Self {
        EpsgError::XmlError(err.to_string())
    }
}

impl From<std::num::ParseFloatError> for EpsgError {
    fn from(err: std::num::ParseFloatError) -> Self {
        EpsgError::ParseError(format!("Invalid decimal: {}", err))
    }
}

impl From<serde_json::Error> for EpsgError {
    fn from(err: serde_json::Error) -> Self {
        EpsgError::ConfigError(err.to_string())
    }
}
