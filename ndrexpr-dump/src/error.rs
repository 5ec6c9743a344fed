use ndrexpr::error::ExprError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("I/O error on '{path}': {source}")]
    IoError {
        source: std::io::Error,
        path: String,
    },

    #[error("Failed to parse configuration file '{file}': {source}")]
    ConfigParseError {
        source: toml::de::Error,
        file: String,
    },

    #[error("Failed to decode expression: {0}")]
    DecodeError(#[from] ExprError),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

pub type DumpResult<T> = Result<T, DumpError>;
