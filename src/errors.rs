use thiserror::Error;
use std::num::ParseIntError;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("未找到 {0}")]
    SymbolNotFound(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Parse int error: {0}")]
    ParseIntError(#[from] ParseIntError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, RelayError>;

// 用于从字符串创建错误
impl From<String> for RelayError {
    fn from(s: String) -> Self {
        RelayError::Unknown(s)
    }
}

// 用于从&str创建错误
impl From<&str> for RelayError {
    fn from(s: &str) -> Self {
        RelayError::Unknown(s.to_string())
    }
}
