// src/errors.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocentError {
    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging error: {0}")]
    Logging(String),
}

impl DocentError {
    pub fn api_error(msg: impl Into<String>) -> Self {
        DocentError::Api(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        DocentError::Config(msg.into())
    }

    pub fn logging_error(msg: impl Into<String>) -> Self {
        DocentError::Logging(msg.into())
    }
}

pub type DocentResult<T> = Result<T, DocentError>;
