use crate::model::PhotoSource;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockError {
    #[error("No API key configured for {0}")]
    MissingApiKey(PhotoSource),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{provider} request failed: {message}")]
    Provider {
        provider: PhotoSource,
        message: String,
    },

    #[error("Photo {id} was not found on {provider}")]
    NotFound { provider: PhotoSource, id: String },

    #[error("Failed to download {url}: {message}")]
    Download { url: String, message: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error for {url}: {message}")]
    Http { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

impl StockError {
    pub fn provider(provider: PhotoSource, message: impl Into<String>) -> Self {
        StockError::Provider {
            provider,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StockError>;
