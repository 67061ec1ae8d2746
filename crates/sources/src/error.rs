use thiserror::Error;

pub type Result<T> = std::result::Result<T, SourceError>;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("GET {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid base64 content: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Invalid glob pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    #[error("No directory matches {0}")]
    NoMatch(String),

    #[error("Source {namespace} is not a {expected} source")]
    WrongOrigin {
        namespace: String,
        expected: &'static str,
    },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Catalog parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Task failed: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}
