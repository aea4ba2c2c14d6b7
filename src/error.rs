use thiserror::Error;

#[derive(Error, Debug)]
pub enum JenkinsPrError {
    #[error("Failed to trigger build (status {status}): {message}")]
    TriggerFailed { status: u16, message: String },

    #[error("Request Blocked: {0}")]
    RequestBlocked(String),

    #[error("Request Cancelled: queue item {0} was cancelled")]
    RequestCancelled(String),

    #[error("Timeout: queue item {location} was not assigned a build after {attempts} checks")]
    ResolveTimeout { location: String, attempts: u32 },

    #[error("Timeout: build #{build} did not complete after {attempts} checks")]
    PollExhausted { build: u64, attempts: u32 },

    #[error("API request failed (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JenkinsPrError>;
