use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Response error:\nStatusCode: {0}\nText: {1}")]
    Response(StatusCode, String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to deserialize response: {0}")]
    Deserialize(String),

    #[error("Invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl Error {
    /// Signin was rejected or the session stopped being accepted.
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }
}
