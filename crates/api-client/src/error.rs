use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Malformed response for '{city}': {reason}")]
    MalformedResponse { city: String, reason: String },
}
