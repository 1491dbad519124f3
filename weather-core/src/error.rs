use thiserror::Error;

/// Rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("City name must not be empty")]
    EmptyCity,
}

/// Failure to obtain a response body from the weather endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// DNS, connect, TLS, timeout or body-read failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered, but not with a 2xx status.
    #[error("OpenWeather request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid endpoint URL '{0}'")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Bad JSON, a missing field or a type mismatch. Sub-cases are not told apart.
    #[error("Failed to parse OpenWeather current JSON: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Malformed(err.to_string())
    }
}

/// Anything that can end a single refresh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
