use reqwest::StatusCode;
use thiserror::Error;

/// The single failure the fetch pipeline reports.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("weather unavailable")]
    Unavailable(#[source] FetchFailure),
}

impl FetchError {
    pub fn failure(&self) -> &FetchFailure {
        match self {
            FetchError::Unavailable(failure) => failure,
        }
    }
}

impl From<FetchFailure> for FetchError {
    fn from(failure: FetchFailure) -> Self {
        FetchError::Unavailable(failure)
    }
}

#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("request to weather provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather provider responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed weather response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location service unavailable")]
    ServiceUnavailable,

    #[error("location error: {0}")]
    Other(String),
}
