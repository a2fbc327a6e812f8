//! Venue error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VenueError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out")]
    Timeout,

    #[error("venue returned HTTP {status}")]
    Status { status: u16 },

    #[error("malformed {field} {value:?}")]
    Malformed { field: &'static str, value: String },
}

impl From<reqwest::Error> for VenueError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Malformed { field: "payload", value: err.to_string() }
        } else if let Some(status) = err.status() {
            Self::Status { status: status.as_u16() }
        } else {
            Self::Request(err.to_string())
        }
    }
}
