//! Error taxonomy
//!
//! Every failure the request pipeline can hit. None of these terminate the
//! process: [`crate::session::Session`] turns them into an [`ErrorResult`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// URL is empty, relative, or cannot be parsed
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid HTTP method {0:?}")]
    InvalidMethod(String),

    /// Header name or value the transport refuses to put on the wire
    #[error("invalid header {name:?}")]
    InvalidHeader { name: String },

    /// Network-level failure: DNS, refused connection, TLS, timeout, body read
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("no previous request to replay")]
    NoPriorRequest,

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl Error {
    pub(crate) fn invalid_url(url: &str, reason: impl ToString) -> Self {
        Error::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Coarse class of a failure, for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Rejected before any network attempt
    InvalidRequest,
    Transport,
    NoPriorRequest,
}

/// User-visible form of a failed send or replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl { .. } | Error::InvalidMethod(_) | Error::InvalidHeader { .. } => {
                ErrorKind::InvalidRequest
            }
            Error::Transport(_) | Error::ClientBuild(_) => ErrorKind::Transport,
            Error::NoPriorRequest => ErrorKind::NoPriorRequest,
        }
    }
}

impl From<&Error> for ErrorResult {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<Error> for ErrorResult {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_result_uses_display() {
        let err = Error::invalid_url("", "URL is empty");
        let result = ErrorResult::from(&err);
        assert_eq!(result.kind, ErrorKind::InvalidRequest);
        assert_eq!(result.message, "invalid URL \"\": URL is empty");
    }

    #[test]
    fn test_no_prior_request_message() {
        let result = ErrorResult::from(Error::NoPriorRequest);
        assert_eq!(result.kind, ErrorKind::NoPriorRequest);
        assert_eq!(result.message, "no previous request to replay");
    }
}
