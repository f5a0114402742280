//! Error types for the Pingdom API client.

use crate::response::RawResponse;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Base error type for Pingdom operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No usable credential, or a credential that cannot be sent over HTTP.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A step of the session login failed; `source` carries the cause.
    #[error("session login failed at {step}: {source}")]
    Handshake {
        step: HandshakeStep,
        #[source]
        source: Box<Error>,
    },

    #[error("there is no {0} cookie in the response")]
    MissingCookie(String),

    #[error("response carried no Location header")]
    MissingLocation,

    /// Network or connection failure, passed through from the transport.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The API answered outside the 2xx range with a structured error body.
    #[error("API error: {error}")]
    Api {
        error: ApiError,
        response: RawResponse,
    },

    /// A response body was not the JSON shape the caller expected.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no target provided to decode the response into")]
    NoTarget,

    #[error("invalid parameters: {0}")]
    Validation(String),
}

impl Error {
    /// The classified API error, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    /// True when the API reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.api_error().is_some_and(|e| e.status_code == 404)
    }

    pub(crate) fn handshake(step: HandshakeStep, source: impl Into<Error>) -> Self {
        Error::Handshake {
            step,
            source: Box::new(source.into()),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error reported by the API in the body of a non-2xx response.
#[derive(Error, Debug, Clone, PartialEq, Eq, Deserialize)]
#[error("{status_code} {status_desc}: {message}")]
pub struct ApiError {
    #[serde(rename = "statuscode")]
    pub status_code: u16,
    #[serde(rename = "statusdesc")]
    pub status_desc: String,
    #[serde(rename = "errormessage")]
    pub message: String,
}

impl ApiError {
    pub fn new(
        status_code: u16,
        status_desc: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status_code,
            status_desc: status_desc.into(),
            message: message.into(),
        }
    }
}

/// The step of the session login that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStep {
    /// GET on the login endpoint for the session cookie and login redirect.
    Initiate,
    /// POST of the user credentials to the auth endpoint.
    Credentials,
    /// GET on the callback endpoint that sets the token cookie.
    Callback,
}

impl fmt::Display for HandshakeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandshakeStep::Initiate => "login initiation",
            HandshakeStep::Credentials => "credential submission",
            HandshakeStep::Callback => "login callback",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let e = ApiError::new(400, "Bad Request", "This is an error");
        assert_eq!(e.to_string(), "400 Bad Request: This is an error");
    }

    #[test]
    fn handshake_error_names_step_and_cause() {
        let e = Error::handshake(HandshakeStep::Callback, Error::MissingCookie("jwt".into()));
        let msg = e.to_string();
        assert!(msg.contains("login callback"));
        assert!(msg.contains("jwt"));
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn non_api_errors_are_not_not_found() {
        assert!(!Error::NoTarget.is_not_found());
        assert!(Error::NoTarget.api_error().is_none());
    }
}
