//! Response draining, error classification and JSON decoding.

use crate::error::{ApiError, Error, Result};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A fully drained HTTP response.
///
/// The body is read to the end before anything inspects it, so the
/// connection is released whether the call succeeds or fails.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Read the whole body of a transport response.
    pub async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(Self {
            status,
            headers,
            body: body.to_vec(),
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

/// Pass 2xx responses through; turn anything else into [`Error::Api`].
///
/// A non-2xx body that is not the `{"error": {...}}` envelope yields
/// [`Error::Decode`] rather than being treated as success.
pub fn classify(response: RawResponse) -> Result<RawResponse> {
    if response.status.is_success() {
        return Ok(response);
    }
    let envelope: ErrorEnvelope = serde_json::from_slice(&response.body)?;
    Err(Error::Api {
        error: envelope.error,
        response,
    })
}

/// Decode the body into `target`. A missing target is a caller bug and fails.
pub fn decode<T: DeserializeOwned>(response: &RawResponse, target: Option<&mut T>) -> Result<()> {
    let target = target.ok_or(Error::NoTarget)?;
    *target = serde_json::from_slice(&response.body)?;
    Ok(())
}
