//! The network seam: one blocking POST, raw body back.

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use tracing::warn;

use crate::errors::GptError;

pub trait Transport: Send + Sync {
    /// Posts `body` to `url` and returns the response body as text.
    ///
    /// A non-2xx status is not an error here; the body is returned so the
    /// caller can inspect the API's own error payload.
    ///
    /// # Errors
    ///
    /// Returns `GptError::HttpError` when no response could be obtained.
    fn post(&self, url: &str, headers: &HeaderMap, body: &str) -> Result<String, GptError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn post(&self, url: &str, headers: &HeaderMap, body: &str) -> Result<String, GptError> {
        (**self).post(url, headers, body)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post(&self, url: &str, headers: &HeaderMap, body: &str) -> Result<String, GptError> {
        (**self).post(url, headers, body)
    }
}

/// `reqwest` blocking client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// With `timeout` unset requests wait for the server indefinitely;
    /// `reqwest`'s own 30 second default is switched off.
    ///
    /// # Errors
    ///
    /// Returns `GptError::HttpError` if the TLS backend cannot be
    /// initialised.
    pub fn new(timeout: Option<Duration>) -> Result<Self, GptError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GptError::HttpError(format!("could not build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, headers: &HeaderMap, body: &str) -> Result<String, GptError> {
        let response = self
            .client
            .post(url)
            .headers(headers.clone())
            .body(body.to_owned())
            .send()
            .map_err(|e| GptError::HttpError(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!("{url} answered with status {status}");
        }

        response
            .text()
            .map_err(|e| GptError::HttpError(format!("reading response from {url} failed: {e}")))
    }
}
