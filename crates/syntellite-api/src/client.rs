//! Shared HTTP client for the campaign backend.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};

/// HTTP client carrying the backend base URL and the session bearer token.
///
/// One instance is shared by every screen of the console; installing or
/// clearing the token switches the whole client between the authenticated
/// and signed-out states.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client for the given backend base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(base_url.as_ref())?,
            token: None,
        })
    }

    /// Installs or clears the bearer token.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Returns the installed bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether a bearer token is installed.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.token.is_some()
    }

    /// Resolves an endpoint path against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(Into::into)
    }

    /// Returns the bearer token, or fails before any request is dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionExpired`] when no token is installed.
    pub(crate) fn bearer(&self) -> Result<&str> {
        self.token.as_deref().ok_or(Error::SessionExpired)
    }
}

/// Acknowledgement body used by the send and provider endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Ack {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl Ack {
    /// Converts a `{ok: false, error}` acknowledgement into an error.
    pub(crate) fn into_result(self, status: u16, fallback: &str) -> Result<()> {
        if self.ok {
            Ok(())
        } else {
            Err(Error::api(
                status,
                self.error.unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }
}

/// Decodes a response body, converting non-success statuses into
/// [`Error::Api`] with the backend's `{"error": ...}` message when present.
pub(crate) async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response.json().await.map_err(Into::into);
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    let message = match response.text().await {
        Ok(body) => serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.error),
        Err(_) => None,
    }
    .unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });

    Err(Error::api(status.as_u16(), message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_resolution() {
        let client = ApiClient::new("http://localhost:4000").unwrap();
        let url = client.endpoint("/api/logs").unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/api/logs");
    }

    #[test]
    fn bearer_requires_token() {
        let mut client = ApiClient::new("http://localhost:4000").unwrap();
        assert!(matches!(client.bearer(), Err(Error::SessionExpired)));

        client.set_token(Some("abc".to_string()));
        assert_eq!(client.bearer().unwrap(), "abc");
        assert!(client.has_session());
    }

    #[test]
    fn ack_into_result() {
        let ok = Ack {
            ok: true,
            error: None,
        };
        assert!(ok.into_result(200, "fallback").is_ok());

        let failed = Ack {
            ok: false,
            error: Some("relay refused".to_string()),
        };
        let error = failed.into_result(200, "fallback").unwrap_err();
        assert_eq!(error.to_string(), "API error (200): relay refused");

        let silent = Ack {
            ok: false,
            error: None,
        };
        let error = silent.into_result(200, "fallback").unwrap_err();
        assert_eq!(error.to_string(), "API error (200): fallback");
    }
}
