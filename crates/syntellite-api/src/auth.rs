//! Authentication endpoints (`/api/auth/*`).

use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, decode};
use crate::error::Result;

/// Login/register credentials.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// Account email address.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials from email and password.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Profile of the signed-in user, as reported by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    /// Account email address.
    #[serde(default)]
    pub email: String,
    /// Display name, when the backend has one.
    #[serde(default)]
    pub name: Option<String>,
}

/// A successfully established session.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The signed-in user.
    #[serde(default)]
    pub user: UserProfile,
}

impl ApiClient {
    /// Signs in with the given credentials.
    ///
    /// The returned token is *not* installed automatically; call
    /// [`ApiClient::set_token`] with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// credentials.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession> {
        self.authenticate("login", credentials).await
    }

    /// Registers a new account and returns its first session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// registration.
    pub async fn register(&self, credentials: &Credentials) -> Result<AuthSession> {
        self.authenticate("register", credentials).await
    }

    async fn authenticate(&self, action: &str, credentials: &Credentials) -> Result<AuthSession> {
        let url = self.endpoint(&format!("/api/auth/{action}"))?;
        let response = self.http.post(url).json(credentials).send().await?;
        decode(response).await
    }
}
