//! Auth session lifecycle.
//!
//! The bearer token lives in two places: installed on the shared
//! [`ApiClient`] for outgoing requests, and persisted under the `token`
//! storage key so a restart restores the session without a network call.

use tracing::warn;

use syntellite_api::{ApiClient, Credentials, UserProfile};

use crate::Result;
use crate::storage::{Storage, keys};

/// Tracks the signed-in user and drives the token lifecycle.
#[derive(Debug, Default)]
pub struct AuthState {
    user: Option<UserProfile>,
}

impl AuthState {
    /// Creates a signed-out state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The signed-in user, when known.
    ///
    /// A session restored from a persisted token has no profile until the
    /// next sign-in.
    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Restores a persisted session, if one exists.
    ///
    /// Returns true when a token was found and installed.
    pub async fn restore(&mut self, client: &mut ApiClient, storage: &dyn Storage) -> bool {
        match storage.get(keys::TOKEN).await {
            Some(token) => {
                client.set_token(Some(token));
                true
            }
            None => false,
        }
    }

    /// Signs in and installs the session token.
    ///
    /// The token write is best-effort; a storage failure costs only the
    /// restart restore, never the live session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the credentials or the
    /// request fails; the client stays signed out.
    pub async fn sign_in(
        &mut self,
        client: &mut ApiClient,
        storage: &dyn Storage,
        credentials: &Credentials,
    ) -> Result<&UserProfile> {
        let session = client.login(credentials).await?;
        self.install(client, storage, session.token, session.user)
            .await
    }

    /// Registers a new account and installs its first session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration or the
    /// request fails; the client stays signed out.
    pub async fn register(
        &mut self,
        client: &mut ApiClient,
        storage: &dyn Storage,
        credentials: &Credentials,
    ) -> Result<&UserProfile> {
        let session = client.register(credentials).await?;
        self.install(client, storage, session.token, session.user)
            .await
    }

    /// Clears the session everywhere.
    pub async fn sign_out(&mut self, client: &mut ApiClient, storage: &dyn Storage) {
        self.user = None;
        client.set_token(None);
        if let Err(error) = storage.remove(keys::TOKEN).await {
            warn!("failed to clear persisted token: {error}");
        }
    }

    async fn install(
        &mut self,
        client: &mut ApiClient,
        storage: &dyn Storage,
        token: String,
        user: UserProfile,
    ) -> Result<&UserProfile> {
        if let Err(error) = storage.set(keys::TOKEN, &token).await {
            warn!("failed to persist token: {error}");
        }
        client.set_token(Some(token));
        Ok(self.user.insert(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::storage::MemoryStorage;

    use super::*;

    #[tokio::test]
    async fn restore_installs_a_persisted_token() {
        let storage = MemoryStorage::new();
        storage.set(keys::TOKEN, "t1").await.unwrap();

        let mut client = ApiClient::new("http://localhost:4000").unwrap();
        let mut auth = AuthState::new();
        assert!(auth.restore(&mut client, &storage).await);
        assert_eq!(client.token(), Some("t1"));
        assert!(auth.user().is_none());
    }

    #[tokio::test]
    async fn restore_without_a_token_stays_signed_out() {
        let storage = MemoryStorage::new();
        let mut client = ApiClient::new("http://localhost:4000").unwrap();
        let mut auth = AuthState::new();
        assert!(!auth.restore(&mut client, &storage).await);
        assert!(!client.has_session());
    }

    #[tokio::test]
    async fn sign_out_clears_client_and_storage() {
        let storage = MemoryStorage::new();
        storage.set(keys::TOKEN, "t1").await.unwrap();

        let mut client = ApiClient::new("http://localhost:4000").unwrap();
        let mut auth = AuthState::new();
        auth.restore(&mut client, &storage).await;

        auth.sign_out(&mut client, &storage).await;
        assert!(!client.has_session());
        assert_eq!(storage.get(keys::TOKEN).await, None);
    }
}
