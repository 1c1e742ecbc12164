//! Persisted provider roster and backend sync.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use syntellite_api::ApiClient;

use crate::Result;
use crate::storage::{Storage, keys};

use super::model::{ProviderId, SmtpProvider};

/// Persisted shape of the provider roster.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedRoster {
    #[serde(default)]
    providers: Vec<SmtpProvider>,
    #[serde(default, rename = "activeId")]
    active_id: Option<ProviderId>,
}

/// Persisted roster of SMTP provider profiles with one active selection.
///
/// The backend only ever knows the active profile; the roster itself is a
/// local convenience.
pub struct ProviderStore {
    providers: Vec<SmtpProvider>,
    active_id: Option<ProviderId>,
    storage: Arc<dyn Storage>,
}

impl ProviderStore {
    /// Loads the persisted roster.
    ///
    /// Tolerates the legacy persisted shape (a bare profile array) by
    /// adopting its first entry as the active profile. Malformed data falls
    /// back to an empty roster.
    pub async fn load(storage: Arc<dyn Storage>) -> Self {
        let (providers, active_id) = match storage.get(keys::PROVIDERS).await {
            None => (Vec::new(), None),
            Some(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Array(_)) => {
                    let providers: Vec<SmtpProvider> =
                        serde_json::from_str(&raw).unwrap_or_default();
                    let active_id = providers.first().map(|provider| provider.id.clone());
                    (providers, active_id)
                }
                Ok(_) => {
                    let roster: PersistedRoster = serde_json::from_str(&raw).unwrap_or_default();
                    (roster.providers, roster.active_id)
                }
                Err(error) => {
                    warn!("persisted providers are unreadable: {error}");
                    (Vec::new(), None)
                }
            },
        };
        Self {
            providers,
            active_id,
            storage,
        }
    }

    /// Iterates the roster in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SmtpProvider> {
        self.providers.iter()
    }

    /// Looks up a profile by id.
    #[must_use]
    pub fn get(&self, id: &ProviderId) -> Option<&SmtpProvider> {
        self.providers.iter().find(|provider| &provider.id == id)
    }

    /// The active profile, if one is selected.
    #[must_use]
    pub fn active(&self) -> Option<&SmtpProvider> {
        self.active_id.as_ref().and_then(|id| self.get(id))
    }

    /// Number of stored profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Inserts or replaces a profile; optionally makes it active.
    pub async fn upsert(&mut self, provider: SmtpProvider, make_active: bool) {
        let id = provider.id.clone();
        match self
            .providers
            .iter_mut()
            .find(|existing| existing.id == id)
        {
            Some(existing) => *existing = provider,
            None => self.providers.push(provider),
        }
        if make_active || self.active_id.is_none() {
            self.active_id = Some(id);
        }
        self.persist().await;
    }

    /// Selects the active profile. Returns false for an unknown id.
    pub async fn set_active(&mut self, id: &ProviderId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        if self.active_id.as_ref() != Some(id) {
            self.active_id = Some(id.clone());
            self.persist().await;
        }
        true
    }

    /// Removes a profile; a removed active selection falls back to the
    /// first remaining profile.
    pub async fn remove(&mut self, id: &ProviderId) -> bool {
        let Some(index) = self.providers.iter().position(|provider| &provider.id == id) else {
            return false;
        };
        self.providers.remove(index);
        if self.active_id.as_ref() == Some(id) {
            self.active_id = self.providers.first().map(|provider| provider.id.clone());
        }
        self.persist().await;
        true
    }

    /// Pushes the active profile to the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no session or the backend rejects the
    /// profile. A roster without an active profile is a quiet no-op.
    pub async fn push_active(&self, client: &ApiClient) -> Result<()> {
        let Some(provider) = self.active() else {
            return Ok(());
        };
        client.save_provider(&provider.to_profile()).await?;
        debug!("active provider set to {}", provider.from_email);
        Ok(())
    }

    /// Adopts the backend's active profile into the local roster.
    ///
    /// An existing profile with the same sender address and host just
    /// becomes the active selection; otherwise the payload is inserted as a
    /// new profile. Returns true if the roster changed.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no session or the fetch fails.
    pub async fn hydrate_from_backend(&mut self, client: &ApiClient) -> Result<bool> {
        let Some(profile) = client.fetch_provider().await? else {
            return Ok(false);
        };

        if let Some(existing) = self
            .providers
            .iter()
            .find(|provider| provider.matches_profile(&profile))
        {
            let id = existing.id.clone();
            let changed = self.active_id.as_ref() != Some(&id);
            if changed {
                self.active_id = Some(id);
                self.persist().await;
            }
            return Ok(changed);
        }

        self.upsert(SmtpProvider::from_profile(&profile), true).await;
        Ok(true)
    }

    async fn persist(&self) {
        let roster = PersistedRoster {
            providers: self.providers.clone(),
            active_id: self.active_id.clone(),
        };
        let blob = match serde_json::to_string(&roster) {
            Ok(blob) => blob,
            Err(error) => {
                warn!("failed to serialize providers: {error}");
                return;
            }
        };
        if let Err(error) = self.storage.set(keys::PROVIDERS, &blob).await {
            warn!("failed to persist providers: {error}");
        }
    }
}
