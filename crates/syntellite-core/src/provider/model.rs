//! Provider profile model types.

use serde::{Deserialize, Serialize};
use syntellite_api::ProviderProfile;
use uuid::Uuid;

/// Opaque identifier of a locally stored provider profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The string encoding of this id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProviderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A locally stored SMTP provider profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmtpProvider {
    /// Unique, stable id.
    pub id: ProviderId,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Profile kind (`gmail`, `outlook`, `custom`, ...).
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    /// SMTP host.
    pub host: String,
    /// SMTP port.
    pub port: u16,
    /// SMTP username.
    pub username: String,
    /// SMTP password.
    #[serde(default)]
    pub password: String,
    /// Sender display name.
    #[serde(default)]
    pub from_name: String,
    /// Sender address.
    pub from_email: String,
}

fn default_kind() -> String {
    "custom".to_string()
}

impl SmtpProvider {
    /// Creates an empty custom profile with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ProviderId::generate(),
            label: String::new(),
            kind: default_kind(),
            host: String::new(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from_name: String::new(),
            from_email: String::new(),
        }
    }

    /// The wire payload pushed to the backend.
    #[must_use]
    pub fn to_profile(&self) -> ProviderProfile {
        ProviderProfile {
            kind: self.kind.clone(),
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            from_name: self.from_name.clone(),
            from_email: self.from_email.clone(),
        }
    }

    /// Builds a local profile from a backend payload.
    #[must_use]
    pub fn from_profile(profile: &ProviderProfile) -> Self {
        Self {
            id: ProviderId::generate(),
            label: if profile.from_email.is_empty() {
                profile.host.clone()
            } else {
                profile.from_email.clone()
            },
            kind: if profile.kind.is_empty() {
                default_kind()
            } else {
                profile.kind.clone()
            },
            host: profile.host.clone(),
            port: profile.port,
            username: profile.username.clone(),
            password: profile.password.clone(),
            from_name: profile.from_name.clone(),
            from_email: profile.from_email.clone(),
        }
    }

    /// Whether this profile mirrors the given backend payload.
    ///
    /// The backend never returns passwords, so identity is the sender
    /// address plus host.
    #[must_use]
    pub fn matches_profile(&self, profile: &ProviderProfile) -> bool {
        self.from_email == profile.from_email && self.host == profile.host
    }
}

impl Default for SmtpProvider {
    fn default() -> Self {
        Self::new()
    }
}
