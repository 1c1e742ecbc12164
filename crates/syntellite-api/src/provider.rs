//! Provider profile endpoints (`/api/provider`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{Ack, ApiClient, decode};
use crate::error::Result;

/// SMTP provider profile as exchanged with the backend.
///
/// The backend keeps exactly one active profile per account; pushing a new
/// profile replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProfile {
    /// Profile kind (`gmail`, `outlook`, `custom`, ...).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// SMTP host.
    pub host: String,
    /// SMTP port.
    pub port: u16,
    /// SMTP username.
    pub username: String,
    /// SMTP password. The backend never returns it; defaults to empty.
    #[serde(default)]
    pub password: String,
    /// Sender display name.
    #[serde(default)]
    pub from_name: String,
    /// Sender address.
    pub from_email: String,
}

impl ApiClient {
    /// Fetches the active provider profile, if the backend has one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SessionExpired`] when no token is installed,
    /// or an API/transport error when the fetch fails.
    pub async fn fetch_provider(&self) -> Result<Option<ProviderProfile>> {
        let token = self.bearer()?;
        let url = self.endpoint("/api/provider")?;
        let response = self.http.get(url).bearer_auth(token).send().await?;

        let body: Value = decode(response).await?;
        if body.is_null() {
            return Ok(None);
        }
        Ok(serde_json::from_value(body).ok())
    }

    /// Pushes a profile to the backend, making it the active provider.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SessionExpired`] when no token is installed,
    /// or an API/transport error when the save fails.
    pub async fn save_provider(&self, profile: &ProviderProfile) -> Result<()> {
        let token = self.bearer()?;
        let url = self.endpoint("/api/provider")?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(profile)
            .send()
            .await?;

        let status = response.status().as_u16();
        let ack: Ack = decode(response).await?;
        ack.into_result(status, "Unable to save provider")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_wire_names() {
        let profile = ProviderProfile {
            kind: "custom".to_string(),
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "mailer".to_string(),
            password: "pw".to_string(),
            from_name: "Talent Team".to_string(),
            from_email: "talent@example.com".to_string(),
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["type"], "custom");
        assert_eq!(json["fromName"], "Talent Team");
        assert_eq!(json["fromEmail"], "talent@example.com");
    }

    #[test]
    fn profile_tolerates_missing_password() {
        let profile: ProviderProfile = serde_json::from_str(
            r#"{"type":"gmail","host":"smtp.gmail.com","port":587,
                "username":"u","fromEmail":"u@gmail.com"}"#,
        )
        .unwrap();
        assert!(profile.password.is_empty());
        assert!(profile.from_name.is_empty());
    }
}
