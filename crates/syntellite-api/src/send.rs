//! Send endpoints (`/api/send/*`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::client::{Ack, ApiClient, decode};
use crate::error::Result;

/// A fully resolved single test message.
///
/// Both bodies are already substituted; the backend delivers the message
/// verbatim to the signed-in user's own address.
#[derive(Debug, Clone, Serialize)]
pub struct TestMessage {
    /// Resolved subject line.
    pub subject: String,
    /// Resolved HTML body.
    pub html: String,
    /// Resolved plain-text body.
    pub text: String,
}

/// A bulk campaign submission.
///
/// The subject and bodies are the *raw* templates; `candidates` carries one
/// flat record per recipient with the row fields merged under their
/// normalized keys plus the resolved global/custom override values. The
/// backend performs the per-recipient substitution.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCampaign {
    /// Display name of the contact list.
    pub list_name: String,
    /// One fully flattened record per recipient.
    pub candidates: Vec<BTreeMap<String, String>>,
    /// Raw subject template.
    pub subject: String,
    /// Raw HTML body template.
    pub html: String,
    /// Raw plain-text body template.
    pub text: String,
}

/// Per-recipient outcome counts reported by the backend after a bulk send.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct BulkOutcome {
    /// Number of successfully delivered messages.
    #[serde(default)]
    pub ok: u32,
    /// Number of failed deliveries.
    #[serde(default)]
    pub fail: u32,
}

impl ApiClient {
    /// Sends a resolved test message to the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SessionExpired`] when no token is installed,
    /// or an API/transport error when the send fails.
    pub async fn send_test(&self, message: &TestMessage) -> Result<()> {
        let token = self.bearer()?;
        let url = self.endpoint("/api/send/test")?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(message)
            .send()
            .await?;

        let status = response.status().as_u16();
        let ack: Ack = decode(response).await?;
        ack.into_result(status, "Unable to send test email.")
    }

    /// Submits a bulk campaign and returns the delivery outcome counts.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SessionExpired`] when no token is installed,
    /// or an API/transport error when the submission fails.
    pub async fn send_bulk(&self, campaign: &BulkCampaign) -> Result<BulkOutcome> {
        let token = self.bearer()?;
        let url = self.endpoint("/api/send/bulk")?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(campaign)
            .send()
            .await?;
        decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_campaign_uses_camel_case() {
        let campaign = BulkCampaign {
            list_name: "Interns".to_string(),
            candidates: vec![BTreeMap::from([(
                "Email".to_string(),
                "a@b.com".to_string(),
            )])],
            subject: "Hi {First_Name}".to_string(),
            html: "<p>Hi {First_Name}</p>".to_string(),
            text: "Hi {First_Name}".to_string(),
        };
        let json = serde_json::to_value(&campaign).unwrap();
        assert_eq!(json["listName"], "Interns");
        assert_eq!(json["candidates"][0]["Email"], "a@b.com");
    }

    #[test]
    fn bulk_outcome_defaults_missing_counts() {
        let outcome: BulkOutcome = serde_json::from_str(r#"{"ok":3}"#).unwrap();
        assert_eq!(outcome.ok, 3);
        assert_eq!(outcome.fail, 0);
    }
}
