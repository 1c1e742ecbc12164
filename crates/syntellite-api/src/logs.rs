//! Delivery log endpoint (`/api/logs`).

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::client::{ApiClient, decode};
use crate::error::Result;

/// Status of a logged delivery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryStatus {
    /// Every recipient was delivered.
    Success,
    /// Some recipients failed.
    Partial,
    /// The action failed outright.
    #[default]
    Failed,
}

impl DeliveryStatus {
    /// Parse from the backend's string representation.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "success" => Self::Success,
            "partial" => Self::Partial,
            _ => Self::Failed,
        }
    }

    /// Convert to the backend's string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

/// One delivery log entry as reported by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryLog {
    /// Server-side log id.
    pub id: i64,
    /// Logged action (e.g. `send_bulk`).
    pub action: String,
    /// Contact list the action targeted, when applicable.
    #[serde(default)]
    pub list_name: Option<String>,
    /// Number of candidates the action covered.
    #[serde(default)]
    pub candidate_count: u32,
    /// Raw status string; see [`DeliveryLog::status`].
    pub status: String,
    /// Opaque detail blob; see [`DeliveryLog::details`].
    #[serde(default)]
    pub details_json: Option<String>,
    /// Server-side timestamp string; see [`DeliveryLog::timestamp`].
    pub created_at: String,
}

impl DeliveryLog {
    /// The parsed delivery status.
    #[must_use]
    pub fn status(&self) -> DeliveryStatus {
        DeliveryStatus::parse(&self.status)
    }

    /// Best-effort parse of `details_json` for display.
    ///
    /// The blob is an opaque server string; anything that is not a JSON
    /// object yields an empty map, never an error.
    #[must_use]
    pub fn details(&self) -> Map<String, Value> {
        self.details_json
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
            .and_then(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Best-effort parse of `created_at`.
    ///
    /// Accepts RFC 3339 and the bare `YYYY-MM-DD HH:MM:SS` form SQLite
    /// backends emit; anything else yields `None`.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(|naive| naive.and_utc().fixed_offset())
            })
    }
}

impl ApiClient {
    /// Fetches the delivery log, newest first as the backend orders it.
    ///
    /// A response that is not a log array is treated as an empty log rather
    /// than an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SessionExpired`] when no token is installed,
    /// or an API/transport error when the fetch fails.
    pub async fn fetch_logs(&self) -> Result<Vec<DeliveryLog>> {
        let token = self.bearer()?;
        let url = self.endpoint("/api/logs")?;
        let response = self.http.get(url).bearer_auth(token).send().await?;

        let body: Value = decode(response).await?;
        match serde_json::from_value(body) {
            Ok(logs) => Ok(logs),
            Err(error) => {
                warn!("unexpected log payload: {error}");
                Ok(Vec::new())
            }
        }
    }
}
