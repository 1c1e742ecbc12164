//! Campaign composition.
//!
//! Holds the compose screen's working state: the selected list and
//! template, the user's in-progress custom merge-field edits, and the
//! status of the in-flight send. Everything here is a pure function of the
//! variable map and the selections except the two send operations.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use syntellite_api::{ApiClient, BulkCampaign, TestMessage};

use crate::html::html_to_text;
use crate::lists::{CandidateList, Row};
use crate::normalize::normalize;
use crate::templates::Template;
use crate::variables::{Variable, VariableMap};

/// How long a finished send outcome stays visible before the status
/// returns to idle.
const STATUS_DISPLAY: Duration = Duration::from_secs(4);

/// Progress of an in-flight send operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SendStatus {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A request has been dispatched.
    Loading {
        /// Progress message.
        text: String,
    },
    /// The send completed.
    Success {
        /// Outcome message.
        text: String,
        /// Delivered count.
        sent: u32,
        /// Failed count.
        failed: u32,
    },
    /// The send failed; the user retries manually.
    Error {
        /// Error message.
        text: String,
    },
}

impl SendStatus {
    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Whether this is a finished outcome awaiting its display timeout.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Error { .. })
    }
}

/// Resolved preview of the selected template against the selected list's
/// first row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPreview {
    /// Resolved subject line.
    pub subject: String,
    /// Resolved HTML body; empty when the template has none.
    pub html: String,
    /// Resolved text body, falling back to the stripped HTML body.
    pub text: String,
}

/// Working state of the compose screen.
#[derive(Debug, Default)]
pub struct ComposeSession {
    template: Option<Template>,
    list: Option<CandidateList>,
    custom_values: BTreeMap<String, String>,
    previous_defaults: BTreeMap<String, String>,
    status: SendStatus,
    status_since: Option<Instant>,
}

impl ComposeSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected template.
    #[must_use]
    pub const fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    /// The selected list.
    #[must_use]
    pub const fn list(&self) -> Option<&CandidateList> {
        self.list.as_ref()
    }

    /// The user's current custom merge-field values.
    #[must_use]
    pub const fn custom_values(&self) -> &BTreeMap<String, String> {
        &self.custom_values
    }

    /// Selects (or clears) the template.
    pub fn select_template(&mut self, template: Option<Template>) {
        self.template = template;
    }

    /// Selects (or clears) the list and reconciles the custom values.
    ///
    /// Switching to a different list resets every custom field to that
    /// list's defaults, discarding in-progress edits. Re-selecting the same
    /// list reconciles instead, like [`ComposeSession::refresh`].
    pub fn select_list(&mut self, map: &VariableMap, list: Option<CandidateList>) {
        let switched = self.list.as_ref().map(|current| &current.id)
            != list.as_ref().map(|next| &next.id);
        self.list = list;

        if switched {
            let defaults = custom_defaults(map, self.list.as_ref());
            self.custom_values = defaults.clone();
            self.previous_defaults = defaults;
        } else {
            self.refresh(map);
        }
    }

    /// Reconciles the custom values after the variable map changed.
    ///
    /// Per field: a value the user never touched (still equal to its
    /// previous default) follows the new default; an edited value is
    /// preserved; fields for removed variables are dropped and fields for
    /// new variables are seeded with their defaults.
    pub fn refresh(&mut self, map: &VariableMap) {
        let defaults = custom_defaults(map, self.list.as_ref());

        for (key, default) in &defaults {
            match self.custom_values.get(key) {
                None => {
                    self.custom_values.insert(key.clone(), default.clone());
                }
                Some(current) => {
                    let untouched = self.previous_defaults.get(key) == Some(current);
                    if untouched && current != default {
                        self.custom_values.insert(key.clone(), default.clone());
                    }
                }
            }
        }
        self.custom_values.retain(|key, _| defaults.contains_key(key));
        self.previous_defaults = defaults;
    }

    /// Overwrites one custom merge-field value.
    pub fn set_custom_value(&mut self, key: &str, value: &str) {
        self.custom_values
            .insert(normalize(key), value.to_string());
    }

    /// Discards edits and restores the current defaults.
    pub fn reset_custom_values(&mut self) {
        self.custom_values = self.previous_defaults.clone();
    }

    /// The effective override set handed to the resolver: global defaults
    /// overlaid with the session's custom values.
    #[must_use]
    pub fn effective_overrides(&self, map: &VariableMap) -> BTreeMap<String, String> {
        let mut overrides = global_values(map);
        overrides.extend(
            self.custom_values
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        overrides
    }

    /// Resolves the selected template against the selected list's first
    /// row. `None` until both are selected.
    #[must_use]
    pub fn preview(&self, map: &VariableMap) -> Option<ResolvedPreview> {
        let template = self.template.as_ref()?;
        let list = self.list.as_ref()?;
        let empty = Row::new();
        let sample = list.sample_row().unwrap_or(&empty);
        let overrides = self.effective_overrides(map);

        let subject = map.resolve(&template.subject, sample, &overrides);
        let html = if template.body_html.is_empty() {
            String::new()
        } else {
            map.resolve(&template.body_html, sample, &overrides)
        };
        let text = if template.body_text.is_empty() {
            html_to_text(&html)
        } else {
            map.resolve(&template.body_text, sample, &overrides)
        };

        Some(ResolvedPreview { subject, html, text })
    }

    /// One fully flattened record per recipient: the row merged under its
    /// normalized keys, overlaid with the effective overrides.
    #[must_use]
    pub fn candidate_payload(&self, map: &VariableMap) -> Vec<BTreeMap<String, String>> {
        let Some(list) = self.list.as_ref() else {
            return Vec::new();
        };
        let overrides = self.effective_overrides(map);

        list.rows
            .iter()
            .map(|row| {
                let mut record = row.clone();
                for (column, value) in row {
                    record.insert(normalize(column), value.clone());
                }
                record.extend(overrides.clone());
                record
            })
            .collect()
    }

    /// The bulk submission for the current selections. `None` until both a
    /// template and a list are selected.
    ///
    /// Bodies ride along raw: the backend substitutes per recipient from
    /// the flattened records.
    #[must_use]
    pub fn bulk_campaign(&self, map: &VariableMap) -> Option<BulkCampaign> {
        let template = self.template.as_ref()?;
        let list = self.list.as_ref()?;

        let html = template.body_html.clone();
        let text = if template.body_text.is_empty() {
            html_to_text(&html)
        } else {
            template.body_text.clone()
        };

        Some(BulkCampaign {
            list_name: list.name.clone(),
            candidates: self.candidate_payload(map),
            subject: template.subject.clone(),
            html: if html.is_empty() { text.clone() } else { html },
            text,
        })
    }

    /// The resolved test message for the current selections.
    #[must_use]
    pub fn test_message(&self, map: &VariableMap) -> Option<TestMessage> {
        let preview = self.preview(map)?;
        Some(TestMessage {
            subject: preview.subject,
            html: if preview.html.is_empty() {
                preview.text.clone()
            } else {
                preview.html
            },
            text: preview.text,
        })
    }

    /// Sends a test message to the signed-in user.
    ///
    /// The outcome lands in [`ComposeSession::status`]; a missing session
    /// surfaces there as an error before any request is dispatched.
    pub async fn send_test(&mut self, map: &VariableMap, client: &ApiClient) {
        let Some(message) = self.test_message(map) else {
            return;
        };
        self.set_status(SendStatus::Loading {
            text: "Sending test email...".to_string(),
        });

        match client.send_test(&message).await {
            Ok(()) => self.set_status(SendStatus::Success {
                text: "Test email sent".to_string(),
                sent: 1,
                failed: 0,
            }),
            Err(error) => self.set_status(SendStatus::Error {
                text: error.to_string(),
            }),
        }
    }

    /// Submits the bulk campaign.
    ///
    /// The outcome lands in [`ComposeSession::status`]; a missing session
    /// surfaces there as an error before any request is dispatched.
    pub async fn send_bulk(&mut self, map: &VariableMap, client: &ApiClient) {
        let Some(campaign) = self.bulk_campaign(map) else {
            return;
        };
        self.set_status(SendStatus::Loading {
            text: "Sending campaign...".to_string(),
        });

        match client.send_bulk(&campaign).await {
            Ok(outcome) => self.set_status(SendStatus::Success {
                text: "Campaign sent".to_string(),
                sent: outcome.ok,
                failed: outcome.fail,
            }),
            Err(error) => self.set_status(SendStatus::Error {
                text: error.to_string(),
            }),
        }
    }

    /// The current status, expiring finished outcomes back to idle after
    /// the display timeout.
    pub fn status(&mut self) -> &SendStatus {
        let expired = self.status.is_terminal()
            && self
                .status_since
                .is_some_and(|since| since.elapsed() >= STATUS_DISPLAY);
        if expired {
            self.status = SendStatus::Idle;
            self.status_since = None;
        }
        &self.status
    }

    fn set_status(&mut self, status: SendStatus) {
        self.status = status;
        self.status_since = Some(Instant::now());
    }
}

/// All global defaults, keyed by canonical name.
#[must_use]
pub fn global_values(map: &VariableMap) -> BTreeMap<String, String> {
    map.iter()
        .filter_map(|(name, variable)| match variable {
            Variable::Global { value } => Some((name.to_string(), value.clone())),
            _ => None,
        })
        .collect()
}

/// Effective default per custom variable for the selected list: its
/// override for that list when present, else its default value.
#[must_use]
pub fn custom_defaults(
    map: &VariableMap,
    list: Option<&CandidateList>,
) -> BTreeMap<String, String> {
    map.iter()
        .filter_map(|(name, variable)| match variable {
            Variable::Custom { value, overrides } => {
                let effective = list
                    .and_then(|list| overrides.get(&list.id))
                    .unwrap_or(value);
                Some((name.to_string(), effective.clone()))
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::lists::ListId;
    use crate::variables::{AddOptions, VariableKind};

    use super::*;

    fn list(id: &str) -> CandidateList {
        CandidateList {
            id: ListId::from(id),
            name: format!("List {id}"),
            columns: vec!["First Name".to_string(), "Email".to_string()],
            rows: vec![
                Row::from([
                    ("First Name".to_string(), "Ada".to_string()),
                    ("Email".to_string(), "ada@example.com".to_string()),
                ]),
                Row::from([
                    ("First Name".to_string(), "Grace".to_string()),
                    ("Email".to_string(), "grace@example.com".to_string()),
                ]),
            ],
            updated: "Aug 26, 2025".to_string(),
        }
    }

    fn map_with_custom_role() -> VariableMap {
        let mut map = VariableMap::new();
        map.add(
            "Perk",
            VariableKind::Custom,
            AddOptions {
                value: Some("Gym".to_string()),
                overrides: BTreeMap::from([(ListId::from("7"), "Car".to_string())]),
                ..AddOptions::default()
            },
        );
        map.add(
            "Signature",
            VariableKind::Global,
            AddOptions::with_value("Regards, Talent Team"),
        );
        map.on_columns_discovered(
            &["First Name".to_string(), "Email".to_string()],
            false,
            Some(&ListId::from("7")),
        );
        map
    }

    fn template() -> Template {
        Template::new(
            "Offer",
            "Hi {First_Name}",
            "Dear {First_Name}, your perk: {Perk}. {Signature}",
            "",
        )
    }

    mod reconciliation {
        use super::*;

        #[test]
        fn selecting_a_list_seeds_its_defaults() {
            let map = map_with_custom_role();
            let mut session = ComposeSession::new();

            session.select_list(&map, Some(list("7")));
            assert_eq!(session.custom_values().get("Perk").unwrap(), "Car");

            session.select_list(&map, Some(list("9")));
            assert_eq!(session.custom_values().get("Perk").unwrap(), "Gym");
        }

        #[test]
        fn switching_lists_discards_edits() {
            let map = map_with_custom_role();
            let mut session = ComposeSession::new();
            session.select_list(&map, Some(list("7")));

            session.set_custom_value("Perk", "Bike");
            session.select_list(&map, Some(list("9")));
            assert_eq!(session.custom_values().get("Perk").unwrap(), "Gym");
        }

        #[test]
        fn untouched_fields_follow_a_changed_default() {
            let mut map = map_with_custom_role();
            let mut session = ComposeSession::new();
            session.select_list(&map, Some(list("9")));
            assert_eq!(session.custom_values().get("Perk").unwrap(), "Gym");

            map.set_value("Perk", "Pool");
            session.refresh(&map);
            assert_eq!(session.custom_values().get("Perk").unwrap(), "Pool");
        }

        #[test]
        fn edited_fields_survive_a_changed_default() {
            let mut map = map_with_custom_role();
            let mut session = ComposeSession::new();
            session.select_list(&map, Some(list("9")));

            session.set_custom_value("Perk", "Bike");
            map.set_value("Perk", "Pool");
            session.refresh(&map);
            assert_eq!(session.custom_values().get("Perk").unwrap(), "Bike");
        }

        #[test]
        fn removed_variables_drop_and_new_ones_seed() {
            let mut map = map_with_custom_role();
            let mut session = ComposeSession::new();
            session.select_list(&map, Some(list("9")));

            map.delete("Perk");
            map.add("Badge", VariableKind::Custom, AddOptions::with_value("Gold"));
            session.refresh(&map);

            assert!(session.custom_values().get("Perk").is_none());
            assert_eq!(session.custom_values().get("Badge").unwrap(), "Gold");
        }

        #[test]
        fn reset_restores_current_defaults() {
            let map = map_with_custom_role();
            let mut session = ComposeSession::new();
            session.select_list(&map, Some(list("7")));

            session.set_custom_value("Perk", "Bike");
            session.reset_custom_values();
            assert_eq!(session.custom_values().get("Perk").unwrap(), "Car");
        }
    }

    mod resolution {
        use super::*;

        #[test]
        fn preview_resolves_against_the_first_row() {
            let map = map_with_custom_role();
            let mut session = ComposeSession::new();
            session.select_template(Some(template()));
            assert!(session.preview(&map).is_none());

            session.select_list(&map, Some(list("7")));
            let preview = session.preview(&map).unwrap();
            assert_eq!(preview.subject, "Hi Ada");
            assert_eq!(
                preview.text,
                "Dear Ada, your perk: Car. Regards, Talent Team"
            );
            assert!(preview.html.is_empty());
        }

        #[test]
        fn custom_edits_take_precedence_over_globals() {
            let map = map_with_custom_role();
            let mut session = ComposeSession::new();
            session.select_template(Some(template()));
            session.select_list(&map, Some(list("7")));
            session.set_custom_value("Perk", "Bike");

            let overrides = session.effective_overrides(&map);
            assert_eq!(overrides.get("Perk").unwrap(), "Bike");
            assert_eq!(overrides.get("Signature").unwrap(), "Regards, Talent Team");

            let preview = session.preview(&map).unwrap();
            assert!(preview.text.contains("your perk: Bike"));
        }

        #[test]
        fn html_only_templates_derive_their_text_body() {
            let map = map_with_custom_role();
            let mut session = ComposeSession::new();
            session.select_template(Some(Template::new(
                "Offer",
                "Hi {First_Name}",
                "",
                "<p>Dear {First_Name}</p>",
            )));
            session.select_list(&map, Some(list("7")));

            let preview = session.preview(&map).unwrap();
            assert_eq!(preview.html, "<p>Dear Ada</p>");
            assert!(preview.text.contains("Dear Ada"));
            assert!(!preview.text.contains('<'));
        }
    }

    mod payload {
        use super::*;

        #[test]
        fn records_are_flattened_and_overlaid() {
            let map = map_with_custom_role();
            let mut session = ComposeSession::new();
            session.select_template(Some(template()));
            session.select_list(&map, Some(list("7")));

            let records = session.candidate_payload(&map);
            assert_eq!(records.len(), 2);

            let first = &records[0];
            // Raw and normalized row keys are both present.
            assert_eq!(first.get("First Name").unwrap(), "Ada");
            assert_eq!(first.get("First_Name").unwrap(), "Ada");
            // Overrides are flattened in.
            assert_eq!(first.get("Perk").unwrap(), "Car");
            assert_eq!(first.get("Signature").unwrap(), "Regards, Talent Team");
        }

        #[test]
        fn bulk_campaign_keeps_raw_templates() {
            let map = map_with_custom_role();
            let mut session = ComposeSession::new();
            session.select_template(Some(template()));
            session.select_list(&map, Some(list("7")));

            let campaign = session.bulk_campaign(&map).unwrap();
            assert_eq!(campaign.list_name, "List 7");
            assert_eq!(campaign.subject, "Hi {First_Name}");
            assert!(campaign.text.contains("{Perk}"));
            // No HTML body: the text body stands in for it.
            assert_eq!(campaign.html, campaign.text);
        }
    }

    mod status {
        use super::*;

        #[tokio::test]
        async fn missing_session_surfaces_before_dispatch() {
            let map = map_with_custom_role();
            let mut session = ComposeSession::new();
            session.select_template(Some(template()));
            session.select_list(&map, Some(list("7")));

            // No token installed: the error is local, no request leaves.
            let client = ApiClient::new("http://localhost:4000").unwrap();
            session.send_bulk(&map, &client).await;

            match session.status() {
                SendStatus::Error { text } => {
                    assert!(text.contains("Session expired"), "{text}");
                }
                other => panic!("expected error status, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn send_without_selections_stays_idle() {
            let map = map_with_custom_role();
            let mut session = ComposeSession::new();
            let client = ApiClient::new("http://localhost:4000").unwrap();

            session.send_bulk(&map, &client).await;
            assert_eq!(session.status(), &SendStatus::Idle);
        }

        #[test]
        fn terminal_states_expire_back_to_idle() {
            let mut session = ComposeSession::new();
            session.set_status(SendStatus::Success {
                text: "Campaign sent".to_string(),
                sent: 2,
                failed: 0,
            });
            assert!(session.status().is_terminal());

            session.status_since = Some(Instant::now() - STATUS_DISPLAY);
            assert_eq!(session.status(), &SendStatus::Idle);
        }

        #[test]
        fn loading_never_expires() {
            let mut session = ComposeSession::new();
            session.set_status(SendStatus::Loading {
                text: "Sending campaign...".to_string(),
            });
            session.status_since = Some(Instant::now() - STATUS_DISPLAY);
            assert!(session.status().is_loading());
        }
    }
}
