//! Candidate list model types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One contact record: raw column name to cell value.
pub type Row = BTreeMap<String, String>;

/// Opaque identifier of an uploaded candidate list.
///
/// Always compared as a string; the same string keys the `lists`
/// back-references and the per-list overrides of custom variables.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(String);

impl ListId {
    /// Creates a fresh unique id.
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The string encoding of this id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ListId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ListId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An uploaded contact source.
#[derive(Debug, Clone)]
pub struct CandidateList {
    /// Unique, stable id.
    pub id: ListId,
    /// Display name (upload file name without its extension).
    pub name: String,
    /// Raw column names in source-file order.
    pub columns: Vec<String>,
    /// Contact records in source-file order.
    pub rows: Vec<Row>,
    /// Human-readable upload date.
    pub updated: String,
}

impl CandidateList {
    /// The first contact row, used for previews.
    #[must_use]
    pub fn sample_row(&self) -> Option<&Row> {
        self.rows.first()
    }
}
