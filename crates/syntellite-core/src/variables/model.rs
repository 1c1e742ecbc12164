//! Variable definition model types.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::lists::ListId;

/// Reserved built-in candidate fields.
///
/// Always present in a ready store, always candidate-typed, never deletable
/// or retypable.
pub const CORE_VARIABLES: [&str; 3] = ["Email", "Company_Name", "Role"];

/// Retired built-in names; see [`super::migrate`].
pub(crate) const LEGACY_DEFAULTS: [&str; 2] = ["Meeting_Link", "Offer_Letter_Link"];

/// The three merge-field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    /// Sourced from an uploaded contact row.
    Candidate,
    /// A fixed default applied everywhere.
    #[default]
    Global,
    /// A default plus per-list overrides.
    Custom,
}

impl VariableKind {
    /// Parse from the persisted string representation.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "candidate" => Self::Candidate,
            "custom" => Self::Custom,
            _ => Self::Global,
        }
    }

    /// Convert to the persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Candidate => "candidate",
            Self::Global => "global",
            Self::Custom => "custom",
        }
    }
}

/// A named, typed merge-field definition.
///
/// Each kind carries only its own fields; switching kinds goes through
/// [`super::VariableMap::set_type`], which re-seeds them.
///
/// The serialized shape is the persisted `"syntellite:variables:v1"` entry
/// format: a `type` tag plus camelCase fields, with empty `lists`/`overrides`
/// omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Variable {
    /// Sourced from an uploaded contact row.
    #[serde(rename_all = "camelCase")]
    Candidate {
        /// Original, pre-normalization column name.
        #[serde(default)]
        source_column: String,
        /// Whether discovery created this entry without explicit user
        /// confirmation.
        auto_imported: bool,
        /// Ids of the lists currently backing this field.
        #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
        lists: BTreeSet<ListId>,
    },
    /// A fixed default applied everywhere.
    Global {
        /// Default value.
        #[serde(default)]
        value: String,
    },
    /// A default plus per-list overrides.
    Custom {
        /// Default value.
        #[serde(default)]
        value: String,
        /// Per-list override values, keyed by list id.
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        overrides: BTreeMap<ListId, String>,
    },
}

impl Variable {
    /// The kind tag of this definition.
    #[must_use]
    pub const fn kind(&self) -> VariableKind {
        match self {
            Self::Candidate { .. } => VariableKind::Candidate,
            Self::Global { .. } => VariableKind::Global,
            Self::Custom { .. } => VariableKind::Custom,
        }
    }

    /// Whether this is a candidate-sourced field.
    #[must_use]
    pub const fn is_candidate(&self) -> bool {
        matches!(self, Self::Candidate { .. })
    }

    /// The default value of a global/custom variable.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Candidate { .. } => None,
            Self::Global { value } | Self::Custom { value, .. } => Some(value),
        }
    }

    /// The per-list overrides of a custom variable.
    #[must_use]
    pub const fn overrides(&self) -> Option<&BTreeMap<ListId, String>> {
        match self {
            Self::Custom { overrides, .. } => Some(overrides),
            _ => None,
        }
    }

    /// The backing lists of a candidate variable.
    #[must_use]
    pub const fn lists(&self) -> Option<&BTreeSet<ListId>> {
        match self {
            Self::Candidate { lists, .. } => Some(lists),
            _ => None,
        }
    }
}

/// Optional fields accepted by [`super::VariableMap::add`].
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// Default value for global/custom variables.
    pub value: Option<String>,
    /// Original column name for candidate variables.
    pub source_column: Option<String>,
    /// Discovery marker for candidate variables.
    pub auto_imported: Option<bool>,
    /// Backing lists for candidate variables.
    pub lists: Vec<ListId>,
    /// Per-list overrides merged into custom variables.
    pub overrides: BTreeMap<ListId, String>,
}

impl AddOptions {
    /// Options carrying only a default value.
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }
}
