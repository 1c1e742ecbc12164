//! Persistence wrapper around the variable map.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::lists::{ListId, Row};
use crate::storage::{Storage, keys};

use super::map::VariableMap;
use super::migrate::migrate;
use super::model::{AddOptions, Variable, VariableKind};

/// The variable store: a [`VariableMap`] plus an injected storage port.
///
/// Constructed through [`VariableStore::load`], which reads the persisted
/// blob, migrates it, and seeds the core set before the store becomes
/// usable. Every mutation that changes the map is written back through the
/// port; a failed write is logged and swallowed, leaving the in-memory
/// state authoritative for the session.
pub struct VariableStore {
    map: VariableMap,
    storage: Arc<dyn Storage>,
}

impl VariableStore {
    /// Loads, migrates, and readies the store.
    ///
    /// Absent or malformed persisted data falls back to the core-only map.
    /// The blob is rewritten immediately only when migration or core
    /// seeding actually changed it.
    pub async fn load(storage: Arc<dyn Storage>) -> Self {
        let (entries, mut dirty) = match storage.get(keys::VARIABLES).await {
            None => (BTreeMap::new(), false),
            Some(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(saved)) => migrate(saved),
                _ => {
                    warn!("persisted variables are not a JSON object; starting fresh");
                    (BTreeMap::new(), false)
                }
            },
        };

        let mut map = VariableMap::from_entries(entries);
        dirty |= map.ensure_core();

        let store = Self { map, storage };
        if dirty {
            debug!("migrated persisted variables");
            store.persist().await;
        }
        store
    }

    /// Read access to the definitions.
    #[must_use]
    pub const fn map(&self) -> &VariableMap {
        &self.map
    }

    /// True iff the normalized name is in the reserved core set.
    #[must_use]
    pub fn is_core(&self, name: &str) -> bool {
        self.map.is_core(name)
    }

    /// Creates or updates a variable. See [`VariableMap::add`].
    pub async fn add(&mut self, raw_name: &str, kind: VariableKind, options: AddOptions) {
        if self.map.add(raw_name, kind, options) {
            self.persist().await;
        }
    }

    /// Removes a variable. Returns false for core or absent names.
    pub async fn delete(&mut self, raw_name: &str) -> bool {
        let removed = self.map.delete(raw_name);
        if removed {
            self.persist().await;
        }
        removed
    }

    /// Switches a variable's kind. See [`VariableMap::set_type`].
    pub async fn set_type(&mut self, raw_name: &str, kind: VariableKind) {
        if self.map.set_type(raw_name, kind) {
            self.persist().await;
        }
    }

    /// Overwrites a global/custom default value.
    pub async fn set_value(&mut self, raw_name: &str, value: &str) {
        if self.map.set_value(raw_name, value) {
            self.persist().await;
        }
    }

    /// Sets a per-list override on a custom variable.
    pub async fn set_override(&mut self, raw_name: &str, list: &ListId, value: &str) {
        if self.map.set_override(raw_name, list, value) {
            self.persist().await;
        }
    }

    /// Clears a per-list override on a custom variable.
    pub async fn clear_override(&mut self, raw_name: &str, list: &ListId) {
        if self.map.clear_override(raw_name, list) {
            self.persist().await;
        }
    }

    /// Reconciles discovered CSV columns. See
    /// [`VariableMap::on_columns_discovered`].
    pub async fn on_columns_discovered(
        &mut self,
        columns: &[String],
        auto_imported: bool,
        list_id: Option<&ListId>,
    ) {
        if self.map.on_columns_discovered(columns, auto_imported, list_id) {
            self.persist().await;
        }
    }

    /// Cascades a list removal. See [`VariableMap::on_list_removed`].
    pub async fn on_list_removed(&mut self, list_id: &ListId) {
        if self.map.on_list_removed(list_id) {
            self.persist().await;
        }
    }

    /// Substitutes this store's definitions into a template.
    #[must_use]
    pub fn resolve(
        &self,
        template: &str,
        candidate_row: &Row,
        overrides: &BTreeMap<String, String>,
    ) -> String {
        self.map.resolve(template, candidate_row, overrides)
    }

    /// Best-effort write-back of the full map.
    async fn persist(&self) {
        let blob = match serde_json::to_string(self.map.entries()) {
            Ok(blob) => blob,
            Err(error) => {
                warn!("failed to serialize variables: {error}");
                return;
            }
        };
        if let Err(error) = self.storage.set(keys::VARIABLES, &blob).await {
            warn!("failed to persist variables: {error}");
        }
    }
}
