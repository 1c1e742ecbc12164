//! The pure merge-field rule engine.

use std::collections::{BTreeMap, BTreeSet};

use crate::lists::{ListId, Row};
use crate::normalize::normalize;

use super::model::{AddOptions, CORE_VARIABLES, Variable, VariableKind};
use super::resolve::resolve_template;

/// In-memory variable definitions and the operations over them.
///
/// Owns no I/O: every mutator reports whether the map actually changed, and
/// [`super::VariableStore`] persists on that signal. Raw names are
/// normalized internally, so callers may pass `{First Name}`, `First Name`,
/// or `First_Name` interchangeably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableMap {
    vars: BTreeMap<String, Variable>,
}

impl VariableMap {
    /// Creates a map holding exactly the core variables.
    #[must_use]
    pub fn new() -> Self {
        let mut map = Self {
            vars: BTreeMap::new(),
        };
        map.ensure_core();
        map
    }

    /// Wraps already-decoded entries; the caller runs [`Self::ensure_core`].
    pub(crate) const fn from_entries(vars: BTreeMap<String, Variable>) -> Self {
        Self { vars }
    }

    /// Seeds any missing core variable and re-types a corrupted one.
    ///
    /// Returns true if anything changed.
    pub(crate) fn ensure_core(&mut self) -> bool {
        let mut changed = false;
        for name in CORE_VARIABLES {
            let ok = self.vars.get(name).is_some_and(Variable::is_candidate);
            if !ok {
                self.vars.insert(
                    name.to_string(),
                    Variable::Candidate {
                        source_column: name.to_string(),
                        auto_imported: false,
                        lists: BTreeSet::new(),
                    },
                );
                changed = true;
            }
        }
        changed
    }

    /// True iff the normalized name is in the reserved core set.
    #[must_use]
    pub fn is_core(&self, name: &str) -> bool {
        CORE_VARIABLES.contains(&normalize(name).as_str())
    }

    /// Looks up a definition by raw or canonical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.get(&normalize(name))
    }

    /// Canonical names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Iterates `(canonical name, definition)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.vars.iter().map(|(name, var)| (name.as_str(), var))
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the map holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub(crate) const fn entries(&self) -> &BTreeMap<String, Variable> {
        &self.vars
    }

    /// Creates or updates a variable. Returns true if the map changed.
    ///
    /// An existing variable keeps its identity: values/overrides/source
    /// column are updated in place, and the kind only changes when the name
    /// is not core. A new name becomes a candidate whenever that kind is
    /// requested or the name is core. A name that normalizes to the empty
    /// string is a silent no-op.
    pub fn add(&mut self, raw_name: &str, kind: VariableKind, options: AddOptions) -> bool {
        let name = normalize(raw_name);
        if name.is_empty() {
            return false;
        }

        let next = match self.vars.get(&name) {
            Some(existing) => {
                let kind = if self.is_core(&name) {
                    existing.kind()
                } else {
                    kind
                };
                rebuild(existing, kind, raw_name, &options)
            }
            None if kind == VariableKind::Candidate || self.is_core(&name) => {
                Variable::Candidate {
                    source_column: options
                        .source_column
                        .unwrap_or_else(|| raw_name.to_string()),
                    auto_imported: options.auto_imported.unwrap_or(false),
                    lists: options.lists.into_iter().collect(),
                }
            }
            None => {
                let value = options.value.unwrap_or_default();
                match kind {
                    VariableKind::Custom => Variable::Custom {
                        value,
                        overrides: options.overrides,
                    },
                    _ => Variable::Global { value },
                }
            }
        };

        self.insert_if_changed(name, next)
    }

    /// Removes a variable.
    ///
    /// Returns false and makes no change if the name is core or absent.
    pub fn delete(&mut self, raw_name: &str) -> bool {
        let name = normalize(raw_name);
        if self.is_core(&name) {
            return false;
        }
        self.vars.remove(&name).is_some()
    }

    /// Switches a variable's kind, re-seeding kind-specific fields.
    ///
    /// No-op if the variable is absent or core. Returns true if the map
    /// changed.
    pub fn set_type(&mut self, raw_name: &str, kind: VariableKind) -> bool {
        let name = normalize(raw_name);
        if self.is_core(&name) {
            return false;
        }
        let Some(current) = self.vars.get(&name) else {
            return false;
        };
        let next = rebuild(current, kind, raw_name, &AddOptions::default());
        self.insert_if_changed(name, next)
    }

    /// Overwrites the default value of a global/custom variable.
    ///
    /// No-op if the variable is absent or candidate-typed; candidate values
    /// come from contact rows, never from here.
    pub fn set_value(&mut self, raw_name: &str, value: &str) -> bool {
        let name = normalize(raw_name);
        match self.vars.get_mut(&name) {
            Some(Variable::Global { value: current } | Variable::Custom { value: current, .. })
                if current != value =>
            {
                *current = value.to_string();
                true
            }
            _ => false,
        }
    }

    /// Sets a per-list override on a custom variable.
    pub fn set_override(&mut self, raw_name: &str, list: &ListId, value: &str) -> bool {
        let name = normalize(raw_name);
        if list.as_str().is_empty() {
            return false;
        }
        match self.vars.get_mut(&name) {
            Some(Variable::Custom { overrides, .. }) => {
                overrides.insert(list.clone(), value.to_string()) != Some(value.to_string())
            }
            _ => false,
        }
    }

    /// Clears a per-list override on a custom variable.
    ///
    /// Removes the key entirely; an emptied override set is dropped from the
    /// persisted shape, not kept as an empty value.
    pub fn clear_override(&mut self, raw_name: &str, list: &ListId) -> bool {
        let name = normalize(raw_name);
        match self.vars.get_mut(&name) {
            Some(Variable::Custom { overrides, .. }) => overrides.remove(list).is_some(),
            _ => false,
        }
    }

    /// Reconciles discovered CSV columns into candidate variables.
    ///
    /// A user-promoted (non-candidate) variable at a discovered key is left
    /// untouched. An existing candidate keeps its source column and
    /// discovery marker and gains the list id. A new key becomes a candidate
    /// with the supplied marker.
    pub fn on_columns_discovered(
        &mut self,
        columns: &[String],
        auto_imported: bool,
        list_id: Option<&ListId>,
    ) -> bool {
        let mut changed = false;
        for column in columns {
            let key = normalize(column);
            if key.is_empty() {
                continue;
            }
            match self.vars.get_mut(&key) {
                Some(Variable::Candidate { lists, .. }) => {
                    if let Some(id) = list_id {
                        changed |= lists.insert(id.clone());
                    }
                }
                Some(_) => {}
                None => {
                    self.vars.insert(
                        key,
                        Variable::Candidate {
                            source_column: column.clone(),
                            auto_imported,
                            lists: list_id.cloned().into_iter().collect(),
                        },
                    );
                    changed = true;
                }
            }
        }
        changed
    }

    /// Cascades a list removal through the candidate variables.
    ///
    /// Every candidate backed by the removed list loses that backing. A
    /// non-core candidate whose backing becomes empty and whose
    /// `auto_imported` marker is `false` is deleted outright.
    pub fn on_list_removed(&mut self, list_id: &ListId) -> bool {
        let mut removals = Vec::new();
        let mut changed = false;

        for (name, variable) in &mut self.vars {
            let Variable::Candidate {
                auto_imported,
                lists,
                ..
            } = variable
            else {
                continue;
            };
            if !lists.remove(list_id) {
                continue;
            }
            changed = true;
            if lists.is_empty() && !*auto_imported && !CORE_VARIABLES.contains(&name.as_str()) {
                removals.push(name.clone());
            }
        }

        for name in removals {
            self.vars.remove(&name);
        }
        changed
    }

    /// Substitutes this map's definitions into a template.
    ///
    /// See [`resolve_template`] for the placeholder grammar and lookup
    /// order.
    #[must_use]
    pub fn resolve(
        &self,
        template: &str,
        candidate_row: &Row,
        overrides: &BTreeMap<String, String>,
    ) -> String {
        resolve_template(template, &self.vars, candidate_row, overrides)
    }

    fn insert_if_changed(&mut self, name: String, next: Variable) -> bool {
        if self.vars.get(&name) == Some(&next) {
            return false;
        }
        self.vars.insert(name, next);
        true
    }
}

impl Default for VariableMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuilds a definition under a (possibly new) kind, updating fields from
/// `options` and pruning everything that belongs to the previous kind.
fn rebuild(current: &Variable, kind: VariableKind, raw_name: &str, options: &AddOptions) -> Variable {
    match kind {
        VariableKind::Candidate => Variable::Candidate {
            source_column: options.source_column.clone().unwrap_or_else(|| {
                match current {
                    Variable::Candidate { source_column, .. } if !source_column.is_empty() => {
                        source_column.clone()
                    }
                    _ => raw_name.to_string(),
                }
            }),
            auto_imported: options.auto_imported.unwrap_or(match current {
                Variable::Candidate { auto_imported, .. } => *auto_imported,
                _ => false,
            }),
            lists: match current {
                Variable::Candidate { lists, .. } => lists.clone(),
                _ => BTreeSet::new(),
            },
        },
        VariableKind::Global => Variable::Global {
            value: options
                .value
                .clone()
                .or_else(|| current.value().map(ToString::to_string))
                .unwrap_or_default(),
        },
        VariableKind::Custom => {
            let mut overrides = current.overrides().cloned().unwrap_or_default();
            overrides.extend(options.overrides.clone());
            Variable::Custom {
                value: options
                    .value
                    .clone()
                    .or_else(|| current.value().map(ToString::to_string))
                    .unwrap_or_default(),
                overrides,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(id: &str) -> ListId {
        ListId::from(id)
    }

    #[test]
    fn new_map_holds_the_core_set() {
        let map = VariableMap::new();
        assert_eq!(map.len(), 3);
        for name in CORE_VARIABLES {
            assert!(map.get(name).is_some_and(Variable::is_candidate));
        }
    }

    mod core_invariants {
        use super::*;

        #[test]
        fn core_names_are_detected_in_any_spelling() {
            let map = VariableMap::new();
            assert!(map.is_core("Email"));
            assert!(map.is_core("{Email}"));
            assert!(map.is_core("Company Name"));
            assert!(!map.is_core("First_Name"));
        }

        #[test]
        fn delete_refuses_core() {
            let mut map = VariableMap::new();
            assert!(!map.delete("Email"));
            assert!(map.get("Email").is_some());
        }

        #[test]
        fn set_type_refuses_core() {
            let mut map = VariableMap::new();
            assert!(!map.set_type("Role", VariableKind::Global));
            assert!(map.get("Role").is_some_and(Variable::is_candidate));
        }

        #[test]
        fn add_on_a_core_name_stays_candidate() {
            let mut map = VariableMap::new();
            map.add("Role", VariableKind::Global, AddOptions::with_value("x"));
            assert!(map.get("Role").is_some_and(Variable::is_candidate));
        }
    }

    mod add {
        use super::*;

        #[test]
        fn empty_name_is_a_silent_no_op() {
            let mut map = VariableMap::new();
            assert!(!map.add("   ", VariableKind::Global, AddOptions::default()));
            assert!(!map.add("{}", VariableKind::Global, AddOptions::default()));
            assert_eq!(map.len(), 3);
        }

        #[test]
        fn creates_global_with_default_value() {
            let mut map = VariableMap::new();
            assert!(map.add("Signature", VariableKind::Global, AddOptions::default()));
            assert_eq!(map.get("Signature").and_then(Variable::value), Some(""));
        }

        #[test]
        fn creates_custom_with_empty_overrides() {
            let mut map = VariableMap::new();
            map.add("Perk", VariableKind::Custom, AddOptions::with_value("Gym"));
            let variable = map.get("Perk").unwrap();
            assert_eq!(variable.value(), Some("Gym"));
            assert_eq!(variable.overrides().map(BTreeMap::len), Some(0));
        }

        #[test]
        fn creates_candidate_with_deduplicated_lists() {
            let mut map = VariableMap::new();
            map.add(
                "First Name",
                VariableKind::Candidate,
                AddOptions {
                    lists: vec![list("3"), list("3"), list("4")],
                    ..AddOptions::default()
                },
            );
            let variable = map.get("First_Name").unwrap();
            assert_eq!(variable.lists().map(BTreeSet::len), Some(2));
            assert!(matches!(
                variable,
                Variable::Candidate { source_column, .. } if source_column == "First Name"
            ));
        }

        #[test]
        fn updates_value_in_place() {
            let mut map = VariableMap::new();
            map.add("Perk", VariableKind::Custom, AddOptions::with_value("Gym"));
            assert!(map.add("Perk", VariableKind::Custom, AddOptions::with_value("Car")));
            assert_eq!(map.get("Perk").and_then(Variable::value), Some("Car"));
        }

        #[test]
        fn retype_through_add_prunes_old_fields() {
            let mut map = VariableMap::new();
            map.add(
                "Perk",
                VariableKind::Custom,
                AddOptions {
                    value: Some("Gym".to_string()),
                    overrides: BTreeMap::from([(list("7"), "Car".to_string())]),
                    ..AddOptions::default()
                },
            );
            map.add("Perk", VariableKind::Candidate, AddOptions::default());

            let variable = map.get("Perk").unwrap();
            assert!(variable.is_candidate());
            assert_eq!(variable.value(), None);
            assert_eq!(variable.overrides(), None);
        }

        #[test]
        fn identical_update_reports_no_change() {
            let mut map = VariableMap::new();
            map.add("Perk", VariableKind::Global, AddOptions::with_value("Gym"));
            assert!(!map.add("Perk", VariableKind::Global, AddOptions::with_value("Gym")));
        }
    }

    mod set_type {
        use super::*;

        #[test]
        fn absent_name_is_a_no_op() {
            let mut map = VariableMap::new();
            assert!(!map.set_type("Missing", VariableKind::Custom));
        }

        #[test]
        fn into_candidate_seeds_source_column_from_raw_name() {
            let mut map = VariableMap::new();
            map.add("Batch", VariableKind::Global, AddOptions::with_value("24"));
            map.set_type("Batch", VariableKind::Candidate);

            assert_eq!(
                map.get("Batch"),
                Some(&Variable::Candidate {
                    source_column: "Batch".to_string(),
                    auto_imported: false,
                    lists: BTreeSet::new(),
                })
            );
        }

        #[test]
        fn out_of_candidate_drops_source_fields_and_keeps_nothing_stale() {
            let mut map = VariableMap::new();
            map.add(
                "First Name",
                VariableKind::Candidate,
                AddOptions {
                    lists: vec![list("3")],
                    ..AddOptions::default()
                },
            );
            map.set_type("First_Name", VariableKind::Custom);

            assert_eq!(
                map.get("First_Name"),
                Some(&Variable::Custom {
                    value: String::new(),
                    overrides: BTreeMap::new(),
                })
            );
        }

        #[test]
        fn custom_to_global_drops_overrides_but_keeps_value() {
            let mut map = VariableMap::new();
            map.add(
                "Perk",
                VariableKind::Custom,
                AddOptions {
                    value: Some("Gym".to_string()),
                    overrides: BTreeMap::from([(list("7"), "Car".to_string())]),
                    ..AddOptions::default()
                },
            );
            map.set_type("Perk", VariableKind::Global);

            assert_eq!(
                map.get("Perk"),
                Some(&Variable::Global {
                    value: "Gym".to_string(),
                })
            );
        }
    }

    mod values_and_overrides {
        use super::*;

        #[test]
        fn set_value_skips_candidates() {
            let mut map = VariableMap::new();
            assert!(!map.set_value("Email", "someone@example.com"));
            assert_eq!(map.get("Email").and_then(Variable::value), None);
        }

        #[test]
        fn set_and_clear_override() {
            let mut map = VariableMap::new();
            map.add("Perk", VariableKind::Custom, AddOptions::with_value("Gym"));

            assert!(map.set_override("Perk", &list("7"), "Car"));
            assert!(!map.set_override("Perk", &list("7"), "Car"));
            assert_eq!(
                map.get("Perk").and_then(Variable::overrides),
                Some(&BTreeMap::from([(list("7"), "Car".to_string())]))
            );

            assert!(map.clear_override("Perk", &list("7")));
            assert!(!map.clear_override("Perk", &list("7")));
            assert_eq!(map.get("Perk").and_then(Variable::overrides).map(BTreeMap::len), Some(0));
        }

        #[test]
        fn overrides_only_apply_to_custom() {
            let mut map = VariableMap::new();
            map.add("Signature", VariableKind::Global, AddOptions::default());
            assert!(!map.set_override("Signature", &list("7"), "x"));
            assert!(!map.set_override("Email", &list("7"), "x"));
        }
    }

    mod discovery {
        use super::*;

        #[test]
        fn discovery_creates_candidates_with_the_list_backing() {
            let mut map = VariableMap::new();
            let changed = map.on_columns_discovered(
                &["First Name".to_string(), "Email".to_string()],
                false,
                Some(&list("1")),
            );
            assert!(changed);

            let variable = map.get("First_Name").unwrap();
            assert!(matches!(
                variable,
                Variable::Candidate { source_column, auto_imported, .. }
                    if source_column == "First Name" && !auto_imported
            ));
            assert!(variable.lists().unwrap().contains(&list("1")));
        }

        #[test]
        fn rediscovering_a_core_column_only_adds_the_list() {
            // Scenario: Email exists as a core candidate; a new upload
            // mentioning it must not alter its source column or marker.
            let mut map = VariableMap::new();
            map.on_columns_discovered(&["Email".to_string()], true, Some(&list("1")));

            assert_eq!(
                map.get("Email"),
                Some(&Variable::Candidate {
                    source_column: "Email".to_string(),
                    auto_imported: false,
                    lists: BTreeSet::from([list("1")]),
                })
            );
        }

        #[test]
        fn promoted_variables_are_never_downgraded() {
            let mut map = VariableMap::new();
            map.add("Perk", VariableKind::Custom, AddOptions::with_value("Gym"));
            let changed =
                map.on_columns_discovered(&["Perk".to_string()], false, Some(&list("1")));

            assert!(!changed);
            assert_eq!(map.get("Perk").map(Variable::kind), Some(VariableKind::Custom));
        }

        #[test]
        fn rediscovery_is_idempotent_per_list() {
            let mut map = VariableMap::new();
            let columns = vec!["City".to_string()];
            assert!(map.on_columns_discovered(&columns, false, Some(&list("1"))));
            assert!(!map.on_columns_discovered(&columns, false, Some(&list("1"))));
            assert!(map.on_columns_discovered(&columns, false, Some(&list("2"))));
        }
    }

    mod list_removal {
        use super::*;

        #[test]
        fn last_backing_list_removal_deletes_unimported_variables() {
            let mut map = VariableMap::new();
            map.on_columns_discovered(&["City".to_string()], false, Some(&list("3")));

            assert!(map.on_list_removed(&list("3")));
            assert!(map.get("City").is_none());
        }

        #[test]
        fn shrinks_but_keeps_variables_with_other_backings() {
            let mut map = VariableMap::new();
            map.on_columns_discovered(&["City".to_string()], false, Some(&list("3")));
            map.on_columns_discovered(&["City".to_string()], false, Some(&list("4")));

            assert!(map.on_list_removed(&list("3")));
            assert_eq!(
                map.get("City").and_then(Variable::lists),
                Some(&BTreeSet::from([list("4")]))
            );
        }

        #[test]
        fn keeps_auto_imported_variables_with_no_backing_left() {
            let mut map = VariableMap::new();
            map.on_columns_discovered(&["City".to_string()], true, Some(&list("3")));

            assert!(map.on_list_removed(&list("3")));
            let variable = map.get("City").unwrap();
            assert_eq!(variable.lists().map(BTreeSet::len), Some(0));
        }

        #[test]
        fn core_variables_survive_their_last_backing_list() {
            let mut map = VariableMap::new();
            map.on_columns_discovered(&["Email".to_string()], false, Some(&list("3")));

            map.on_list_removed(&list("3"));
            assert_eq!(
                map.get("Email").and_then(Variable::lists).map(BTreeSet::len),
                Some(0)
            );
        }

        #[test]
        fn unrelated_lists_report_no_change() {
            let mut map = VariableMap::new();
            map.on_columns_discovered(&["City".to_string()], false, Some(&list("3")));
            assert!(!map.on_list_removed(&list("9")));
        }
    }
}
