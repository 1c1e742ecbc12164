//! Column import selection for a previewed contact list.
//!
//! Uploading a list only makes its columns available. Exposing a column as
//! a candidate variable is a separate, user-confirmed action handled here,
//! one multi-selection at a time.

use crate::lists::{CandidateList, CandidateListRegistry, ListId};
use crate::normalize::normalize;
use crate::variables::{Variable, VariableMap, VariableStore};

/// Import state of one column of a previewed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnImport {
    /// Raw column name as it appeared in the file.
    pub column: String,
    /// Whether a candidate variable backed by this list already covers it.
    pub imported: bool,
}

/// Outcome of confirming a column selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Nothing was selected; nothing to do.
    NothingSelected,
    /// Every selected column was already available; informational, not an
    /// error.
    AlreadyImported,
    /// This many columns were newly exposed as variables.
    Imported(usize),
}

/// Whether a column of `list` is already exposed as a candidate variable.
///
/// True when a candidate definition exists under the column's key, is
/// backed by this list, and still points at a column that normalizes to the
/// same key.
#[must_use]
pub fn is_column_imported(map: &VariableMap, list: &CandidateList, column: &str) -> bool {
    let key = normalize(column);
    match map.get(&key) {
        Some(Variable::Candidate {
            source_column,
            lists,
            ..
        }) => {
            lists.contains(&list.id)
                && (source_column.is_empty() || normalize(source_column) == key)
        }
        _ => false,
    }
}

/// Import states for every column of a previewed list, in file order.
#[must_use]
pub fn column_states(map: &VariableMap, list: &CandidateList) -> Vec<ColumnImport> {
    list.columns
        .iter()
        .map(|column| ColumnImport {
            column: column.clone(),
            imported: is_column_imported(map, list, column),
        })
        .collect()
}

/// Confirms a multi-selection of columns for import.
///
/// Columns already backed by this list are filtered out before the store is
/// touched; re-confirming them alone yields
/// [`ImportOutcome::AlreadyImported`]. The remainder is pushed through
/// column discovery with `auto_imported = false`.
pub async fn import_columns(
    store: &mut VariableStore,
    list: &CandidateList,
    selected: &[String],
) -> ImportOutcome {
    if selected.is_empty() {
        return ImportOutcome::NothingSelected;
    }

    let pending: Vec<String> = selected
        .iter()
        .filter(|column| {
            let key = normalize(column);
            match store.map().get(&key) {
                Some(Variable::Candidate { lists, .. }) => !lists.contains(&list.id),
                _ => true,
            }
        })
        .cloned()
        .collect();

    if pending.is_empty() {
        return ImportOutcome::AlreadyImported;
    }

    let count = pending.len();
    store
        .on_columns_discovered(&pending, false, Some(&list.id))
        .await;
    ImportOutcome::Imported(count)
}

/// Removes a list and cascades into the variable store.
pub async fn remove_list(
    registry: &mut CandidateListRegistry,
    store: &mut VariableStore,
    id: &ListId,
) -> Option<CandidateList> {
    let removed = registry.remove(id)?;
    store.on_list_removed(id).await;
    Some(removed)
}
