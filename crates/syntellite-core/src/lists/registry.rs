//! Candidate list ownership and CSV import/export.

use chrono::Local;
use tracing::debug;

use crate::error::{Error, Result};

use super::codec;
use super::model::{CandidateList, ListId};

/// Owns the ordered collection of uploaded candidate lists.
///
/// Importing a list only makes its columns *available*; exposing them as
/// candidate variables is a separate, user-confirmed action (see
/// [`crate::service::import_columns`]).
#[derive(Debug, Default)]
pub struct CandidateListRegistry {
    lists: Vec<CandidateList>,
}

impl CandidateListRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses CSV bytes into a new list and appends it.
    ///
    /// The list name is the file name without its `.csv`/`.xlsx` extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV cannot be parsed or contains a header but
    /// no contact rows.
    pub fn import(&mut self, file_name: &str, data: &[u8]) -> Result<&CandidateList> {
        let (columns, rows) = codec::parse(data)?;
        if rows.is_empty() {
            return Err(Error::EmptyList);
        }

        let list = CandidateList {
            id: ListId::generate(),
            name: strip_extension(file_name),
            columns,
            rows,
            updated: Local::now().format("%b %-d, %Y").to_string(),
        };
        debug!("imported list {} ({} rows)", list.name, list.rows.len());
        self.lists.push(list);
        Ok(&self.lists[self.lists.len() - 1])
    }

    /// Removes a list and returns it.
    ///
    /// The caller is responsible for cascading into the variable store via
    /// `on_list_removed`; [`crate::service::remove_list`] does both.
    pub fn remove(&mut self, id: &ListId) -> Option<CandidateList> {
        let index = self.lists.iter().position(|list| &list.id == id)?;
        Some(self.lists.remove(index))
    }

    /// Looks up a list by id.
    #[must_use]
    pub fn get(&self, id: &ListId) -> Option<&CandidateList> {
        self.lists.iter().find(|list| &list.id == id)
    }

    /// Writes a list back out as CSV text.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is unknown or the CSV cannot be written.
    pub fn export(&self, id: &ListId) -> Result<String> {
        let list = self
            .get(id)
            .ok_or_else(|| Error::ListNotFound(id.to_string()))?;
        codec::unparse(&list.columns, &list.rows)
    }

    /// Iterates the lists in upload order.
    pub fn iter(&self) -> impl Iterator<Item = &CandidateList> {
        self.lists.iter()
    }

    /// Number of lists.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Whether the registry holds no lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

/// Strips a trailing `.csv`/`.xlsx` extension, case-insensitively.
fn strip_extension(file_name: &str) -> String {
    let lower = file_name.to_lowercase();
    for extension in [".csv", ".xlsx"] {
        if lower.ends_with(extension) {
            return file_name[..file_name.len() - extension.len()].to_string();
        }
    }
    file_name.to_string()
}
