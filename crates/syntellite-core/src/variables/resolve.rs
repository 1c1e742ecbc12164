//! Placeholder substitution.

use std::collections::BTreeMap;

use crate::lists::Row;
use crate::normalize::normalize;

use super::model::Variable;

/// Substitutes `{token}` placeholders into a template.
///
/// Pure over its inputs and total over strings; the worst case for any
/// placeholder is the empty string, never an error.
///
/// A placeholder is a `{`, one or more non-`}` characters, and a `}`. The
/// text is scanned once, left to right; replacement values are inserted
/// literally and never re-scanned, so values containing `{...}` cannot
/// recurse. `{}` and unterminated `{` are left as literal text.
///
/// Lookup, per placeholder, after normalizing the token:
/// - no definition: empty string;
/// - candidate: the row cell under the exact key, else under the recorded
///   source column, else under the first row key (in key order) whose
///   normalized form matches — a present-but-empty cell counts as a hit;
/// - global/custom: the override for the key if present, else the default
///   value.
#[must_use]
pub fn resolve_template(
    template: &str,
    definitions: &BTreeMap<String, Variable>,
    candidate_row: &Row,
    overrides: &BTreeMap<String, String>,
) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if close > 0 => {
                let token = &after[..close];
                out.push_str(&substitute(token, definitions, candidate_row, overrides));
                rest = &after[close + 1..];
            }
            Some(_) => {
                // "{}" is not a placeholder
                out.push_str("{}");
                rest = &after[1..];
            }
            None => {
                out.push('{');
                rest = after;
                break;
            }
        }
    }

    out.push_str(rest);
    out
}

fn substitute(
    token: &str,
    definitions: &BTreeMap<String, Variable>,
    candidate_row: &Row,
    overrides: &BTreeMap<String, String>,
) -> String {
    let key = normalize(token);
    let Some(definition) = definitions.get(&key) else {
        return String::new();
    };

    match definition {
        Variable::Candidate { source_column, .. } => {
            if let Some(value) = candidate_row.get(&key) {
                return value.clone();
            }
            if !source_column.is_empty() {
                if let Some(value) = candidate_row.get(source_column) {
                    return value.clone();
                }
            }
            candidate_row
                .iter()
                .find(|(column, _)| normalize(column) == key)
                .map(|(_, value)| value.clone())
                .unwrap_or_default()
        }
        Variable::Global { value } | Variable::Custom { value, .. } => overrides
            .get(&key)
            .unwrap_or(value)
            .clone(),
    }
}
