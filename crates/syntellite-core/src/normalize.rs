//! Canonical merge-field name normalization.
//!
//! Every variable name, CSV column header, and `{placeholder}` token passes
//! through [`normalize`] before it is used as a lookup key, so
//! `{First Name}`, `{First_Name}`, and a `First_Name` column header all
//! address the same variable.

/// Canonicalizes a raw placeholder or column name into a stable key.
///
/// Strips literal `{`/`}` characters, trims surrounding whitespace, and
/// collapses internal whitespace runs to a single underscore. Idempotent:
/// `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !matches!(c, '{' | '}')).collect();
    let mut key = String::with_capacity(stripped.len());
    for part in stripped.trim().split_whitespace() {
        if !key.is_empty() {
            key.push('_');
        }
        key.push_str(part);
    }
    key
}
