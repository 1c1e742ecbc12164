//! Template model and validation.

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The string encoding of this id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TemplateId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reusable message content.
///
/// At least one body format must be present; [`validate_template`] enforces
/// this before a template reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Unique, stable id.
    pub id: TemplateId,
    /// Display name.
    pub name: String,
    /// Subject line; may carry placeholders.
    pub subject: String,
    /// Plain-text body; may be empty when an HTML body exists.
    #[serde(default)]
    pub body_text: String,
    /// HTML body; may be empty when a text body exists.
    #[serde(default)]
    pub body_html: String,
    /// Human-readable last-modified date.
    #[serde(default)]
    pub updated: String,
}

impl Template {
    /// Creates a template with a fresh id and today's date stamp.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        subject: impl Into<String>,
        body_text: impl Into<String>,
        body_html: impl Into<String>,
    ) -> Self {
        Self {
            id: TemplateId::generate(),
            name: name.into(),
            subject: subject.into(),
            body_text: body_text.into(),
            body_html: body_html.into(),
            updated: today(),
        }
    }
}

pub(crate) fn today() -> String {
    Local::now().format("%b %-d, %Y").to_string()
}

/// Validation error for a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValidationError {
    /// Template name is empty.
    EmptyName,
    /// Subject line is empty.
    EmptySubject,
    /// Neither body format is present.
    MissingBody,
}

impl TemplateValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyName => "Template name is required",
            Self::EmptySubject => "Subject line is required",
            Self::MissingBody => "A text or HTML body is required",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptySubject => "subject",
            Self::MissingBody => "body",
        }
    }
}

impl std::fmt::Display for TemplateValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for TemplateValidationError {}

/// Validate a template.
///
/// Returns `Ok(())` if valid, or all failing checks at once.
///
/// # Errors
///
/// Returns a vector of `TemplateValidationError` if any fields are invalid.
pub fn validate_template(template: &Template) -> Result<(), Vec<TemplateValidationError>> {
    let mut errors = Vec::new();

    if template.name.trim().is_empty() {
        errors.push(TemplateValidationError::EmptyName);
    }
    if template.subject.trim().is_empty() {
        errors.push(TemplateValidationError::EmptySubject);
    }
    if template.body_text.trim().is_empty() && template.body_html.trim().is_empty() {
        errors.push(TemplateValidationError::MissingBody);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_stamps_id_and_date() {
        let template = Template::new("Offer", "Hi {First_Name}", "body", "");
        assert!(!template.id.as_str().is_empty());
        assert!(!template.updated.is_empty());
        assert_ne!(template.id, Template::new("Offer", "s", "b", "").id);
    }

    #[test]
    fn validate_accepts_either_body_format() {
        let text_only = Template::new("Offer", "Subject", "body", "");
        assert!(validate_template(&text_only).is_ok());

        let html_only = Template::new("Offer", "Subject", "", "<p>body</p>");
        assert!(validate_template(&html_only).is_ok());
    }

    #[test]
    fn validate_collects_every_failure() {
        let empty = Template::new("", "", "", "");
        let errors = validate_template(&empty).unwrap_err();
        assert!(errors.contains(&TemplateValidationError::EmptyName));
        assert!(errors.contains(&TemplateValidationError::EmptySubject));
        assert!(errors.contains(&TemplateValidationError::MissingBody));
        assert_eq!(TemplateValidationError::MissingBody.field(), "body");
    }

    #[test]
    fn persisted_shape_is_camel_case() {
        let template = Template::new("Offer", "Subject", "text", "<p>html</p>");
        let json = serde_json::to_value(&template).unwrap();
        assert_eq!(json["bodyText"], "text");
        assert_eq!(json["bodyHtml"], "<p>html</p>");
    }
}
