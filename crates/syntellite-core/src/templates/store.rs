//! Persisted template collection.

use std::sync::Arc;

use tracing::warn;

use crate::storage::{Storage, keys};

use super::model::{Template, TemplateId, TemplateValidationError, today, validate_template};

/// Persisted collection of message templates.
///
/// Seeds the stock recruiting templates when nothing usable is persisted.
/// Writes are best-effort like every store in this crate.
pub struct TemplateStore {
    templates: Vec<Template>,
    storage: Arc<dyn Storage>,
}

impl TemplateStore {
    /// Loads the persisted templates, falling back to the stock set.
    pub async fn load(storage: Arc<dyn Storage>) -> Self {
        let templates = match storage.get(keys::TEMPLATES).await {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(templates) => templates,
                Err(error) => {
                    warn!("persisted templates are unreadable, seeding defaults: {error}");
                    default_templates()
                }
            },
            None => default_templates(),
        };
        Self { templates, storage }
    }

    /// Iterates the templates in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    /// Looks up a template by id.
    #[must_use]
    pub fn get(&self, id: &TemplateId) -> Option<&Template> {
        self.templates.iter().find(|template| &template.id == id)
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the store holds no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Validates and saves a template, replacing any existing one with the
    /// same id and stamping its modification date.
    ///
    /// # Errors
    ///
    /// Returns every failing validation check; the store is not touched.
    pub async fn add_or_update(
        &mut self,
        mut template: Template,
    ) -> Result<(), Vec<TemplateValidationError>> {
        validate_template(&template)?;

        template.updated = today();
        match self
            .templates
            .iter_mut()
            .find(|existing| existing.id == template.id)
        {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
        self.persist().await;
        Ok(())
    }

    /// Removes a template. Returns false if the id is unknown.
    pub async fn remove(&mut self, id: &TemplateId) -> bool {
        let Some(index) = self
            .templates
            .iter()
            .position(|template| &template.id == id)
        else {
            return false;
        };
        self.templates.remove(index);
        self.persist().await;
        true
    }

    async fn persist(&self) {
        let blob = match serde_json::to_string(&self.templates) {
            Ok(blob) => blob,
            Err(error) => {
                warn!("failed to serialize templates: {error}");
                return;
            }
        };
        if let Err(error) = self.storage.set(keys::TEMPLATES, &blob).await {
            warn!("failed to persist templates: {error}");
        }
    }
}

/// The stock recruiting templates shipped with a fresh console.
fn default_templates() -> Vec<Template> {
    vec![
        Template {
            id: TemplateId::from("offer-v3"),
            name: "Offer v3".to_string(),
            subject: "Congratulations {First_Name} - Offer from {Company_Name}".to_string(),
            body_text: "Dear {First_Name},\n\nWe are excited to extend an offer for the {Role} \
                        position.\nPlease review the attached details and let us know if you \
                        have any questions.\n\nRegards,\nTalent Team"
                .to_string(),
            body_html: "<p>Dear {First_Name},</p><p>We are excited to extend an offer for the \
                        {Role} position.</p><p>Please review the attached details and let us \
                        know if you have any questions.</p><p>Regards,<br/>Talent Team</p>"
                .to_string(),
            updated: String::new(),
        },
        Template {
            id: TemplateId::from("rejection-v2"),
            name: "Rejection v2".to_string(),
            subject: "Application Update - {Company_Name}".to_string(),
            body_text: "Dear {First_Name},\n\nThank you for applying for the {Role} position.\n\
                        After careful consideration we will not be moving forward at this \
                        time.\n\nRegards,\nTalent Team"
                .to_string(),
            body_html: "<p>Dear {First_Name},</p><p>Thank you for applying for the {Role} \
                        position.</p><p>After careful consideration we will not be moving \
                        forward at this time.</p><p>Regards,<br/>Talent Team</p>"
                .to_string(),
            updated: String::new(),
        },
        Template {
            id: TemplateId::from("interview-v1"),
            name: "Interview v1".to_string(),
            subject: "Interview Schedule - {Company_Name}".to_string(),
            body_text: "Dear {First_Name},\n\nWe would like to invite you to interview for the \
                        {Role} position.\nPlease reply with your availability so we can confirm \
                        a slot.\n\nRegards,\nTalent Team"
                .to_string(),
            body_html: "<p>Dear {First_Name},</p><p>We would like to invite you to interview \
                        for the {Role} position.</p><p>Please reply with your availability so \
                        we can confirm a slot.</p><p>Regards,<br/>Talent Team</p>"
                .to_string(),
            updated: String::new(),
        },
    ]
}
