//! Reusable message templates.
//!
//! Templates are independent of the variable system except that their text
//! carries `{Name}` placeholders resolved at render time.

mod model;
mod store;

pub use model::{Template, TemplateId, TemplateValidationError, validate_template};
pub use store::TemplateStore;
