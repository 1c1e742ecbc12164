//! # syntellite-core
//!
//! Core business logic for the Syntellite campaign console.
//!
//! This crate provides:
//! - **Merge-field engine** - typed variable definitions, placeholder
//!   resolution, and legacy-state migration
//! - **Candidate lists** - CSV import/export and list ownership
//! - **Templates** - reusable message content with merge placeholders
//! - **Provider profiles** - SMTP provider presets, validation, and backend
//!   sync
//! - **Storage port** - injected key-value persistence with SQLite and
//!   in-memory implementations
//! - **Services** - column import selection, campaign composition, and the
//!   auth session
//!
//! The actual delivery, persistence of logs, and authentication live in the
//! external backend reached through [`syntellite_api`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod html;
pub mod lists;
pub mod normalize;
pub mod provider;
pub mod service;
pub mod storage;
pub mod templates;
pub mod variables;

pub use error::{Error, Result};
pub use html::html_to_text;
pub use lists::{CandidateList, CandidateListRegistry, ListId, Row};
pub use normalize::normalize;
pub use provider::{
    ProviderId, ProviderStore, ProviderValidationError, SMTP_PRESETS, SmtpPreset, SmtpProvider,
    detect_preset, validate_provider,
};
pub use service::{
    AuthState, ColumnImport, ComposeSession, ImportOutcome, ResolvedPreview, SendStatus,
    column_states, custom_defaults, global_values, import_columns, is_column_imported,
    remove_list,
};
pub use storage::{MemoryStorage, SqliteStorage, Storage};
pub use templates::{
    Template, TemplateId, TemplateStore, TemplateValidationError, validate_template,
};
pub use variables::{
    AddOptions, CORE_VARIABLES, Variable, VariableKind, VariableMap, VariableStore,
    resolve_template,
};
