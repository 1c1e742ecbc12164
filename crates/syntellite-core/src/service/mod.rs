//! Cross-store orchestration.
//!
//! The screens of the console drive these services; each one coordinates
//! the stores and the backend client without owning any state of its own
//! beyond the compose session.

mod compose;
mod import;
mod session;

pub use compose::{ComposeSession, ResolvedPreview, SendStatus, custom_defaults, global_values};
pub use import::{
    ColumnImport, ImportOutcome, column_states, import_columns, is_column_imported, remove_list,
};
pub use session::AuthState;
