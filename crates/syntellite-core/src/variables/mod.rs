//! Merge-field definitions and resolution.
//!
//! This module is the rule engine behind template personalization: it
//! classifies named placeholders into three kinds (candidate-sourced,
//! global, custom-with-per-list-override), reconciles them against
//! discovered CSV columns, and substitutes them into free text.

mod map;
mod migrate;
mod model;
mod resolve;
mod store;

pub use map::VariableMap;
pub use model::{AddOptions, CORE_VARIABLES, Variable, VariableKind};
pub use resolve::resolve_template;
pub use store::VariableStore;
