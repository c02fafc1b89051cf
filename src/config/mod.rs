//! Configuration system: compile-time constants plus runtime
//! preferences read from `CCA_*` environment variables.

pub mod constants;
pub mod runtime;

pub use runtime::{LexicalPreferences, SimplifyPreferences};
