//! Interactive chat mode.
//!
//! Provides a REPL-style interface with slash commands for the lookups,
//! language switching and the session log.

/// Slash command parsing and autocomplete.
pub mod command;
mod session;
mod ui;

pub use session::ChatSession;
pub use ui::print_config;
