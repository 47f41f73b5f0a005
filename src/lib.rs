//! # agrichat - Multilingual Agriculture Chatbot
//!
//! `agrichat` answers farming questions in Marathi, Hindi or English. Each
//! message is translated to English, routed to a weather lookup, a market-rate
//! lookup or a hosted chat model, and the answer is translated back.
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive chat (Marathi by default)
//! agrichat
//!
//! # One question, in Hindi
//! agrichat ask --lang hindi "आज मौसम कैसा है?"
//!
//! # Direct lookups
//! agrichat weather --city Pune
//! agrichat market-rate --product Onion
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/agrichat/config.toml`:
//!
//! ```toml
//! [agrichat]
//! language = "hindi"
//! city = "Kolhapur"
//! product = "Soybean"
//!
//! [huggingchat]
//! email_env = "AGRICHAT_EMAIL"
//! password_env = "AGRICHAT_PASSWORD"
//!
//! [weather]
//! api_key_env = "OPENWEATHER_API_KEY"
//! ```

/// Translation cache management using `SQLite`.
pub mod cache;

/// Interactive chat mode.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management.
pub mod config;

/// Message log for a chat session.
pub mod conversation;

/// Errors raised by remote collaborators.
pub mod error;

/// File system utilities.
pub mod fs;

/// Input reading from text, files and stdin.
pub mod input;

/// Diagnostic logging with `tracing`.
pub mod logging;

/// Weather and market-rate lookups.
pub mod lookup;

/// Hosted chat model client.
pub mod model;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration and cache.
pub mod paths;

/// Routes a message to a lookup or the chat model.
pub mod router;

/// Translation backends.
pub mod translation;

/// Local HTTP stub server for client tests.
#[cfg(test)]
mod testing;

/// Terminal UI components (spinner, colors, prompts).
pub mod ui;
