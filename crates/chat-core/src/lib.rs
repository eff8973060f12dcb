//! Shared types for the chat analyzer.
//!
//! Message model, error taxonomy, command-line settings, calendar helpers
//! and number formatting used by the data and binary crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{AnalyzerError, Result};
