//! Transcript ingestion and analysis layer.
//!
//! Parses exported chat transcripts into a normalized [`MessageSet`],
//! filters them by author and reduces them to statistics, timelines,
//! emoji and word frequencies and sentiment, with a top-level pipeline
//! producing one serializable report.
//!
//! [`MessageSet`]: chat_core::models::MessageSet

pub mod aggregator;
pub mod analysis;
pub mod config;
pub mod emoji;
pub mod filter;
pub mod normalizer;
pub mod parser;
pub mod reader;
pub mod sentiment;
pub mod words;

pub use chat_core as core;
