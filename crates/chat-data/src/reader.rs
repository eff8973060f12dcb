//! Transcript file loading.
//!
//! Reads an exported chat from disk, decodes it as UTF-8 and runs it through
//! the parser and normalizer to produce a [`MessageSet`].

use std::path::Path;

use chat_core::error::{AnalyzerError, Result};
use chat_core::models::{DateOrder, MessageSet};
use tracing::{debug, warn};

use crate::normalizer::normalize;
use crate::parser::TranscriptParser;

// ── Public API ────────────────────────────────────────────────────────────────

/// Read a transcript file into a string.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD and logged rather than
/// failing the run; aggregators skip the damaged messages individually.
/// A leading byte-order mark is removed.
pub fn read_transcript(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| AnalyzerError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                "{} is not valid UTF-8 (first bad byte at offset {}); decoding lossily",
                path.display(),
                err.utf8_error().valid_up_to()
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    };

    let text = match text.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    };

    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// Parse and normalize transcript text.
pub fn load_messages(text: &str, order: DateOrder) -> Result<MessageSet> {
    let entries = TranscriptParser::new(order).parse(text)?;
    Ok(normalize(entries))
}

/// Read, parse and normalize the transcript at `path`.
pub fn load_transcript(path: &Path, order: DateOrder) -> Result<MessageSet> {
    let text = read_transcript(path)?;
    load_messages(&text, order)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
