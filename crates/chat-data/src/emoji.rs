//! Emoji frequency.

use chat_core::error::{AnalyzerError, Result};
use chat_core::models::MessageSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregator::{has_decoding_damage, rank_by_frequency};

/// Pictographic code points, minus skin-tone modifiers, each with an
/// optional emoji presentation selector.
const UNICODE_EMOJI_PATTERN: &str =
    r"[[\p{Emoji_Presentation}\p{Extended_Pictographic}]--\p{Emoji_Modifier}]\x{FE0F}?";

/// How often one emoji appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiCount {
    pub emoji: String,
    pub count: u64,
}

/// The reference set of symbols counted as emoji.
#[derive(Debug, Clone)]
pub struct EmojiSet {
    matcher: Regex,
}

impl EmojiSet {
    /// Every Unicode pictographic emoji.
    pub fn unicode() -> Self {
        Self {
            matcher: Regex::new(UNICODE_EMOJI_PATTERN).expect("regex is valid"),
        }
    }

    /// Only the listed symbols. Longer symbols are tried first so multi
    /// code point sequences win over their prefixes.
    pub fn from_symbols<S: AsRef<str>>(symbols: &[S]) -> Result<Self> {
        let mut escaped: Vec<String> = symbols
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| !s.is_empty())
            .map(regex::escape)
            .collect();
        if escaped.is_empty() {
            return Err(AnalyzerError::Config(
                "emoji set needs at least one symbol".to_string(),
            ));
        }
        escaped.sort_by(|a, b| b.len().cmp(&a.len()));
        let matcher = Regex::new(&escaped.join("|"))
            .map_err(|e| AnalyzerError::Config(format!("invalid emoji set: {}", e)))?;
        Ok(Self { matcher })
    }

    /// Emoji occurrences in `text`, in order.
    pub fn find_all<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.matcher.find_iter(text).map(|m| m.as_str())
    }
}

impl Default for EmojiSet {
    fn default() -> Self {
        Self::unicode()
    }
}

/// Count every emoji across the set, most frequent first, ties in the order
/// they first appear. Messages damaged by lossy decoding are skipped.
pub fn emoji_frequency(set: &MessageSet, emoji_set: &EmojiSet) -> Vec<EmojiCount> {
    let mut found: Vec<String> = Vec::new();
    for message in set {
        if has_decoding_damage(&message.body) {
            debug!("Skipping message {} in emoji scan: damaged text", message.index);
            continue;
        }
        found.extend(emoji_set.find_all(&message.body).map(str::to_string));
    }

    rank_by_frequency(found)
        .into_iter()
        .map(|(emoji, count)| EmojiCount { emoji, count })
        .collect()
}
