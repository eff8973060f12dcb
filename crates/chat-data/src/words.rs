//! Word frequency and word-cloud weights.
//!
//! Both views share one filtered token stream produced by [`WordFilter`].

use std::collections::HashSet;

use chat_core::models::{Message, MessageSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregator::{has_decoding_damage, rank_by_frequency};

/// Built-in English stop words, plus chat filler.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves", "im", "ive", "youre", "dont", "thats", "ill", "also", "got", "get",
    "ok", "okay", "yeah", "yes", "oh", "u", "ur",
];

/// One ranked word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

/// A word with its count scaled against the most frequent word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordWeight {
    pub word: String,
    pub count: u64,
    /// `count / max_count`, in (0, 1].
    pub weight: f64,
}

/// Stop words and minimum length applied to message tokens.
#[derive(Debug, Clone)]
pub struct WordFilter {
    stop_words: HashSet<String>,
    min_length: usize,
}

impl WordFilter {
    pub fn new<I, S>(stop_words: I, min_length: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: stop_words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            min_length,
        }
    }

    /// Build from a newline-separated list; blank lines and `#` comments are
    /// ignored.
    pub fn from_stop_word_text(text: &str, min_length: usize) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
            min_length,
        )
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Normalize one raw token, or `None` if it is filtered out.
    pub fn clean_token(&self, raw: &str) -> Option<String> {
        let lower = raw.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("www.")
        {
            return None;
        }
        let word: String = lower.chars().filter(|c| c.is_alphanumeric()).collect();
        if word.chars().count() < self.min_length || self.is_stop_word(&word) {
            return None;
        }
        Some(word)
    }

    /// Filtered tokens of every eligible message, in transcript order.
    ///
    /// Media, deleted and system messages contribute nothing.
    pub fn tokens(&self, set: &MessageSet) -> Vec<String> {
        set.iter()
            .filter(|m| is_eligible(m))
            .flat_map(|m| m.body.split_whitespace())
            .filter_map(|raw| self.clean_token(raw))
            .collect()
    }
}

impl Default for WordFilter {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_WORDS, 2)
    }
}

fn is_eligible(message: &Message) -> bool {
    if message.author.is_system() || message.flags.is_placeholder() {
        return false;
    }
    if has_decoding_damage(&message.body) {
        debug!("Skipping message {} in word scan: damaged text", message.index);
        return false;
    }
    true
}

/// The `top_n` most frequent words, ties in first-seen order.
pub fn common_words(set: &MessageSet, filter: &WordFilter, top_n: usize) -> Vec<WordCount> {
    rank_by_frequency(filter.tokens(set))
        .into_iter()
        .take(top_n)
        .map(|(word, count)| WordCount { word, count })
        .collect()
}

/// Every filtered word with its relative weight, for word-cloud rendering.
pub fn word_cloud(set: &MessageSet, filter: &WordFilter) -> Vec<WordWeight> {
    let ranked = rank_by_frequency(filter.tokens(set));
    let Some(max) = ranked.first().map(|(_, count)| *count as f64) else {
        return Vec::new();
    };
    ranked
        .into_iter()
        .map(|(word, count)| WordWeight {
            weight: count as f64 / max,
            word,
            count,
        })
        .collect()
}
