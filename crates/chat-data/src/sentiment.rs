//! Lexical sentiment scoring.
//!
//! Scores are kept out of [`Message`] in a [`SentimentTable`] keyed by
//! message index and joined with the set when rows are read.

use std::collections::{BTreeMap, HashMap};

use chat_core::models::{Message, MessageSet, SentimentClass, SentimentScore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregator::has_decoding_damage;

// ── Lexicon ───────────────────────────────────────────────────────────────────

/// Built-in `(word, polarity, subjectivity)` entries.
const DEFAULT_LEXICON: &[(&str, f64, f64)] = &[
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("lovely", 0.5, 0.75),
    ("like", 0.1, 0.2),
    ("great", 0.8, 0.75),
    ("good", 0.7, 0.6),
    ("nice", 0.6, 1.0),
    ("happy", 0.8, 1.0),
    ("glad", 0.5, 1.0),
    ("awesome", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("excellent", 1.0, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("beautiful", 0.85, 1.0),
    ("wonderful", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("perfect", 1.0, 1.0),
    ("brilliant", 0.9, 1.0),
    ("fun", 0.3, 0.2),
    ("funny", 0.25, 0.75),
    ("cool", 0.35, 0.65),
    ("sweet", 0.35, 0.65),
    ("cute", 0.5, 1.0),
    ("kind", 0.6, 0.9),
    ("thanks", 0.2, 0.2),
    ("thank", 0.2, 0.2),
    ("welcome", 0.8, 0.9),
    ("enjoy", 0.4, 0.5),
    ("enjoyed", 0.4, 0.5),
    ("excited", 0.375, 0.75),
    ("exciting", 0.3, 0.8),
    ("proud", 0.8, 1.0),
    ("congrats", 0.5, 0.6),
    ("congratulations", 0.5, 0.6),
    ("interesting", 0.5, 0.5),
    ("easy", 0.43, 0.83),
    ("fine", 0.42, 0.5),
    ("safe", 0.5, 0.5),
    ("smart", 0.21, 0.64),
    ("helpful", 0.4, 0.5),
    ("lol", 0.8, 0.7),
    ("haha", 0.2, 0.3),
    ("yay", 0.5, 0.6),
    ("bad", -0.7, 0.67),
    ("terrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("worst", -1.0, 1.0),
    ("worse", -0.4, 0.6),
    ("hate", -0.8, 0.9),
    ("sad", -0.5, 1.0),
    ("angry", -0.5, 1.0),
    ("mad", -0.625, 1.0),
    ("annoying", -0.8, 0.9),
    ("boring", -1.0, 1.0),
    ("stupid", -0.8, 1.0),
    ("ugly", -0.7, 1.0),
    ("wrong", -0.5, 0.9),
    ("sick", -0.71, 0.86),
    ("tired", -0.4, 0.7),
    ("sorry", -0.5, 1.0),
    ("poor", -0.4, 0.6),
    ("hard", -0.29, 0.54),
    ("difficult", -0.5, 1.0),
    ("late", -0.3, 0.6),
    ("crazy", -0.6, 0.9),
    ("disgusting", -1.0, 1.0),
    ("pathetic", -1.0, 1.0),
    ("useless", -0.5, 0.2),
    ("scared", -0.5, 0.8),
    ("afraid", -0.6, 0.9),
    ("lonely", -0.4, 0.8),
    ("upset", -0.5, 0.8),
    ("worried", -0.4, 0.7),
];

/// Words that scale the next sentiment word.
const DEFAULT_INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.2),
    ("too", 1.2),
    ("extremely", 1.5),
    ("absolutely", 1.5),
    ("totally", 1.3),
    ("quite", 1.1),
    ("somewhat", 0.7),
    ("slightly", 0.5),
];

/// Words that flip the next sentiment word.
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "dont", "cant",
    "wont", "isnt", "arent", "wasnt", "werent", "didnt", "doesnt", "aint", "havent", "hasnt",
    "shouldnt", "wouldnt", "couldnt",
];

/// Negated words keep this fraction of their polarity, with the sign flipped.
const NEGATION_FACTOR: f64 = -0.5;

/// Polarity and subjectivity of one lexicon word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexiconEntry {
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Sentiment vocabulary: scored words plus intensifiers.
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: HashMap<String, LexiconEntry>,
    intensifiers: HashMap<String, f64>,
}

impl Lexicon {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, LexiconEntry)>,
    {
        Self {
            words: entries.into_iter().collect(),
            intensifiers: DEFAULT_INTENSIFIERS
                .iter()
                .map(|(w, f)| (w.to_string(), *f))
                .collect(),
        }
    }

    pub fn get(&self, word: &str) -> Option<LexiconEntry> {
        self.words.get(word).copied()
    }

    pub fn intensity(&self, word: &str) -> Option<f64> {
        self.intensifiers.get(word).copied()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new(DEFAULT_LEXICON.iter().map(|(w, p, s)| {
            (
                w.to_string(),
                LexiconEntry {
                    polarity: *p,
                    subjectivity: *s,
                },
            )
        }))
    }
}

// ── Scorers ───────────────────────────────────────────────────────────────────

/// Anything that can assign polarity and subjectivity to text.
pub trait SentimentScorer {
    /// Score `text`, or `None` when it cannot be scored.
    fn score(&self, text: &str) -> Option<SentimentScore>;
}

/// Bag-of-words scorer with negation and intensifier handling.
#[derive(Debug, Clone, Default)]
pub struct LexiconScorer {
    lexicon: Lexicon,
}

impl LexiconScorer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> Option<SentimentScore> {
        if has_decoding_damage(text) {
            return None;
        }

        let mut polarities: Vec<f64> = Vec::new();
        let mut subjectivities: Vec<f64> = Vec::new();
        let mut negate = false;
        let mut intensity = 1.0;

        for token in text.split_whitespace().map(normalize_token) {
            if token.is_empty() {
                continue;
            }
            if is_negation(&token) {
                negate = true;
                continue;
            }
            if let Some(factor) = self.lexicon.intensity(&token) {
                intensity *= factor;
                continue;
            }
            match self.lexicon.get(&token) {
                Some(entry) => {
                    let mut polarity = entry.polarity * intensity;
                    if negate {
                        polarity *= NEGATION_FACTOR;
                    }
                    polarities.push(polarity);
                    subjectivities.push(entry.subjectivity * intensity);
                    negate = false;
                    intensity = 1.0;
                }
                // An unrelated word breaks an intensifier chain.
                None => intensity = 1.0,
            }
        }

        if polarities.is_empty() {
            return Some(SentimentScore::neutral());
        }
        Some(SentimentScore {
            polarity: mean(&polarities).clamp(-1.0, 1.0),
            subjectivity: mean(&subjectivities).clamp(0.0, 1.0),
        })
    }
}

/// Lowercase and keep only letters, digits and apostrophes; curly
/// apostrophes become straight ones and `n't` contractions lose theirs.
fn normalize_token(raw: &str) -> String {
    let token: String = raw
        .chars()
        .map(|c| if c == '\u{2019}' { '\'' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '\'')
        .collect::<String>()
        .to_lowercase();
    token.trim_matches('\'').replace('\'', "")
}

fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// ── SentimentTable ────────────────────────────────────────────────────────────

/// Sentiment scores keyed by [`Message::index`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentTable {
    scores: BTreeMap<usize, SentimentScore>,
}

impl SentimentTable {
    pub fn get(&self, index: usize) -> Option<SentimentScore> {
        self.scores.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Class counts over a message set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
    /// Messages the scorer could not handle.
    pub skipped: u64,
}

/// A message joined with its sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRow {
    pub index: usize,
    pub author: String,
    pub message: String,
    pub class: SentimentClass,
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Score every message in `set`.
///
/// Media, deleted and empty bodies score 0/0 without consulting `scorer`.
/// Messages the scorer rejects are left out of the table.
pub fn score_messages(set: &MessageSet, scorer: &dyn SentimentScorer) -> SentimentTable {
    let mut scores = BTreeMap::new();
    for message in set {
        match score_message(message, scorer) {
            Some(score) => {
                scores.insert(message.index, score);
            }
            None => debug!("Skipping message {} in sentiment scoring", message.index),
        }
    }
    SentimentTable { scores }
}

fn score_message(message: &Message, scorer: &dyn SentimentScorer) -> Option<SentimentScore> {
    if message.flags.is_placeholder() || message.body.trim().is_empty() {
        return Some(SentimentScore::neutral());
    }
    scorer.score(&message.body)
}

/// Count positive, negative and neutral messages of `set`.
pub fn sentiment_summary(set: &MessageSet, table: &SentimentTable) -> SentimentSummary {
    let mut summary = SentimentSummary::default();
    for message in set {
        match table.get(message.index).map(|s| s.class()) {
            Some(SentimentClass::Positive) => summary.positive += 1,
            Some(SentimentClass::Negative) => summary.negative += 1,
            Some(SentimentClass::Neutral) => summary.neutral += 1,
            None => summary.skipped += 1,
        }
    }
    summary
}

/// Per-message sentiment list for every scored message, in transcript order.
pub fn sentiment_rows(set: &MessageSet, table: &SentimentTable) -> Vec<SentimentRow> {
    set.iter()
        .filter_map(|message| {
            let score = table.get(message.index)?;
            Some(SentimentRow {
                index: message.index,
                author: message.author.display_name().to_string(),
                message: message.body.clone(),
                class: score.class(),
                polarity: score.polarity,
                subjectivity: score.subjectivity,
            })
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
