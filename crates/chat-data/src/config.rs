//! Runtime configuration for one analysis run.

use chat_core::models::DateOrder;
use serde::{Deserialize, Serialize};

use crate::emoji::EmojiSet;
use crate::sentiment::Lexicon;
use crate::words::WordFilter;

/// Default number of words in the frequency table.
pub const DEFAULT_TOP_WORDS: usize = 20;

/// Whether system lines take part in aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemMessages {
    #[default]
    Include,
    Exclude,
}

impl SystemMessages {
    pub fn from_exclude_flag(exclude: bool) -> Self {
        if exclude {
            SystemMessages::Exclude
        } else {
            SystemMessages::Include
        }
    }
}

/// Everything the pipeline needs besides the transcript and the selection.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub date_order: DateOrder,
    pub system_messages: SystemMessages,
    pub word_filter: WordFilter,
    pub top_words: usize,
    pub emoji_set: EmojiSet,
    pub lexicon: Lexicon,
}

impl AnalysisConfig {
    pub fn new(date_order: DateOrder) -> Self {
        Self {
            date_order,
            ..Self::default()
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            date_order: DateOrder::DayFirst,
            system_messages: SystemMessages::default(),
            word_filter: WordFilter::default(),
            top_words: DEFAULT_TOP_WORDS,
            emoji_set: EmojiSet::default(),
            lexicon: Lexicon::default(),
        }
    }
}
