//! Record normalizer: parsed entries → [`MessageSet`].

use chat_core::models::{Message, MessageFlags, MessageSet};
use chrono::{Datelike, Timelike};

use crate::parser::ParsedEntry;

/// Build the immutable message set, deriving flags and calendar fields.
///
/// Message indices follow transcript order starting at 0.
pub fn normalize(entries: Vec<ParsedEntry>) -> MessageSet {
    MessageSet::new(
        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| build_message(index, entry))
            .collect(),
    )
}

/// Convert one parsed entry into a [`Message`].
pub fn build_message(index: usize, entry: ParsedEntry) -> Message {
    let ts = entry.timestamp;
    Message {
        index,
        timestamp: ts,
        flags: MessageFlags::from_body(&entry.body),
        author: entry.author,
        body: entry.body,
        year: ts.year(),
        month: ts.month(),
        day: ts.day(),
        hour: ts.hour(),
        weekday: ts.weekday(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::models::{Author, DateOrder};
    use chrono::Weekday;

    use crate::parser::TranscriptParser;

    fn parse(text: &str, order: DateOrder) -> MessageSet {
        normalize(TranscriptParser::new(order).parse(text).unwrap())
    }

    #[test]
    fn test_normalize_scenario_media() {
        let set = parse(
            "01/02/23, 10:00 AM - Alice: Hello there\n01/02/23, 10:01 AM - Bob: <Media omitted>",
            DateOrder::MonthFirst,
        );
        let msgs = set.messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].word_count(), 2);
        assert!(!msgs[0].flags.is_media);
        assert!(msgs[1].flags.is_media);
        assert_eq!(msgs[1].word_count(), 0);
    }

    #[test]
    fn test_normalize_temporal_fields() {
        let set = parse("15/03/24, 11:45 PM - A: late", DateOrder::DayFirst);
        let m = &set.messages()[0];
        assert_eq!(m.year, 2024);
        assert_eq!(m.month, 3);
        assert_eq!(m.day, 15);
        assert_eq!(m.hour, 23);
        assert_eq!(m.weekday, Weekday::Fri);
        assert_eq!(m.weekday_name(), "Friday");
        assert_eq!(m.month_name(), "March");
    }

    #[test]
    fn test_normalize_indices_follow_order() {
        let set = parse(
            "01/02/23, 10:00 - A: one\n01/02/23, 10:01 - B joined\n01/02/23, 10:02 - B: two",
            DateOrder::DayFirst,
        );
        let indices: Vec<usize> = set.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(set.messages()[1].author, Author::System);
    }

    #[test]
    fn test_normalize_link_and_deleted_flags() {
        let set = parse(
            "01/02/23, 10:00 - A: read https://example.com/a\n01/02/23, 10:01 - A: This message was deleted",
            DateOrder::DayFirst,
        );
        assert!(set.messages()[0].flags.is_link);
        assert_eq!(set.messages()[0].word_count(), 2);
        assert!(set.messages()[1].flags.is_deleted);
        assert_eq!(set.messages()[1].word_count(), 0);
    }

    #[test]
    fn test_normalize_continuation_word_count() {
        let set = parse(
            "01/02/23, 10:00 AM - Alice: Hello\nhow are you?",
            DateOrder::MonthFirst,
        );
        assert_eq!(set.len(), 1);
        assert_eq!(set.messages()[0].body, "Hello\nhow are you?");
        assert_eq!(set.messages()[0].word_count(), 4);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize(Vec::new()).is_empty());
    }
}
