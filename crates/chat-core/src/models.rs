use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::AnalyzerError;
use crate::time_utils;

/// Selection value meaning "no author filter".
pub const EVERYONE: &str = "Everyone";

/// Display label used for system lines (membership changes, encryption notices).
pub const SYSTEM_AUTHOR_LABEL: &str = "group_notification";

/// Placeholder bodies the exporter writes for omitted media.
pub const MEDIA_PLACEHOLDERS: &[&str] = &["<Media omitted>"];

/// Placeholder bodies the exporter writes for deleted messages.
pub const DELETED_PLACEHOLDERS: &[&str] = &["This message was deleted", "You deleted this message"];

/// Position of the day and month fields in a transcript date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateOrder {
    /// `dd-mm-yy`
    #[serde(rename = "dd-mm-yy")]
    DayFirst,
    /// `mm-dd-yy`
    #[serde(rename = "mm-dd-yy")]
    MonthFirst,
}

impl DateOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateOrder::DayFirst => "dd-mm-yy",
            DateOrder::MonthFirst => "mm-dd-yy",
        }
    }
}

impl fmt::Display for DateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateOrder {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dd-mm-yy" | "day-first" | "dayfirst" => Ok(DateOrder::DayFirst),
            "mm-dd-yy" | "month-first" | "monthfirst" => Ok(DateOrder::MonthFirst),
            _ => Err(AnalyzerError::InvalidDateOrder(s.to_string())),
        }
    }
}

/// Who wrote a transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    /// A chat participant, by display name.
    User(String),
    /// A line with no author (member added, encryption notice, ...).
    System,
}

impl Author {
    /// Name shown in reports; system lines use [`SYSTEM_AUTHOR_LABEL`].
    pub fn display_name(&self) -> &str {
        match self {
            Author::User(name) => name,
            Author::System => SYSTEM_AUTHOR_LABEL,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Author::System)
    }
}

/// The author filter chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserSelection {
    /// Aggregate over every message.
    Everyone,
    /// Only messages written by this participant.
    User(String),
}

impl UserSelection {
    /// `true` when a message by `author` passes this selection.
    pub fn matches(&self, author: &Author) -> bool {
        match (self, author) {
            (UserSelection::Everyone, _) => true,
            (UserSelection::User(wanted), Author::User(name)) => wanted == name,
            (UserSelection::User(_), Author::System) => false,
        }
    }

    pub fn is_everyone(&self) -> bool {
        matches!(self, UserSelection::Everyone)
    }
}

impl fmt::Display for UserSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserSelection::Everyone => f.write_str(EVERYONE),
            UserSelection::User(name) => f.write_str(name),
        }
    }
}

impl FromStr for UserSelection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == EVERYONE {
            Ok(UserSelection::Everyone)
        } else {
            Ok(UserSelection::User(s.to_string()))
        }
    }
}

/// Classification flags derived from a message body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFlags {
    /// Body is the omitted-media placeholder.
    pub is_media: bool,
    /// Body is the deleted-message placeholder.
    pub is_deleted: bool,
    /// Body contains an `http://` or `https://` link.
    pub is_link: bool,
}

impl MessageFlags {
    /// Derive the flags from a raw body using the exporter's placeholders.
    pub fn from_body(body: &str) -> Self {
        let trimmed = body.trim();
        let equals_any = |placeholders: &[&str]| {
            placeholders
                .iter()
                .any(|p| trimmed.eq_ignore_ascii_case(p))
        };
        Self {
            is_media: equals_any(MEDIA_PLACEHOLDERS),
            is_deleted: equals_any(DELETED_PLACEHOLDERS),
            is_link: body.contains("http://") || body.contains("https://"),
        }
    }

    /// `true` when the body is a placeholder rather than user content.
    pub fn is_placeholder(&self) -> bool {
        self.is_media || self.is_deleted
    }
}

/// One normalized transcript message.
///
/// Built once by the normalizer and never mutated afterwards. Sentiment
/// scores live in a separate table keyed by [`Message::index`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Position in the full, unfiltered transcript.
    pub index: usize,
    /// Naive local date and time as written in the export.
    pub timestamp: NaiveDateTime,
    pub author: Author,
    /// Message text, continuation lines joined with `\n`.
    pub body: String,
    pub flags: MessageFlags,
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub day: u32,
    /// 0-23
    pub hour: u32,
    pub weekday: Weekday,
}

impl Message {
    /// Whitespace-delimited tokens in the body; placeholders count as zero.
    pub fn word_count(&self) -> u64 {
        if self.flags.is_placeholder() {
            return 0;
        }
        self.body.split_whitespace().count() as u64
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// English month name, e.g. `"January"`.
    pub fn month_name(&self) -> &'static str {
        time_utils::month_name(self.month)
    }

    /// English weekday name, e.g. `"Monday"`.
    pub fn weekday_name(&self) -> &'static str {
        time_utils::weekday_name(self.weekday)
    }
}

/// Ordered messages of one transcript, in export order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageSet {
    messages: Vec<Message>,
}

impl MessageSet {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Copy of the messages that satisfy `keep`, order preserved.
    pub fn subset(&self, keep: impl Fn(&Message) -> bool) -> MessageSet {
        MessageSet::new(self.messages.iter().filter(|m| keep(m)).cloned().collect())
    }

    /// The set without system lines.
    pub fn authored(&self) -> MessageSet {
        self.subset(|m| !m.author.is_system())
    }

    /// Distinct participant names, sorted.
    pub fn users(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .messages
            .iter()
            .filter_map(|m| match &m.author {
                Author::User(name) => Some(name.as_str()),
                Author::System => None,
            })
            .collect();
        names.into_iter().map(str::to_string).collect()
    }

    /// [`EVERYONE`] followed by [`MessageSet::users`].
    pub fn user_options(&self) -> Vec<String> {
        let mut options = vec![EVERYONE.to_string()];
        options.extend(self.users());
        options
    }
}

impl<'a> IntoIterator for &'a MessageSet {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Lexical sentiment of one message body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// -1.0 (negative) to 1.0 (positive).
    pub polarity: f64,
    /// 0.0 (objective) to 1.0 (subjective).
    pub subjectivity: f64,
}

impl SentimentScore {
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn class(&self) -> SentimentClass {
        SentimentClass::from_polarity(self.polarity)
    }
}

/// Positive / negative / neutral bucket of a polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentClass {
    Positive,
    Negative,
    Neutral,
}

impl SentimentClass {
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.0 {
            SentimentClass::Positive
        } else if polarity < 0.0 {
            SentimentClass::Negative
        } else {
            SentimentClass::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentClass::Positive => "Positive",
            SentimentClass::Negative => "Negative",
            SentimentClass::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_message(index: usize, author: Author, body: &str) -> Message {
        let timestamp = NaiveDate::from_ymd_opt(2023, 1, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Message {
            index,
            timestamp,
            author,
            body: body.to_string(),
            flags: MessageFlags::from_body(body),
            year: 2023,
            month: 1,
            day: 2,
            hour: 10,
            weekday: Weekday::Mon,
        }
    }

    // ── DateOrder ─────────────────────────────────────────────────────────────

    #[test]
    fn test_date_order_from_str() {
        assert_eq!("dd-mm-yy".parse::<DateOrder>().unwrap(), DateOrder::DayFirst);
        assert_eq!("MM-DD-YY".parse::<DateOrder>().unwrap(), DateOrder::MonthFirst);
        assert!("yy-mm-dd".parse::<DateOrder>().is_err());
    }

    #[test]
    fn test_date_order_display_round_trips() {
        for order in [DateOrder::DayFirst, DateOrder::MonthFirst] {
            assert_eq!(order.to_string().parse::<DateOrder>().unwrap(), order);
        }
    }

    // ── UserSelection ─────────────────────────────────────────────────────────

    #[test]
    fn test_user_selection_parse_everyone() {
        let sel: UserSelection = "Everyone".parse().unwrap();
        assert!(sel.is_everyone());
        let sel: UserSelection = "everyone".parse().unwrap();
        assert_eq!(sel, UserSelection::User("everyone".to_string()));
    }

    #[test]
    fn test_user_selection_matches() {
        let alice = Author::User("Alice".to_string());
        assert!(UserSelection::Everyone.matches(&alice));
        assert!(UserSelection::Everyone.matches(&Author::System));
        assert!(UserSelection::User("Alice".to_string()).matches(&alice));
        assert!(!UserSelection::User("Bob".to_string()).matches(&alice));
        assert!(!UserSelection::User("Alice".to_string()).matches(&Author::System));
    }

    // ── MessageFlags ──────────────────────────────────────────────────────────

    #[test]
    fn test_flags_media_case_insensitive() {
        assert!(MessageFlags::from_body("<Media omitted>").is_media);
        assert!(MessageFlags::from_body("<media OMITTED>").is_media);
        assert!(!MessageFlags::from_body("see <Media omitted> above").is_media);
    }

    #[test]
    fn test_flags_deleted() {
        assert!(MessageFlags::from_body("This message was deleted").is_deleted);
        assert!(MessageFlags::from_body("you deleted this message").is_deleted);
        assert!(!MessageFlags::from_body("This message was deleted?!").is_deleted);
    }

    #[test]
    fn test_flags_link() {
        assert!(MessageFlags::from_body("look https://example.com").is_link);
        assert!(MessageFlags::from_body("http://x.y").is_link);
        assert!(!MessageFlags::from_body("www.example.com").is_link);
    }

    // ── Message ───────────────────────────────────────────────────────────────

    #[test]
    fn test_word_count_excludes_placeholders() {
        let text = make_message(0, Author::User("A".into()), "Hello\nhow are you?");
        assert_eq!(text.word_count(), 4);
        let media = make_message(1, Author::User("A".into()), "<Media omitted>");
        assert_eq!(media.word_count(), 0);
        let deleted = make_message(2, Author::User("A".into()), "This message was deleted");
        assert_eq!(deleted.word_count(), 0);
    }

    #[test]
    fn test_message_names() {
        let m = make_message(0, Author::User("A".into()), "hi");
        assert_eq!(m.month_name(), "January");
        assert_eq!(m.weekday_name(), "Monday");
    }

    // ── MessageSet ────────────────────────────────────────────────────────────

    #[test]
    fn test_users_sorted_and_distinct() {
        let set = MessageSet::new(vec![
            make_message(0, Author::User("Zoe".into()), "a"),
            make_message(1, Author::System, "Zoe added Bob"),
            make_message(2, Author::User("Bob".into()), "b"),
            make_message(3, Author::User("Zoe".into()), "c"),
        ]);
        assert_eq!(set.users(), vec!["Bob", "Zoe"]);
        assert_eq!(set.user_options(), vec!["Everyone", "Bob", "Zoe"]);
    }

    #[test]
    fn test_authored_drops_system() {
        let set = MessageSet::new(vec![
            make_message(0, Author::System, "Messages are end-to-end encrypted"),
            make_message(1, Author::User("A".into()), "hi"),
        ]);
        let authored = set.authored();
        assert_eq!(authored.len(), 1);
        assert_eq!(authored.messages()[0].index, 1);
    }

    // ── Sentiment ─────────────────────────────────────────────────────────────

    #[test]
    fn test_sentiment_class_from_polarity() {
        assert_eq!(SentimentClass::from_polarity(0.3), SentimentClass::Positive);
        assert_eq!(SentimentClass::from_polarity(-0.1), SentimentClass::Negative);
        assert_eq!(SentimentClass::from_polarity(0.0), SentimentClass::Neutral);
        assert_eq!(SentimentScore::neutral().class(), SentimentClass::Neutral);
    }

    #[test]
    fn test_author_display_name() {
        assert_eq!(Author::User("Alice".into()).display_name(), "Alice");
        assert_eq!(Author::System.display_name(), SYSTEM_AUTHOR_LABEL);
    }
}
