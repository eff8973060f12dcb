//! Main analysis pipeline.
//!
//! Parses a transcript, applies the system-line policy and the user
//! selection, then runs every aggregator, returning an [`AnalysisReport`]
//! ready for the presentation layer.

use std::path::Path;
use std::time::Instant;

use chat_core::error::Result;
use chat_core::models::{DateOrder, MessageSet, UserSelection};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregator::{
    ActivityDistribution, ActivityHeatmap, ChatAggregator, ChatStats, DailyBucket, MonthlyBucket,
    UserShare,
};
use crate::config::{AnalysisConfig, SystemMessages};
use crate::emoji::{emoji_frequency, EmojiCount};
use crate::filter::{apply_system_policy, filter_by_user};
use crate::reader::{load_messages, read_transcript};
use crate::sentiment::{
    score_messages, sentiment_rows, sentiment_summary, LexiconScorer, SentimentRow,
    SentimentSummary,
};
use crate::words::{common_words, word_cloud, WordCount, WordWeight};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    /// The user the report was filtered to, or `Everyone`.
    pub selection: String,
    pub date_order: DateOrder,
    pub system_messages: SystemMessages,
    /// Messages parsed from the transcript, system lines included.
    pub messages_parsed: usize,
    /// Messages left after the system policy and the user filter.
    pub messages_selected: usize,
    /// `true` when the selection matched nothing.
    pub empty_selection: bool,
    /// Wall-clock seconds spent parsing and normalizing.
    pub parse_time_seconds: f64,
    /// Wall-clock seconds spent in the aggregators.
    pub analysis_time_seconds: f64,
}

/// The complete output of [`analyze_transcript`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: AnalysisMetadata,
    pub stats: ChatStats,
    pub monthly_timeline: Vec<MonthlyBucket>,
    pub daily_timeline: Vec<DailyBucket>,
    pub weekday_activity: ActivityDistribution,
    pub month_activity: ActivityDistribution,
    pub activity_heatmap: ActivityHeatmap,
    /// Per-author shares; empty unless the selection is Everyone.
    pub user_activity: Vec<UserShare>,
    pub emoji: Vec<EmojiCount>,
    pub common_words: Vec<WordCount>,
    pub word_cloud: Vec<WordWeight>,
    pub sentiment: SentimentSummary,
    pub sentiment_rows: Vec<SentimentRow>,
}

impl AnalysisReport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline over transcript text.
///
/// 1. Parse and normalize under `config.date_order`.
/// 2. Apply the system-line policy.
/// 3. Filter to `selection`.
/// 4. Score sentiment over the selection.
/// 5. Run every aggregator and return an [`AnalysisReport`].
///
/// Parse errors abort the run. An empty selection does not: the report is
/// zero-valued and `metadata.empty_selection` is set.
pub fn analyze_transcript(
    text: &str,
    config: &AnalysisConfig,
    selection: &UserSelection,
) -> Result<AnalysisReport> {
    // ── Step 1: Parse ─────────────────────────────────────────────────────────
    let parse_start = Instant::now();
    let parsed = load_messages(text, config.date_order)?;
    let parse_time = parse_start.elapsed().as_secs_f64();
    debug!("Parsed {} messages in {:.3}s", parsed.len(), parse_time);

    // ── Step 2-3: Select ──────────────────────────────────────────────────────
    let policy_applied = apply_system_policy(&parsed, config.system_messages);
    let selected = filter_by_user(&policy_applied, selection);

    // ── Step 4-5: Aggregate ───────────────────────────────────────────────────
    let analysis_start = Instant::now();
    let user_activity = if selection.is_everyone() {
        ChatAggregator::user_activity(&selected)
    } else {
        Vec::new()
    };
    let sentiment_table = score_messages(&selected, &LexiconScorer::new(config.lexicon.clone()));
    debug!(
        "Scored sentiment for {} of {} messages",
        sentiment_table.len(),
        selected.len()
    );

    let mut report = AnalysisReport {
        metadata: AnalysisMetadata {
            generated_at: Utc::now().to_rfc3339(),
            selection: selection.to_string(),
            date_order: config.date_order,
            system_messages: config.system_messages,
            messages_parsed: parsed.len(),
            messages_selected: selected.len(),
            empty_selection: selected.is_empty(),
            parse_time_seconds: parse_time,
            analysis_time_seconds: 0.0,
        },
        stats: ChatAggregator::stats(&selected),
        monthly_timeline: ChatAggregator::monthly_timeline(&selected),
        daily_timeline: ChatAggregator::daily_timeline(&selected),
        weekday_activity: ChatAggregator::weekday_activity(&selected),
        month_activity: ChatAggregator::month_activity(&selected),
        activity_heatmap: ChatAggregator::activity_heatmap(&selected),
        user_activity,
        emoji: emoji_frequency(&selected, &config.emoji_set),
        common_words: common_words(&selected, &config.word_filter, config.top_words),
        word_cloud: word_cloud(&selected, &config.word_filter),
        sentiment: sentiment_summary(&selected, &sentiment_table),
        sentiment_rows: sentiment_rows(&selected, &sentiment_table),
    };
    report.metadata.analysis_time_seconds = analysis_start.elapsed().as_secs_f64();

    info!(
        "Analyzed {} of {} messages for {}",
        report.metadata.messages_selected, report.metadata.messages_parsed, selection
    );
    Ok(report)
}

/// Read the transcript at `path` and run [`analyze_transcript`] on it.
pub fn analyze_file(
    path: &Path,
    config: &AnalysisConfig,
    selection: &UserSelection,
) -> Result<AnalysisReport> {
    let text = read_transcript(path)?;
    analyze_transcript(&text, config, selection)
}

/// Load a transcript and return its user options (`Everyone` first).
pub fn list_users(path: &Path, date_order: DateOrder) -> Result<Vec<String>> {
    let text = read_transcript(path)?;
    let set: MessageSet = load_messages(&text, date_order)?;
    Ok(set.user_options())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::error::AnalyzerError;
    use std::io::Write;
    use tempfile::TempDir;

    const CHAT: &str = "\
01/02/23, 10:00 - Messages and calls are end-to-end encrypted.
01/02/23, 10:01 - Alice: I love this 😀
01/02/23, 10:02 - Bob: <Media omitted>
02/02/23, 21:15 - Alice: pizza tonight?
see https://example.com
02/02/23, 21:16 - Bob: terrible idea 😀";

    fn write_chat(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("chat.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", body).unwrap();
        path
    }

    // ── analyze_transcript ────────────────────────────────────────────────────

    #[test]
    fn test_analyze_everyone() {
        let report =
            analyze_transcript(CHAT, &AnalysisConfig::default(), &UserSelection::Everyone).unwrap();

        assert_eq!(report.metadata.messages_parsed, 5);
        assert_eq!(report.metadata.messages_selected, 5);
        assert!(!report.metadata.empty_selection);
        assert_eq!(report.metadata.selection, "Everyone");

        assert_eq!(report.stats.messages, 5);
        assert_eq!(report.stats.media, 1);
        assert_eq!(report.stats.links, 1);

        assert_eq!(report.monthly_timeline.len(), 1);
        assert_eq!(report.monthly_timeline[0].label, "February-2023");
        assert_eq!(report.daily_timeline.len(), 2);

        let users: Vec<(&str, u64)> = report
            .user_activity
            .iter()
            .map(|u| (u.author.as_str(), u.messages))
            .collect();
        assert_eq!(users, vec![("Alice", 2), ("Bob", 2)]);
        assert!((report.user_activity[0].percent - 40.0).abs() < 1e-9);

        assert_eq!(report.emoji[0].emoji, "😀");
        assert_eq!(report.emoji[0].count, 2);
        assert!(report.common_words.iter().any(|w| w.word == "pizza"));
        assert_eq!(report.sentiment.positive, 1);
        assert_eq!(report.sentiment.negative, 1);
    }

    #[test]
    fn test_analyze_single_user() {
        let report = analyze_transcript(
            CHAT,
            &AnalysisConfig::default(),
            &UserSelection::User("Alice".into()),
        )
        .unwrap();
        assert_eq!(report.metadata.messages_selected, 2);
        assert_eq!(report.stats.messages, 2);
        assert!(report.user_activity.is_empty());
        assert!(report.sentiment_rows.iter().all(|r| r.author == "Alice"));
    }

    #[test]
    fn test_analyze_exclude_system() {
        let config = AnalysisConfig {
            system_messages: SystemMessages::Exclude,
            ..AnalysisConfig::default()
        };
        let report = analyze_transcript(CHAT, &config, &UserSelection::Everyone).unwrap();
        assert_eq!(report.metadata.messages_parsed, 5);
        assert_eq!(report.stats.messages, 4);
        assert!((report.user_activity[0].percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_analyze_empty_selection_is_zero_valued() {
        let report = analyze_transcript(
            CHAT,
            &AnalysisConfig::default(),
            &UserSelection::User("Nobody".into()),
        )
        .unwrap();
        assert!(report.metadata.empty_selection);
        assert_eq!(report.stats, ChatStats::default());
        assert!(report.monthly_timeline.is_empty());
        assert!(report.daily_timeline.is_empty());
        assert_eq!(report.weekday_activity.busiest, None);
        assert_eq!(report.month_activity.busiest, None);
        assert!(report
            .activity_heatmap
            .rows
            .iter()
            .all(|r| r.counts.iter().all(|c| *c == 0)));
        assert!(report.emoji.is_empty());
        assert!(report.common_words.is_empty());
        assert!(report.word_cloud.is_empty());
        assert_eq!(report.sentiment, SentimentSummary::default());
    }

    #[test]
    fn test_analyze_empty_input() {
        let report =
            analyze_transcript("", &AnalysisConfig::default(), &UserSelection::Everyone).unwrap();
        assert_eq!(report.metadata.messages_parsed, 0);
        assert!(report.metadata.empty_selection);
    }

    #[test]
    fn test_analyze_date_error_aborts() {
        let text = "31/02/23, 10:00 - Alice: hi";
        let err = analyze_transcript(text, &AnalysisConfig::default(), &UserSelection::Everyone)
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::DateFormat { line: 1, .. }));
    }

    #[test]
    fn test_analyze_month_first() {
        let text = "01/02/23, 10:00 AM - Alice: Hello there\n01/02/23, 10:01 AM - Bob: <Media omitted>";
        let config = AnalysisConfig::new(DateOrder::MonthFirst);
        let report = analyze_transcript(text, &config, &UserSelection::Everyone).unwrap();
        assert_eq!(report.stats.messages, 2);
        assert_eq!(report.stats.words, 2);
        assert_eq!(report.stats.media, 1);
        assert_eq!(report.monthly_timeline[0].label, "January-2023");
    }

    #[test]
    fn test_report_json() {
        let report =
            analyze_transcript(CHAT, &AnalysisConfig::default(), &UserSelection::Everyone).unwrap();
        let json = report.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stats"]["messages"], 5);
        assert_eq!(value["metadata"]["system_messages"], "include");
        assert_eq!(value["activity_heatmap"]["columns"][0], "00-01");
    }

    // ── analyze_file / list_users ─────────────────────────────────────────────

    #[test]
    fn test_analyze_file() {
        let dir = TempDir::new().unwrap();
        let path = write_chat(dir.path(), CHAT);
        let report =
            analyze_file(&path, &AnalysisConfig::default(), &UserSelection::Everyone).unwrap();
        assert_eq!(report.stats.messages, 5);
    }

    #[test]
    fn test_analyze_file_missing() {
        let dir = TempDir::new().unwrap();
        let err = analyze_file(
            &dir.path().join("missing.txt"),
            &AnalysisConfig::default(),
            &UserSelection::Everyone,
        )
        .unwrap_err();
        assert!(matches!(err, AnalyzerError::FileRead { .. }));
    }

    #[test]
    fn test_list_users() {
        let dir = TempDir::new().unwrap();
        let path = write_chat(dir.path(), CHAT);
        assert_eq!(
            list_users(&path, DateOrder::DayFirst).unwrap(),
            vec!["Everyone", "Alice", "Bob"]
        );
    }
}
