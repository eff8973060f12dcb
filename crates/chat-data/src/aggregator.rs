//! Message statistics, timelines and activity distributions.
//!
//! Every function is a pure reduction over a [`MessageSet`]; an empty set
//! yields zeros or empty collections.

use std::collections::{BTreeMap, HashMap};

use chat_core::formatting::percentage;
use chat_core::models::{Author, Message, MessageSet};
use chat_core::time_utils::{self, hour_band_labels, MONTH_NAMES, WEEKDAYS};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Output rows ───────────────────────────────────────────────────────────────

/// Headline counts for a message set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatStats {
    pub messages: u64,
    /// Sum of [`Message::word_count`]; media and deleted messages add nothing.
    pub words: u64,
    pub media: u64,
    pub deleted: u64,
    pub links: u64,
}

impl ChatStats {
    fn add_message(&mut self, message: &Message) {
        self.messages += 1;
        self.words += message.word_count();
        self.media += u64::from(message.flags.is_media);
        self.deleted += u64::from(message.flags.is_deleted);
        self.links += u64::from(message.flags.is_link);
    }
}

/// Messages sent in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    /// `"January-2023"`
    pub label: String,
    pub messages: u64,
}

/// Messages sent on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub messages: u64,
}

/// Message counts per named bucket (weekday or month) in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDistribution {
    pub buckets: Vec<(String, u64)>,
    /// Bucket with the highest count; the earliest canonical bucket wins ties.
    /// `None` when no messages were counted.
    pub busiest: Option<String>,
}

impl ActivityDistribution {
    fn from_counts(names: impl IntoIterator<Item = &'static str>, counts: &[u64]) -> Self {
        let buckets: Vec<(String, u64)> = names
            .into_iter()
            .zip(counts.iter().copied())
            .map(|(name, count)| (name.to_string(), count))
            .collect();

        let mut busiest: Option<(&str, u64)> = None;
        for (name, count) in &buckets {
            if *count > 0 && busiest.map_or(true, |(_, best)| *count > best) {
                busiest = Some((name.as_str(), *count));
            }
        }

        Self {
            busiest: busiest.map(|(name, _)| name.to_string()),
            buckets,
        }
    }

    pub fn count_for(&self, name: &str) -> u64 {
        self.buckets
            .iter()
            .find(|(n, _)| n == name)
            .map_or(0, |(_, c)| *c)
    }
}

/// One weekday row of the activity heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapRow {
    pub weekday: String,
    /// One count per hour band, aligned with [`ActivityHeatmap::columns`].
    pub counts: Vec<u64>,
}

/// Weekday × hour-band message counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityHeatmap {
    /// `"00-01"` … `"23-00"`
    pub columns: Vec<String>,
    /// Monday through Sunday, always seven rows.
    pub rows: Vec<HeatmapRow>,
}

impl ActivityHeatmap {
    pub fn cell(&self, weekday: &str, hour: u32) -> u64 {
        self.rows
            .iter()
            .find(|r| r.weekday == weekday)
            .and_then(|r| r.counts.get(hour as usize).copied())
            .unwrap_or(0)
    }
}

/// A participant's share of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserShare {
    pub author: String,
    pub messages: u64,
    /// Share of all messages in the set, rounded to two decimals.
    pub percent: f64,
}

// ── ChatAggregator ────────────────────────────────────────────────────────────

/// Stateless helper that reduces a [`MessageSet`] to report tables.
pub struct ChatAggregator;

impl ChatAggregator {
    /// Total messages, words, media, deleted messages and links.
    pub fn stats(set: &MessageSet) -> ChatStats {
        let mut stats = ChatStats::default();
        for message in set {
            stats.add_message(message);
        }
        stats
    }

    /// Message counts per `(year, month)` in chronological order.
    pub fn monthly_timeline(set: &MessageSet) -> Vec<MonthlyBucket> {
        Self::count_by_key(set, |m| (m.year, m.month))
            .into_iter()
            .map(|((year, month), messages)| MonthlyBucket {
                year,
                month,
                label: format!("{}-{}", time_utils::month_name(month), year),
                messages,
            })
            .collect()
    }

    /// Message counts per calendar day in chronological order.
    pub fn daily_timeline(set: &MessageSet) -> Vec<DailyBucket> {
        Self::count_by_key(set, Message::date)
            .into_iter()
            .map(|(date, messages)| DailyBucket { date, messages })
            .collect()
    }

    /// Messages per weekday, Monday first, with the busiest day.
    pub fn weekday_activity(set: &MessageSet) -> ActivityDistribution {
        let mut counts = [0u64; 7];
        for message in set {
            counts[message.weekday.num_days_from_monday() as usize] += 1;
        }
        ActivityDistribution::from_counts(
            WEEKDAYS.iter().map(|d| time_utils::weekday_name(*d)),
            &counts,
        )
    }

    /// Messages per month name across all years, January first, with the
    /// busiest month.
    pub fn month_activity(set: &MessageSet) -> ActivityDistribution {
        let mut counts = [0u64; 12];
        for message in set {
            if let Some(slot) = counts.get_mut(message.month.saturating_sub(1) as usize) {
                *slot += 1;
            }
        }
        ActivityDistribution::from_counts(MONTH_NAMES, &counts)
    }

    /// Weekday × hour-band counts; combinations with no messages are 0.
    pub fn activity_heatmap(set: &MessageSet) -> ActivityHeatmap {
        let mut grid = [[0u64; 24]; 7];
        for message in set {
            let day = message.weekday.num_days_from_monday() as usize;
            let hour = (message.hour as usize).min(23);
            grid[day][hour] += 1;
        }
        ActivityHeatmap {
            columns: hour_band_labels(),
            rows: WEEKDAYS
                .iter()
                .zip(grid.iter())
                .map(|(day, counts)| HeatmapRow {
                    weekday: time_utils::weekday_name(*day).to_string(),
                    counts: counts.to_vec(),
                })
                .collect(),
        }
    }

    /// Authored message counts per participant, busiest first.
    ///
    /// Percentages use the size of the whole set as denominator.
    pub fn user_activity(set: &MessageSet) -> Vec<UserShare> {
        let names = set.iter().filter_map(|m| match &m.author {
            Author::User(name) => Some(name.clone()),
            Author::System => None,
        });
        let total = set.len() as f64;
        rank_by_frequency(names)
            .into_iter()
            .map(|(author, messages)| UserShare {
                percent: percentage(messages as f64, total, 2),
                author,
                messages,
            })
            .collect()
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Count messages per key; the `BTreeMap` keeps keys in ascending order.
    fn count_by_key<K: Ord>(set: &MessageSet, key_fn: impl Fn(&Message) -> K) -> BTreeMap<K, u64> {
        let mut map: BTreeMap<K, u64> = BTreeMap::new();
        for message in set {
            *map.entry(key_fn(message)).or_insert(0) += 1;
        }
        map
    }
}

// ── Ranking ───────────────────────────────────────────────────────────────────

/// Count items and sort by descending count, ties in first-seen order.
pub fn rank_by_frequency<I>(items: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: HashMap<String, (u64, usize)> = HashMap::new();
    for (position, item) in items.into_iter().enumerate() {
        counts.entry(item).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, u64, usize)> = counts
        .into_iter()
        .map(|(item, (count, first))| (item, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .map(|(item, count, _)| (item, count))
        .collect()
}

/// `true` when lossy decoding replaced bytes in `body`.
pub(crate) fn has_decoding_damage(body: &str) -> bool {
    body.contains(char::REPLACEMENT_CHARACTER)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::models::DateOrder;

    use crate::reader::load_messages;

    fn load(text: &str) -> MessageSet {
        load_messages(text, DateOrder::DayFirst).unwrap()
    }

    fn sample() -> MessageSet {
        load(
            "02/01/23, 09:15 - Alice: good morning all\n\
             02/01/23, 09:20 - Bob: <Media omitted>\n\
             03/01/23, 21:00 - Alice: see https://example.com\n\
             15/02/23, 13:30 - Bob: This message was deleted\n\
             16/02/24, 13:45 - Cara: hello\n\
             16/02/24, 13:50 - Cara added Dan",
        )
    }

    // ── stats ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_stats_counts() {
        let stats = ChatAggregator::stats(&sample());
        assert_eq!(stats.messages, 6);
        assert_eq!(stats.media, 1);
        assert_eq!(stats.deleted, 1);
        assert_eq!(stats.links, 1);
        // 3 + 2 + 1 + 3 ("Cara added Dan")
        assert_eq!(stats.words, 9);
    }

    #[test]
    fn test_stats_words_equal_sum_of_message_word_counts() {
        let set = sample();
        let expected: u64 = set
            .iter()
            .filter(|m| !m.flags.is_placeholder())
            .map(|m| m.word_count())
            .sum();
        assert_eq!(ChatAggregator::stats(&set).words, expected);
    }

    #[test]
    fn test_stats_scenario() {
        let set = load_messages(
            "01/02/23, 10:00 AM - Alice: Hello there\n01/02/23, 10:01 AM - Bob: <Media omitted>",
            DateOrder::MonthFirst,
        )
        .unwrap();
        let stats = ChatAggregator::stats(&set);
        assert_eq!(stats.messages, 2);
        assert_eq!(stats.media, 1);
        assert_eq!(stats.words, 2);
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(ChatAggregator::stats(&MessageSet::default()), ChatStats::default());
    }

    // ── timelines ─────────────────────────────────────────────────────────────

    #[test]
    fn test_monthly_timeline_chronological() {
        let timeline = ChatAggregator::monthly_timeline(&sample());
        let labels: Vec<&str> = timeline.iter().map(|b| b.label.as_str()).collect();
        // Alphabetical order would put February before January.
        assert_eq!(labels, vec!["January-2023", "February-2023", "February-2024"]);
        let counts: Vec<u64> = timeline.iter().map(|b| b.messages).collect();
        assert_eq!(counts, vec![3, 1, 2]);
    }

    #[test]
    fn test_monthly_timeline_orders_across_years() {
        let set = load(
            "01/12/22, 10:00 - A: dec\n01/01/23, 10:00 - A: jan\n01/11/22, 10:00 - A: nov",
        );
        let labels: Vec<String> = ChatAggregator::monthly_timeline(&set)
            .into_iter()
            .map(|b| b.label)
            .collect();
        assert_eq!(labels, vec!["November-2022", "December-2022", "January-2023"]);
    }

    #[test]
    fn test_daily_timeline() {
        let timeline = ChatAggregator::daily_timeline(&sample());
        assert_eq!(timeline.len(), 4);
        assert_eq!(timeline[0].date, NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
        assert_eq!(timeline[0].messages, 2);
        assert_eq!(timeline[3].date, NaiveDate::from_ymd_opt(2024, 2, 16).unwrap());
        assert_eq!(timeline[3].messages, 2);
    }

    #[test]
    fn test_timelines_empty() {
        let empty = MessageSet::default();
        assert!(ChatAggregator::monthly_timeline(&empty).is_empty());
        assert!(ChatAggregator::daily_timeline(&empty).is_empty());
    }

    // ── activity ──────────────────────────────────────────────────────────────

    #[test]
    fn test_weekday_activity_busiest() {
        // 2023-01-02 Monday (2), 2023-01-03 Tuesday, 2023-02-15 Wednesday,
        // 2024-02-16 Friday (2)
        let dist = ChatAggregator::weekday_activity(&sample());
        assert_eq!(dist.buckets.len(), 7);
        assert_eq!(dist.buckets[0].0, "Monday");
        assert_eq!(dist.count_for("Monday"), 2);
        assert_eq!(dist.count_for("Friday"), 2);
        assert_eq!(dist.count_for("Sunday"), 0);
        // Tie between Monday and Friday goes to Monday.
        assert_eq!(dist.busiest.as_deref(), Some("Monday"));
    }

    #[test]
    fn test_weekday_tie_break_is_canonical_not_first_seen() {
        // Sunday appears first in the transcript, Saturday ties it.
        let set = load("08/01/23, 10:00 - A: sun\n07/01/23, 10:00 - A: sat");
        let dist = ChatAggregator::weekday_activity(&set);
        assert_eq!(dist.busiest.as_deref(), Some("Saturday"));
        assert_eq!(ChatAggregator::weekday_activity(&set), dist);
    }

    #[test]
    fn test_month_activity_across_years() {
        let dist = ChatAggregator::month_activity(&sample());
        assert_eq!(dist.buckets.len(), 12);
        assert_eq!(dist.count_for("January"), 3);
        assert_eq!(dist.count_for("February"), 3);
        assert_eq!(dist.busiest.as_deref(), Some("January"));
    }

    #[test]
    fn test_activity_empty_has_no_busiest() {
        let empty = MessageSet::default();
        let week = ChatAggregator::weekday_activity(&empty);
        assert!(week.busiest.is_none());
        assert!(week.buckets.iter().all(|(_, c)| *c == 0));
        assert!(ChatAggregator::month_activity(&empty).busiest.is_none());
    }

    // ── heatmap ───────────────────────────────────────────────────────────────

    #[test]
    fn test_heatmap_cells() {
        let heatmap = ChatAggregator::activity_heatmap(&sample());
        assert_eq!(heatmap.columns.len(), 24);
        assert_eq!(heatmap.columns[13], "13-14");
        assert_eq!(heatmap.rows.len(), 7);
        assert_eq!(heatmap.cell("Monday", 9), 2);
        assert_eq!(heatmap.cell("Tuesday", 21), 1);
        assert_eq!(heatmap.cell("Friday", 13), 2);
        assert_eq!(heatmap.cell("Sunday", 0), 0);
    }

    #[test]
    fn test_heatmap_empty_is_all_zero() {
        let heatmap = ChatAggregator::activity_heatmap(&MessageSet::default());
        assert_eq!(heatmap.rows.len(), 7);
        assert!(heatmap
            .rows
            .iter()
            .all(|r| r.counts.len() == 24 && r.counts.iter().all(|c| *c == 0)));
    }

    // ── user activity ─────────────────────────────────────────────────────────

    #[test]
    fn test_user_activity_ranked() {
        let shares = ChatAggregator::user_activity(&sample());
        let names: Vec<&str> = shares.iter().map(|s| s.author.as_str()).collect();
        // Alice and Bob tie at 2; Alice was seen first.
        assert_eq!(names, vec!["Alice", "Bob", "Cara"]);
        assert_eq!(shares[0].messages, 2);
        assert!((shares[0].percent - 33.33).abs() < 1e-9);
        assert!((shares[2].percent - 16.67).abs() < 1e-9);
    }

    #[test]
    fn test_user_activity_empty() {
        assert!(ChatAggregator::user_activity(&MessageSet::default()).is_empty());
    }

    // ── rank_by_frequency ─────────────────────────────────────────────────────

    #[test]
    fn test_rank_by_frequency_ties_first_seen() {
        let items = ["b", "a", "c", "a", "b", "d"].map(String::from);
        let ranked = rank_by_frequency(items);
        assert_eq!(
            ranked,
            vec![
                ("b".to_string(), 2),
                ("a".to_string(), 2),
                ("c".to_string(), 1),
                ("d".to_string(), 1),
            ]
        );
    }
}
