//! Plain-text rendering of an [`AnalysisReport`].
//!
//! Columns are padded by display width so emoji and non-Latin names line up.

use std::fmt::Write;

use chat_core::formatting;
use chat_data::aggregator::ActivityDistribution;
use chat_data::analysis::AnalysisReport;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Participants listed in the user activity table.
const TOP_USERS: usize = 5;
/// Emoji listed in the emoji table.
const TOP_EMOJI: usize = 10;
/// Display columns kept of each message in the sentiment word list.
const MESSAGE_COLUMNS: usize = 48;

// ── Table layout ──────────────────────────────────────────────────────────────

/// Left-aligned first column, right-aligned remaining columns.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.width());
            }
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header_cells, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            let fill = " ".repeat(width.saturating_sub(cell.width()));
            if i == 0 {
                format!("{}{}", cell, fill)
            } else {
                format!("{}{}", fill, cell)
            }
        })
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}\n{}", title, "=".repeat(title.width()));
}

/// Flatten `text` to one line and cut it to `max` display columns,
/// marking the cut with `…`.
fn clip(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.width() <= max {
        return flat;
    }
    let mut out = String::new();
    let mut used = 0;
    for c in flat.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn distribution_rows(dist: &ActivityDistribution) -> Vec<Vec<String>> {
    dist.buckets
        .iter()
        .map(|(name, count)| vec![name.clone(), formatting::format_count(*count)])
        .collect()
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Render every section of `report` as text.
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let meta = &report.metadata;
    let _ = writeln!(
        out,
        "Chat analysis for {} ({} of {} messages)",
        meta.selection,
        formatting::format_count(meta.messages_selected as u64),
        formatting::format_count(meta.messages_parsed as u64)
    );
    if meta.empty_selection {
        let _ = writeln!(out, "No messages found for {}.", meta.selection);
        return out;
    }

    section(&mut out, "Top Statistics");
    let stats = &report.stats;
    out.push_str(&render_table(
        &["Metric", "Count"],
        &[
            vec!["Messages".into(), formatting::format_count(stats.messages)],
            vec!["Words".into(), formatting::format_count(stats.words)],
            vec!["Media shared".into(), formatting::format_count(stats.media)],
            vec!["Deleted".into(), formatting::format_count(stats.deleted)],
            vec!["Links shared".into(), formatting::format_count(stats.links)],
        ],
    ));

    if !report.user_activity.is_empty() {
        section(&mut out, "Most Active Users");
        let rows: Vec<Vec<String>> = report
            .user_activity
            .iter()
            .take(TOP_USERS)
            .map(|u| {
                vec![
                    u.author.clone(),
                    formatting::format_count(u.messages),
                    formatting::format_percent(u.percent),
                ]
            })
            .collect();
        out.push_str(&render_table(&["User", "Messages", "Share"], &rows));
    }

    section(&mut out, "Monthly Timeline");
    let rows: Vec<Vec<String>> = report
        .monthly_timeline
        .iter()
        .map(|b| vec![b.label.clone(), formatting::format_count(b.messages)])
        .collect();
    out.push_str(&render_table(&["Month", "Messages"], &rows));

    section(&mut out, "Daily Timeline");
    let rows: Vec<Vec<String>> = report
        .daily_timeline
        .iter()
        .map(|b| {
            vec![
                b.date.format("%Y-%m-%d").to_string(),
                formatting::format_count(b.messages),
            ]
        })
        .collect();
    out.push_str(&render_table(&["Date", "Messages"], &rows));

    section(&mut out, "Activity Map");
    let _ = writeln!(
        out,
        "Most busy day: {}",
        report.weekday_activity.busiest.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "Most busy month: {}\n",
        report.month_activity.busiest.as_deref().unwrap_or("-")
    );
    out.push_str(&render_table(
        &["Day", "Messages"],
        &distribution_rows(&report.weekday_activity),
    ));
    out.push('\n');
    out.push_str(&render_table(
        &["Month", "Messages"],
        &distribution_rows(&report.month_activity),
    ));

    section(&mut out, "Weekly Activity Heatmap");
    out.push_str(&render_heatmap(report));

    section(&mut out, "Emoji");
    if report.emoji.is_empty() {
        out.push_str("No emoji found.\n");
    } else {
        let rows: Vec<Vec<String>> = report
            .emoji
            .iter()
            .take(TOP_EMOJI)
            .map(|e| vec![e.emoji.clone(), formatting::format_count(e.count)])
            .collect();
        out.push_str(&render_table(&["Emoji", "Count"], &rows));
    }

    section(&mut out, "Most Common Words");
    let rows: Vec<Vec<String>> = report
        .common_words
        .iter()
        .map(|w| vec![w.word.clone(), formatting::format_count(w.count)])
        .collect();
    out.push_str(&render_table(&["Word", "Count"], &rows));

    section(&mut out, "Sentiment");
    let s = &report.sentiment;
    let mut rows = vec![
        vec!["Positive".into(), formatting::format_count(s.positive)],
        vec!["Negative".into(), formatting::format_count(s.negative)],
        vec!["Neutral".into(), formatting::format_count(s.neutral)],
    ];
    if s.skipped > 0 {
        rows.push(vec!["Skipped".into(), formatting::format_count(s.skipped)]);
    }
    out.push_str(&render_table(&["Class", "Messages"], &rows));

    section(&mut out, "Sentiment Word List");
    let rows: Vec<Vec<String>> = report
        .sentiment_rows
        .iter()
        .map(|r| {
            vec![
                r.author.clone(),
                clip(&r.message, MESSAGE_COLUMNS),
                r.class.to_string(),
                formatting::format_score(r.polarity),
                formatting::format_number(r.subjectivity, 2),
            ]
        })
        .collect();
    out.push_str(&render_table(
        &["User", "Message", "Class", "Polarity", "Subjectivity"],
        &rows,
    ));

    out
}

/// Weekday rows by hour columns; hour headers show the band start.
fn render_heatmap(report: &AnalysisReport) -> String {
    let heatmap = &report.activity_heatmap;
    let hours: Vec<String> = heatmap
        .columns
        .iter()
        .map(|c| c.split('-').next().unwrap_or(c).to_string())
        .collect();
    let mut headers: Vec<&str> = vec!["Day"];
    headers.extend(hours.iter().map(String::as_str));

    let rows: Vec<Vec<String>> = heatmap
        .rows
        .iter()
        .map(|r| {
            let mut row = vec![r.weekday.chars().take(3).collect::<String>()];
            row.extend(r.counts.iter().map(|c| c.to_string()));
            row
        })
        .collect();
    render_table(&headers, &rows)
}

/// One selectable user per line.
pub fn render_users(users: &[String]) -> String {
    users.iter().map(|u| format!("{}\n", u)).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
