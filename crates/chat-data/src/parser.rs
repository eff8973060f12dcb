//! Line parser for exported chat transcripts.
//!
//! Recognises header lines of the form `<date>, <time> - <author>: <body>`
//! and folds every other line into the preceding message as a continuation.

use chat_core::error::{AnalyzerError, Result};
use chat_core::models::{Author, DateOrder};
use chat_core::time_utils::parse_header_timestamp;
use chrono::NaiveDateTime;
use regex::Regex;
use tracing::debug;

/// Characters stripped before header matching: zero-width spaces and
/// joiners, bidi marks and embeddings, BOM.
const INVISIBLE_CHARS: &[char] = &[
    '\u{200B}', '\u{200C}', '\u{200D}', '\u{200E}', '\u{200F}', '\u{202A}', '\u{202B}',
    '\u{202C}', '\u{202D}', '\u{202E}', '\u{2060}', '\u{2066}', '\u{2067}', '\u{2068}',
    '\u{2069}', '\u{FEFF}',
];

// ── HeaderGrammar ─────────────────────────────────────────────────────────────

/// The pieces of a recognised header line, borrowed from the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch<'a> {
    pub date: &'a str,
    pub time: &'a str,
    /// `AM` / `p.m.` style marker when the export uses a 12-hour clock.
    pub meridiem: Option<&'a str>,
    /// `None` for system lines, which carry no `author: ` prefix.
    pub author: Option<&'a str>,
    pub body: &'a str,
    /// Byte offset of `body` within the matched line.
    pub body_offset: usize,
}

/// Regular grammar for message header lines.
#[derive(Debug, Clone)]
pub struct HeaderGrammar {
    pattern: Regex,
}

impl HeaderGrammar {
    pub fn new() -> Self {
        let pattern = Regex::new(
            r"^(?P<date>\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}),\s+(?P<time>\d{1,2}:\d{2}(?::\d{2})?)\s?(?P<meridiem>[AaPp]\.?\s?[Mm]\.?)?\s+-\s?(?P<rest>.*)$",
        )
        .expect("regex is valid");
        Self { pattern }
    }

    /// Match `line` (already sanitised) against the header grammar.
    pub fn match_line<'a>(&self, line: &'a str) -> Option<HeaderMatch<'a>> {
        let caps = self.pattern.captures(line)?;
        let date = caps.name("date")?.as_str();
        let time = caps.name("time")?.as_str();
        let meridiem = caps.name("meridiem").map(|m| m.as_str());
        let rest = caps.name("rest")?;

        // Both branches of `split_author` return a suffix of `rest`.
        let (author, body) = split_author(rest.as_str());
        Some(HeaderMatch {
            date,
            time,
            meridiem,
            author,
            body,
            body_offset: rest.end() - body.len(),
        })
    }
}

impl Default for HeaderGrammar {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `"Alice: hi"` into `(Some("Alice"), "hi")`. Text without an
/// `author: ` prefix is a system line.
fn split_author(rest: &str) -> (Option<&str>, &str) {
    if let Some((author, body)) = rest.split_once(": ") {
        let author = author.trim();
        if !author.is_empty() {
            return (Some(author), body);
        }
    }
    // "Alice:" with an empty body.
    if let Some(author) = rest.strip_suffix(':') {
        let author = author.trim();
        if !author.is_empty() && !author.contains(':') {
            return (Some(author), "");
        }
    }
    (None, rest)
}

/// Direction marks, embeddings and BOM. Dropped from the ends of stored
/// bodies as well as before matching.
const DIRECTION_MARKS: &[char] = &[
    '\u{200E}', '\u{200F}', '\u{202A}', '\u{202B}', '\u{202C}', '\u{202D}', '\u{202E}',
    '\u{2066}', '\u{2067}', '\u{2068}', '\u{2069}', '\u{FEFF}',
];

fn is_no_break_space(c: char) -> bool {
    c == '\u{00A0}' || c == '\u{202F}'
}

/// Trim direction marks (and only those) from both ends of `text`.
fn trim_direction_marks(text: &str) -> &str {
    text.trim_matches(|c: char| DIRECTION_MARKS.contains(&c))
}

/// A line with invisible characters removed and no-break spaces turned into
/// plain spaces, for matching only. Remembers the raw byte offset of every
/// kept character so matched ranges can be read back from the raw line.
#[derive(Debug, Clone)]
pub struct SanitizedLine<'a> {
    raw: &'a str,
    text: String,
    /// `(clean offset, raw offset)` per kept char, plus the end of the line.
    origins: Vec<(usize, usize)>,
}

impl<'a> SanitizedLine<'a> {
    pub fn new(raw: &'a str) -> Self {
        let mut text = String::with_capacity(raw.len());
        let mut origins = Vec::with_capacity(raw.len() + 1);
        for (offset, c) in raw.char_indices() {
            if INVISIBLE_CHARS.contains(&c) {
                continue;
            }
            origins.push((text.len(), offset));
            text.push(if is_no_break_space(c) { ' ' } else { c });
        }
        origins.push((text.len(), raw.len()));
        Self { raw, text, origins }
    }

    /// The cleaned text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The raw line from the character at clean byte `offset` onwards.
    pub fn raw_from(&self, offset: usize) -> &'a str {
        let start = match self.origins.binary_search_by_key(&offset, |(clean, _)| *clean) {
            Ok(i) => self.origins[i].1,
            Err(_) => self.raw.len(),
        };
        &self.raw[start..]
    }
}

// ── ParsedEntry ───────────────────────────────────────────────────────────────

/// One message as read from the transcript, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntry {
    /// 1-based line number of the header.
    pub line: usize,
    pub timestamp: NaiveDateTime,
    pub author: Author,
    /// Header body plus continuation lines, joined with `\n`.
    pub body: String,
}

// ── TranscriptParser ──────────────────────────────────────────────────────────

/// Turns transcript text into [`ParsedEntry`] records.
pub struct TranscriptParser {
    order: DateOrder,
    grammar: HeaderGrammar,
}

impl TranscriptParser {
    pub fn new(order: DateOrder) -> Self {
        Self {
            order,
            grammar: HeaderGrammar::new(),
        }
    }

    /// Parse the whole transcript.
    ///
    /// Empty input yields no entries. A non-blank line before the first
    /// header is a [`AnalyzerError::Structural`] error; a header whose date
    /// or time is invalid under the configured order is a
    /// [`AnalyzerError::DateFormat`] error. Both abort the parse.
    pub fn parse(&self, text: &str) -> Result<Vec<ParsedEntry>> {
        let mut entries: Vec<ParsedEntry> = Vec::new();
        // Blank lines inside a message, kept verbatim until a later
        // continuation confirms they are not trailing.
        let mut pending_blank_lines: Vec<&str> = Vec::new();
        let mut continuation_lines = 0u64;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = SanitizedLine::new(raw);

            if let Some(header) = self.grammar.match_line(line.text()) {
                let timestamp =
                    parse_header_timestamp(header.date, header.time, header.meridiem, self.order)
                        .ok_or_else(|| AnalyzerError::DateFormat {
                            line: line_no,
                            text: raw.to_string(),
                        })?;
                let author = match header.author {
                    Some(name) => Author::User(name.to_string()),
                    None => Author::System,
                };
                entries.push(ParsedEntry {
                    line: line_no,
                    timestamp,
                    author,
                    body: trim_direction_marks(line.raw_from(header.body_offset)).to_string(),
                });
                pending_blank_lines.clear();
                continue;
            }

            if line.text().trim().is_empty() {
                if !entries.is_empty() {
                    pending_blank_lines.push(trim_direction_marks(raw));
                }
                continue;
            }

            let Some(current) = entries.last_mut() else {
                return Err(AnalyzerError::Structural {
                    line: line_no,
                    text: raw.to_string(),
                });
            };
            for blank in pending_blank_lines.drain(..) {
                current.body.push('\n');
                current.body.push_str(blank);
            }
            current.body.push('\n');
            current.body.push_str(trim_direction_marks(raw));
            continuation_lines += 1;
        }

        debug!(
            "Parsed {} messages ({} continuation lines, order {})",
            entries.len(),
            continuation_lines,
            self.order
        );

        Ok(entries)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
