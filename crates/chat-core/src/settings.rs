use clap::Parser;
use std::path::PathBuf;

use crate::error::Result;
use crate::models::{DateOrder, UserSelection};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Statistics, timelines, emoji, word and sentiment analysis for exported chats
#[derive(Parser, Debug, Clone)]
#[command(
    name = "chat-analyzer",
    about = "Statistics, timelines, emoji, word and sentiment analysis for exported chats",
    version
)]
pub struct Settings {
    /// Exported chat transcript (.txt)
    pub file: PathBuf,

    /// Date format used in the export
    #[arg(long, default_value = "dd-mm-yy", value_parser = ["dd-mm-yy", "mm-dd-yy"])]
    pub date_format: String,

    /// Participant to analyse ("Everyone" for the whole chat)
    #[arg(long, default_value = "Everyone")]
    pub user: String,

    /// Print the selectable users and exit
    #[arg(long)]
    pub list_users: bool,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Number of most common words to report (1-500)
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u32).range(1..=500))]
    pub top_words: u32,

    /// Ignore words shorter than this many characters (1-20)
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u32).range(1..=20))]
    pub min_word_length: u32,

    /// Newline-separated stop-word list replacing the built-in one
    #[arg(long)]
    pub stop_words: Option<PathBuf>,

    /// Drop system notices (joins, leaves, encryption banner) before aggregating
    #[arg(long)]
    pub exclude_system: bool,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::resolve)
    }

    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The `--date-format` value as a typed [`DateOrder`].
    pub fn date_order(&self) -> Result<DateOrder> {
        self.date_format.parse()
    }

    /// The `--user` value as a typed [`UserSelection`].
    pub fn selection(&self) -> UserSelection {
        match self.user.parse() {
            Ok(selection) => selection,
            Err(never) => match never {},
        }
    }

    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
