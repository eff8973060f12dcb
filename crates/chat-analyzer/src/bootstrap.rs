use anyhow::Context;
use chat_core::settings::Settings;
use chat_data::config::{AnalysisConfig, SystemMessages};
use chat_data::words::WordFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a Python-style level name to an [`EnvFilter`] directive.
///
/// Unrecognised names are passed through lowercased.
pub fn log_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to stderr so stdout carries only the report. Falls back to
/// `"warn"` if the level string is not a valid filter.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(log_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Analysis configuration ─────────────────────────────────────────────────────

/// Build the runtime [`AnalysisConfig`] from command-line settings.
///
/// A `--stop-words` file replaces the built-in list.
pub fn build_config(settings: &Settings) -> anyhow::Result<AnalysisConfig> {
    let min_length = settings.min_word_length as usize;
    let word_filter = match &settings.stop_words {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read stop words from {}", path.display()))?;
            WordFilter::from_stop_word_text(&text, min_length)
        }
        None => WordFilter::default().with_min_length(min_length),
    };

    Ok(AnalysisConfig {
        date_order: settings.date_order()?,
        system_messages: SystemMessages::from_exclude_flag(settings.exclude_system),
        word_filter,
        top_words: settings.top_words as usize,
        ..AnalysisConfig::default()
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
