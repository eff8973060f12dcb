mod bootstrap;
mod report;

use std::process::ExitCode;

use anyhow::Result;
use chat_core::settings::Settings;
use chat_data::analysis::{analyze_file, list_users};

fn main() -> ExitCode {
    let settings = Settings::load();

    if let Err(err) = bootstrap::setup_logging(&settings.log_level) {
        eprintln!("Unable to initialise logging: {:#}", err);
    }

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("Run failed: {:?}", err);
            eprintln!("Unable to process transcript: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<()> {
    tracing::info!("Chat Analyzer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "File: {}, date format: {}, user: {}",
        settings.file.display(),
        settings.date_format,
        settings.user
    );

    if settings.list_users {
        let users = list_users(&settings.file, settings.date_order()?)?;
        print!("{}", report::render_users(&users));
        return Ok(());
    }

    let config = bootstrap::build_config(settings)?;
    let analysis = analyze_file(&settings.file, &config, &settings.selection())?;

    if settings.wants_json() {
        println!("{}", analysis.to_json_pretty()?);
    } else {
        print!("{}", report::render_report(&analysis));
    }

    Ok(())
}
