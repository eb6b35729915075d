// src/main.rs
mod cli;
mod logging;

use clap::Parser;
use cli::Args;
use club_match_ingest::config::Config;
use club_match_ingest::error::AppError;
use club_match_ingest::pipeline::run;
use club_match_ingest::report::{format_batch_summary, format_match_summary, format_most_recent};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    if args.list_config {
        return Config::display().await;
    }

    let config = Config::load().await?;

    if args.save_config {
        let updated = args.apply_to_config(&config);
        updated.validate()?;
        updated.save().await?;
        println!("Configuration saved to {}", Config::get_config_path());
        return Ok(());
    }

    let (log_file_path, _guard) = logging::setup_logging(&args, &config).await?;
    info!("Logs are written to {}", log_file_path);

    let paths = args.run_paths(&config);
    let report = run(&paths).inspect_err(|e| {
        if e.is_fatal_snapshot_error() {
            error!("Snapshot left unchanged: {}", e);
        } else {
            error!("Run failed: {}", e);
        }
    })?;

    println!("{}", format_batch_summary(&report.batch));
    for failure in &report.failures {
        println!("  row {}: {}", failure.row_index, failure.error);
    }

    if report.detection.has_new() {
        println!(
            "New matches: {}",
            report.detection.new_match_ids.join(", ")
        );
    } else {
        println!("No new matches");
    }

    if let Some(recent) = &report.most_recent {
        println!();
        print!("{}", format_most_recent(recent));
        if !args.quiet
            && let Some(game) = report.matches.first()
        {
            println!();
            print!("{}", format_match_summary(game));
        }
    }

    match report.snapshot_write_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
