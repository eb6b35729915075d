use crate::cli::Args;
use club_match_ingest::config::Config;
use club_match_ingest::constants::{DEFAULT_LOG_DIRECTIVE, files};
use club_match_ingest::error::AppError;
use std::io::stdout;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEBUG_LOG_DIRECTIVE: &str = "club_match_ingest=debug";

/// Splits the configured log path into a directory and a file name
fn resolve_log_location(args: &Args, config: &Config) -> (String, String) {
    match args.log_file.as_ref().or(config.log_file_path.as_ref()) {
        Some(custom_path) => {
            let path = Path::new(custom_path);
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(files::LOG_FILE);
            (parent.to_string_lossy().to_string(), file_name.to_string())
        }
        None => (Config::get_log_dir_path(), files::LOG_FILE.to_string()),
    }
}

fn env_filter(debug: bool) -> Result<EnvFilter, AppError> {
    let directive = if debug {
        DEBUG_LOG_DIRECTIVE
    } else {
        DEFAULT_LOG_DIRECTIVE
    };
    let directive = directive
        .parse()
        .map_err(|e| AppError::log_setup_error(format!("Invalid log directive: {e}")))?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Sets up logging for the application.
///
/// - Quiet mode: logs only to file
/// - Otherwise: logs to both stdout and file
/// - `--debug` lowers the crate's level to debug
/// - Creates log directory if it doesn't exist
/// - Uses daily rolling file appender
///
/// Returns the path to the log file and the guard that must be kept alive
/// for the duration of the program to ensure proper log flushing.
pub async fn setup_logging(args: &Args, config: &Config) -> Result<(String, WorkerGuard), AppError> {
    let (log_dir, log_file_name) = resolve_log_location(args, config);

    if !Path::new(&log_dir).exists() {
        tokio::fs::create_dir_all(&log_dir).await.map_err(|e| {
            AppError::log_setup_error(format!("Failed to create log directory: {e}"))
        })?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, &log_file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::Layer::new()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(env_filter(args.debug)?);

    let registry = tracing_subscriber::registry().with(file_layer);
    if args.quiet {
        registry.init();
    } else {
        registry
            .with(
                fmt::Layer::new()
                    .with_writer(stdout)
                    .with_ansi(true)
                    .with_filter(env_filter(args.debug)?),
            )
            .init();
    }

    let log_file_path = format!("{log_dir}/{log_file_name}");
    Ok((log_file_path, guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_log_location_defaults_to_config_dir() {
        let args = Args::parse_from(["club_match_ingest"]);
        let (dir, file) = resolve_log_location(&args, &Config::default());
        assert_eq!(dir, Config::get_log_dir_path());
        assert_eq!(file, "club_match_ingest.log");
    }

    #[test]
    fn test_log_file_flag_wins_over_config() {
        let args = Args::parse_from(["club_match_ingest", "--log-file", "/tmp/run/ingest.log"]);
        let config = Config {
            log_file_path: Some("/var/log/other.log".to_string()),
            ..Config::default()
        };
        let (dir, file) = resolve_log_location(&args, &config);
        assert_eq!(dir, "/tmp/run");
        assert_eq!(file, "ingest.log");
    }

    #[test]
    fn test_bare_file_name_logs_to_working_directory() {
        let args = Args::parse_from(["club_match_ingest", "--log-file", "ingest.log"]);
        let (dir, file) = resolve_log_location(&args, &Config::default());
        assert_eq!(dir, ".");
        assert_eq!(file, "ingest.log");
    }
}
