use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use club_match_ingest::config::Config;
use club_match_ingest::pipeline::RunPaths;
use std::path::PathBuf;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Club match history ingester
///
/// Reads a match-history CSV export, normalizes every row, reports which
/// matches were not seen on earlier runs and merges them into the snapshot.
/// A readable JSON document and a flat per-player CSV are written alongside.
///
/// Paths not given on the command line come from the config file, then from
/// the built-in defaults.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
#[command(version)]
#[command(styles = get_styles())]
pub struct Args {
    /// Match history CSV with matchId, timestamp, timeAgo and players columns.
    pub input: Option<String>,

    /// Snapshot CSV of previously seen (match, player) rows. Created if missing.
    #[arg(long = "snapshot", short = 's', help_heading = "Files")]
    pub snapshot: Option<String>,

    /// Destination of the hierarchical JSON export.
    #[arg(long = "json-out", help_heading = "Files")]
    pub json_out: Option<String>,

    /// Destination of the flat per-player CSV export.
    #[arg(long = "players-out", help_heading = "Files")]
    pub players_out: Option<String>,

    /// Skip both exports. The snapshot is still updated.
    #[arg(long = "no-export", help_heading = "Files")]
    pub no_export: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Store the paths given on this command line in the config file and exit.
    #[arg(long = "save-config", help_heading = "Configuration")]
    pub save_config: bool,

    /// Only write logs to the log file; the run summary is still printed.
    #[arg(long = "quiet", short = 'q', help_heading = "Output")]
    pub quiet: bool,

    /// Enable debug logging, including per-row details.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}

impl Args {
    /// Returns `config` with every path given on the command line applied
    pub fn apply_to_config(&self, config: &Config) -> Config {
        let mut updated = config.clone();
        if let Some(input) = &self.input {
            updated.input_path = input.clone();
        }
        if let Some(snapshot) = &self.snapshot {
            updated.snapshot_path = snapshot.clone();
        }
        if let Some(json_out) = &self.json_out {
            updated.json_export_path = json_out.clone();
        }
        if let Some(players_out) = &self.players_out {
            updated.players_export_path = players_out.clone();
        }
        if let Some(log_file) = &self.log_file {
            updated.log_file_path = Some(log_file.clone());
        }
        updated
    }

    /// Resolves the run's file locations. Flags win over the config.
    pub fn run_paths(&self, config: &Config) -> RunPaths {
        let resolved = self.apply_to_config(config);

        let (json_export, players_export) = if self.no_export {
            (None, None)
        } else {
            (
                Some(PathBuf::from(resolved.json_export_path)),
                Some(PathBuf::from(resolved.players_export_path)),
            )
        };

        RunPaths {
            input: PathBuf::from(resolved.input_path),
            snapshot: PathBuf::from(resolved.snapshot_path),
            json_export,
            players_export,
        }
    }
}
