//! Club match history ingestion library
//!
//! This library reads match-history CSV exports whose `players` column holds a
//! nested literal map, normalizes them into typed matches, detects matches
//! that were not seen on earlier runs, and writes a readable JSON document and
//! a flat per-player CSV.
//!
//! # Examples
//!
//! ```rust,no_run
//! use club_match_ingest::error::AppError;
//! use club_match_ingest::pipeline::{RunPaths, run};
//!
//! fn main() -> Result<(), AppError> {
//!     let report = run(&RunPaths {
//!         input: "club_matches.csv".into(),
//!         snapshot: "most_recent_matches.csv".into(),
//!         json_export: Some("matches_readable.json".into()),
//!         players_export: None,
//!     })?;
//!
//!     println!("new matches: {:?}", report.detection.new_match_ids);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod ingest;
pub mod pipeline;
pub mod recent;
pub mod reconcile;
pub mod report;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::{AppError, RowError};
pub use ingest::{Match, PlayerStat, RawRow, normalize, normalize_batch};
pub use pipeline::{RunPaths, RunReport, run};
pub use recent::{MostRecentMatch, select_most_recent};
pub use reconcile::{CsvSnapshotStore, NewMatchDetection, Snapshot, SnapshotStore, detect_new, merge};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
