//! Application-wide constants
//!
//! Column names, raw stat keys, default values and file names live here so the
//! normalizer, the snapshot store and the exports agree on them.

/// Default file locations, relative to the working directory
pub mod files {
    /// Match history export consumed by a run
    pub const INPUT: &str = "club_matches.csv";

    /// Persisted snapshot of known (match, player) rows
    pub const SNAPSHOT: &str = "most_recent_matches.csv";

    /// Hierarchical JSON export
    pub const JSON_EXPORT: &str = "matches_readable.json";

    /// Flat per-player CSV export
    pub const PLAYERS_EXPORT: &str = "players_per_match.csv";

    /// Log file name inside the log directory
    pub const LOG_FILE: &str = "club_match_ingest.log";
}

/// Column names of the input CSV
pub mod input_columns {
    pub const MATCH_ID: &str = "matchId";
    pub const TIMESTAMP: &str = "timestamp";
    pub const TIME_AGO: &str = "timeAgo";
    pub const PLAYERS: &str = "players";
}

/// Keys of the per-player stat maps inside the `players` column.
/// Case-sensitive; the mixed casing matches the upstream export.
pub mod stat_keys {
    pub const PLAYER_NAME: &str = "playername";
    pub const POSITION: &str = "pos";
    pub const ARCHETYPE_ID: &str = "archetypeid";
    pub const RATING: &str = "rating";
    pub const GOALS: &str = "goals";
    pub const ASSISTS: &str = "assists";
    pub const SHOTS: &str = "shots";
    pub const PASSES_MADE: &str = "passesmade";
    pub const PASS_ATTEMPTS: &str = "passattempts";
    pub const TACKLES_MADE: &str = "tacklesmade";
    pub const TACKLE_ATTEMPTS: &str = "tackleattempts";
    pub const SAVES: &str = "saves";
    pub const SECONDS_PLAYED: &str = "secondsPlayed";
    pub const SCORE: &str = "SCORE";
    pub const WINS: &str = "wins";
    pub const LOSSES: &str = "losses";
    pub const RED_CARDS: &str = "redcards";
    pub const USER_RESULT: &str = "userResult";
}

/// Values substituted when a stat key is absent or null
pub mod defaults {
    pub const PLAYER_NAME: &str = "Unknown";
    pub const POSITION: &str = "Unknown";
    pub const ARCHETYPE_ID: &str = "0";
    pub const RATING: f64 = 0.0;
    pub const COUNTER: i64 = 0;
}

/// Environment variable names
pub mod env_vars {
    /// Override for the input CSV path
    pub const INPUT: &str = "CLUB_INGEST_INPUT";

    /// Override for the snapshot CSV path
    pub const SNAPSHOT: &str = "CLUB_INGEST_SNAPSHOT";

    /// Override for the log file path
    pub const LOG_FILE: &str = "CLUB_INGEST_LOG_FILE";
}

/// Directory name used under the platform config dir
pub const APP_DIR_NAME: &str = "club_match_ingest";

/// Default tracing directive for this crate
pub const DEFAULT_LOG_DIRECTIVE: &str = "club_match_ingest=info";
