//! Plain-text summaries printed at the end of a run.

use crate::ingest::{BatchSummary, Match};
use crate::recent::MostRecentMatch;
use std::fmt::Write;

/// Renders a readable summary of one match: metadata, clubs, and one line per
/// player with goals, assists and rating.
pub fn format_match_summary(game: &Match) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Match ID: {}", game.match_id);
    let _ = writeln!(out, "Timestamp: {}", game.timestamp);
    let _ = writeln!(out, "Time Ago: {}", game.time_ago);
    let _ = writeln!(out, "Clubs in match: {}", game.club_ids().join(", "));

    for roster in game.clubs() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "  Club {} ({} players):",
            roster.club_id,
            roster.players.len()
        );
        for p in &roster.players {
            let _ = writeln!(
                out,
                "    - {} ({}): {} goals, {} assists, Rating: {}/10",
                p.player_name, p.position, p.goals, p.assists, p.rating
            );
        }
    }
    out
}

/// Short description of the selected most recent match
pub fn format_most_recent(recent: &MostRecentMatch) -> String {
    format!(
        "Most Recent Match:\n  Match ID: {}\n  Timestamp: {}\n  Is New: {}\n  Total Players: {}\n",
        recent.match_id,
        recent.timestamp,
        recent.is_new,
        recent.players.len()
    )
}

/// One line with the success and skip counts of a batch
pub fn format_batch_summary(summary: &BatchSummary) -> String {
    format!(
        "Parsed {} of {} rows ({} skipped)",
        summary.parsed, summary.total_rows, summary.skipped
    )
}
