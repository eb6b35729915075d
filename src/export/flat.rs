//! Flat per-player CSV export, one row per (match, club, player).

use super::ensure_parent_dir;
use crate::error::AppError;
use crate::ingest::Match;
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub const PLAYER_EXPORT_COLUMNS: [&str; 21] = [
    "match_id",
    "timestamp",
    "club_id",
    "player_id",
    "player_name",
    "position",
    "archetype_id",
    "rating",
    "goals",
    "assists",
    "shots",
    "passes_made",
    "pass_attempts",
    "tackles_made",
    "tackle_attempts",
    "saves",
    "seconds_played",
    "score",
    "wins",
    "losses",
    "red_cards",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatPlayerRow {
    pub match_id: String,
    pub timestamp: String,
    pub club_id: String,
    pub player_id: String,
    pub player_name: String,
    pub position: String,
    pub archetype_id: String,
    pub rating: f64,
    pub goals: i64,
    pub assists: i64,
    pub shots: i64,
    pub passes_made: i64,
    pub pass_attempts: i64,
    pub tackles_made: i64,
    pub tackle_attempts: i64,
    pub saves: i64,
    pub seconds_played: i64,
    pub score: i64,
    pub wins: i64,
    pub losses: i64,
    pub red_cards: i64,
}

pub fn flatten_for_export(matches: &[Match]) -> Vec<FlatPlayerRow> {
    matches
        .iter()
        .flat_map(|m| {
            m.all_players().map(move |p| FlatPlayerRow {
                match_id: m.match_id.clone(),
                timestamp: m.timestamp.clone(),
                club_id: p.club_id.clone(),
                player_id: p.player_id.clone(),
                player_name: p.player_name.clone(),
                position: p.position.clone(),
                archetype_id: p.archetype_id.clone(),
                rating: p.rating,
                goals: p.goals,
                assists: p.assists,
                shots: p.shots,
                passes_made: p.passes_made,
                pass_attempts: p.pass_attempts,
                tackles_made: p.tackles_made,
                tackle_attempts: p.tackle_attempts,
                saves: p.saves,
                seconds_played: p.seconds_played,
                score: p.score,
                wins: p.wins,
                losses: p.losses,
                red_cards: p.red_cards,
            })
        })
        .collect()
}

/// Writes every player of every match to `path`. The header is written even
/// when there are no players. Returns the number of player rows.
pub fn write_players_csv(path: &Path, matches: &[Match]) -> Result<usize, AppError> {
    let export_error = |e: &dyn std::fmt::Display| {
        AppError::export_write(path.display().to_string(), e.to_string())
    };

    ensure_parent_dir(path).map_err(|e| export_error(&e))?;
    let rows = flatten_for_export(matches);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| export_error(&e))?;
    writer
        .write_record(PLAYER_EXPORT_COLUMNS)
        .map_err(|e| export_error(&e))?;
    for row in &rows {
        writer.serialize(row).map_err(|e| export_error(&e))?;
    }
    writer.flush().map_err(|e| export_error(&e))?;

    info!("Exported {} player records to {}", rows.len(), path.display());
    Ok(rows.len())
}
