//! Hierarchical JSON export: one entry per match, players grouped by club.

use super::ensure_parent_dir;
use crate::error::AppError;
use crate::ingest::{ClubRoster, Match, PlayerStat};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct MatchDocument<'a> {
    pub generated_at: String,
    pub match_count: usize,
    pub matches: Vec<DocumentMatch<'a>>,
}

#[derive(Debug, Serialize)]
pub struct DocumentMatch<'a> {
    pub match_id: &'a str,
    pub timestamp: &'a str,
    pub time_ago: &'a str,
    pub clubs: DocumentClubs<'a>,
}

/// Serializes as a JSON object keyed by club id, in roster order
#[derive(Debug)]
pub struct DocumentClubs<'a>(&'a [ClubRoster]);

impl Serialize for DocumentClubs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for roster in self.0 {
            let players: Vec<DocumentPlayer<'_>> =
                roster.players.iter().map(DocumentPlayer::from).collect();
            map.serialize_entry(&roster.club_id, &players)?;
        }
        map.end()
    }
}

/// Player entry; the club id is implied by the enclosing key
#[derive(Debug, Serialize)]
pub struct DocumentPlayer<'a> {
    pub player_id: &'a str,
    pub player_name: &'a str,
    pub position: &'a str,
    pub archetype_id: &'a str,
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
    pub user_result: i64,
}

impl<'a> From<&'a PlayerStat> for DocumentPlayer<'a> {
    fn from(p: &'a PlayerStat) -> Self {
        Self {
            player_id: &p.player_id,
            player_name: &p.player_name,
            position: &p.position,
            archetype_id: &p.archetype_id,
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
            user_result: p.user_result,
        }
    }
}

pub fn build_document(matches: &[Match], generated_at: DateTime<Utc>) -> MatchDocument<'_> {
    MatchDocument {
        generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        match_count: matches.len(),
        matches: matches
            .iter()
            .map(|m| DocumentMatch {
                match_id: &m.match_id,
                timestamp: &m.timestamp,
                time_ago: &m.time_ago,
                clubs: DocumentClubs(m.clubs()),
            })
            .collect(),
    }
}

/// Writes the pretty-printed document for `matches` to `path`
pub fn write_document(path: &Path, matches: &[Match]) -> Result<(), AppError> {
    let export_error = |e: &dyn std::fmt::Display| {
        AppError::export_write(path.display().to_string(), e.to_string())
    };

    ensure_parent_dir(path).map_err(|e| export_error(&e))?;
    let file = File::create(path).map_err(|e| export_error(&e))?;
    let mut writer = BufWriter::new(file);

    let document = build_document(matches, Utc::now());
    serde_json::to_writer_pretty(&mut writer, &document).map_err(|e| export_error(&e))?;
    writer.write_all(b"\n").map_err(|e| export_error(&e))?;
    writer.flush().map_err(|e| export_error(&e))?;

    info!("Exported {} matches to {}", matches.len(), path.display());
    Ok(())
}
