use super::literal::{LiteralValue, parse_literal};
use super::models::{Match, PlayerStat};
use super::source::RawRow;
use crate::constants::{defaults, input_columns, stat_keys};
use crate::error::RowError;
use tracing::{debug, info, warn};

/// Converts one raw input record into a [`Match`].
///
/// # Arguments
/// * `row` - Record with `matchId`, `timestamp`, `timeAgo` and `players` fields
///
/// # Returns
/// * `Ok(Match)` - One club bucket per club key found in the players data,
///   players in source order
/// * `Err(RowError)` - Missing field, empty match or player id, unparseable
///   players data, or a stat that cannot be coerced to its numeric type
///
/// # Example
/// ```rust
/// use club_match_ingest::ingest::{RawRow, normalize};
///
/// let row = RawRow::new()
///     .with("matchId", "42")
///     .with("timestamp", "T")
///     .with("timeAgo", "2h")
///     .with("players", "{'club1': {'p1': {'playername': 'Alice', 'goals': 2}}}");
///
/// let game = normalize(&row).unwrap();
/// let alice = &game.players_for_club("club1")[0];
/// assert_eq!(alice.player_name, "Alice");
/// assert_eq!(alice.goals, 2);
/// assert_eq!(alice.position, "Unknown");
/// ```
pub fn normalize(row: &RawRow) -> Result<Match, RowError> {
    let match_id = required_field(row, input_columns::MATCH_ID)?;
    if match_id.is_empty() {
        return Err(RowError::empty_identifier(input_columns::MATCH_ID));
    }
    let timestamp = required_field(row, input_columns::TIMESTAMP)?;
    let time_ago = required_field(row, input_columns::TIME_AGO)?;
    let players_text = required_field(row, input_columns::PLAYERS)?;

    let players_data = parse_literal(players_text)
        .map_err(|e| RowError::malformed_players_field(e.to_string()))?;
    let clubs = players_data.as_map().ok_or_else(|| {
        RowError::malformed_players_field(format!(
            "expected a mapping of clubs, found {}",
            players_data.type_name()
        ))
    })?;

    let mut game = Match::new(match_id, timestamp, time_ago);

    for (club_id, club_players) in clubs {
        let players = club_players.as_map().ok_or_else(|| {
            RowError::malformed_players_field(format!(
                "club '{club_id}' should map player ids to stats, found {}",
                club_players.type_name()
            ))
        })?;

        game.ensure_club(club_id);
        for (player_id, stats) in players {
            if player_id.is_empty() {
                return Err(RowError::empty_identifier(format!(
                    "player id in club '{club_id}'"
                )));
            }
            game.push_player(build_player(club_id, player_id, stats)?);
        }
    }

    debug!(
        "Normalized match {} with {} clubs and {} players",
        game.match_id,
        game.clubs().len(),
        game.player_count()
    );

    Ok(game)
}

fn required_field<'a>(row: &'a RawRow, name: &str) -> Result<&'a str, RowError> {
    row.get(name).ok_or_else(|| RowError::missing_field(name))
}

fn build_player(
    club_id: &str,
    player_id: &str,
    stats: &LiteralValue,
) -> Result<PlayerStat, RowError> {
    let stats = StatReader::new(club_id, player_id, stats)?;

    Ok(PlayerStat {
        player_id: player_id.to_string(),
        player_name: stats.text(stat_keys::PLAYER_NAME, defaults::PLAYER_NAME)?,
        club_id: club_id.to_string(),
        position: stats.text(stat_keys::POSITION, defaults::POSITION)?,
        archetype_id: stats.text(stat_keys::ARCHETYPE_ID, defaults::ARCHETYPE_ID)?,
        rating: stats.float(stat_keys::RATING)?,
        goals: stats.int(stat_keys::GOALS)?,
        assists: stats.int(stat_keys::ASSISTS)?,
        shots: stats.int(stat_keys::SHOTS)?,
        passes_made: stats.int(stat_keys::PASSES_MADE)?,
        pass_attempts: stats.int(stat_keys::PASS_ATTEMPTS)?,
        tackles_made: stats.int(stat_keys::TACKLES_MADE)?,
        tackle_attempts: stats.int(stat_keys::TACKLE_ATTEMPTS)?,
        saves: stats.int(stat_keys::SAVES)?,
        seconds_played: stats.int(stat_keys::SECONDS_PLAYED)?,
        score: stats.int(stat_keys::SCORE)?,
        wins: stats.int(stat_keys::WINS)?,
        losses: stats.int(stat_keys::LOSSES)?,
        red_cards: stats.int(stat_keys::RED_CARDS)?,
        user_result: stats.int(stat_keys::USER_RESULT)?,
    })
}

/// Reads named stats of one player, substituting defaults for absent or null
/// values and coercing the rest.
struct StatReader<'a> {
    club_id: &'a str,
    player_id: &'a str,
    entries: &'a [(String, LiteralValue)],
}

impl<'a> StatReader<'a> {
    fn new(club_id: &'a str, player_id: &'a str, stats: &'a LiteralValue) -> Result<Self, RowError> {
        let entries = stats.as_map().ok_or_else(|| {
            RowError::malformed_players_field(format!(
                "stats of player '{player_id}' in club '{club_id}' should be a mapping, found {}",
                stats.type_name()
            ))
        })?;
        Ok(Self {
            club_id,
            player_id,
            entries,
        })
    }

    fn lookup(&self, key: &str) -> Option<&'a LiteralValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .filter(|v| !v.is_none())
    }

    fn coercion_error(&self, key: &str, value: &LiteralValue) -> RowError {
        RowError::field_coercion(key, self.player_id, self.club_id, value.to_string())
    }

    fn text(&self, key: &str, default: &str) -> Result<String, RowError> {
        match self.lookup(key) {
            None => Ok(default.to_string()),
            Some(value) => value
                .as_text()
                .ok_or_else(|| self.coercion_error(key, value)),
        }
    }

    fn int(&self, key: &str) -> Result<i64, RowError> {
        let Some(value) = self.lookup(key) else {
            return Ok(defaults::COUNTER);
        };
        let coerced = match value {
            LiteralValue::Int(i) => Some(*i),
            LiteralValue::Bool(b) => Some(i64::from(*b)),
            LiteralValue::Float(f) => truncate_float(*f),
            LiteralValue::Str(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        coerced.ok_or_else(|| self.coercion_error(key, value))
    }

    fn float(&self, key: &str) -> Result<f64, RowError> {
        let Some(value) = self.lookup(key) else {
            return Ok(defaults::RATING);
        };
        let coerced = match value {
            LiteralValue::Int(i) => Some(*i as f64),
            LiteralValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            LiteralValue::Float(f) => Some(*f),
            LiteralValue::Str(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        coerced.ok_or_else(|| self.coercion_error(key, value))
    }
}

/// Truncates toward zero; non-finite or out-of-range values do not coerce
fn truncate_float(f: f64) -> Option<i64> {
    let truncated = f.trunc();
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated <= i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

/// A row that could not be normalized
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    /// Zero-based position of the row in the input batch
    pub row_index: usize,
    pub error: RowError,
}

/// Result of normalizing a whole batch
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Successfully normalized matches, in input order
    pub matches: Vec<Match>,
    pub failures: Vec<RowFailure>,
}

/// Success and skip counts of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total_rows: usize,
    pub parsed: usize,
    pub skipped: usize,
}

impl BatchOutcome {
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total_rows: self.matches.len() + self.failures.len(),
            parsed: self.matches.len(),
            skipped: self.failures.len(),
        }
    }
}

/// Normalizes every row in order. A failing row is logged and recorded, and
/// the batch continues with the next row.
pub fn normalize_batch(rows: &[RawRow]) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (row_index, row) in rows.iter().enumerate() {
        match normalize(row) {
            Ok(game) => outcome.matches.push(game),
            Err(error) => {
                warn!("Error parsing row {}: {}", row_index, error);
                outcome.failures.push(RowFailure { row_index, error });
            }
        }
    }

    let summary = outcome.summary();
    info!(
        "Parsed {} matches ({} rows, {} skipped)",
        summary.parsed, summary.total_rows, summary.skipped
    );
    outcome
}
