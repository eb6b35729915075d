use crate::constants::{input_columns, stat_keys};
use crate::error::AppError;
use crate::ingest::{Match, PlayerStat, RawRow};
use std::fmt::Write as _;
use std::path::Path;

/// Test utilities for creating match data and input files
pub struct TestDataBuilder;

impl TestDataBuilder {
    /// Creates a player with a name, position and a couple of counters set
    pub fn create_player(player_id: &str, club_id: &str, name: &str, goals: i64) -> PlayerStat {
        let mut player = PlayerStat::new(player_id, club_id);
        player.player_name = name.to_string();
        player.position = "midfielder".to_string();
        player.goals = goals;
        player.assists = 1;
        player.rating = 7.5;
        player.seconds_played = 5400;
        player
    }

    /// Creates a match between `home` and `away` with two players per club
    pub fn create_match(match_id: &str, home: &str, away: &str) -> Match {
        let mut game = Match::new(match_id, format!("17000{match_id}"), "1 hour ago");
        for (club, prefix) in [(home, "h"), (away, "a")] {
            for n in 1..=2 {
                let player_id = format!("{prefix}{n}");
                let name = format!("{club} player {n}");
                game.push_player(Self::create_player(&player_id, club, &name, n - 1));
            }
        }
        game
    }

    /// Creates `count` matches, newest first, with descending numeric ids
    pub fn create_multiple_matches(count: usize) -> Vec<Match> {
        (0..count)
            .map(|i| Self::create_match(&(1000 - i).to_string(), "home", "away"))
            .collect()
    }

    /// Renders the players of `game` in the nested literal notation of the
    /// `players` column
    pub fn players_literal(game: &Match) -> String {
        let quote = |s: &str| format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"));

        let mut out = String::from("{");
        for (ci, roster) in game.clubs().iter().enumerate() {
            if ci > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}: {{", quote(&roster.club_id));
            for (pi, p) in roster.players.iter().enumerate() {
                if pi > 0 {
                    out.push_str(", ");
                }
                let texts = [
                    (stat_keys::PLAYER_NAME, quote(&p.player_name)),
                    (stat_keys::POSITION, quote(&p.position)),
                    (stat_keys::ARCHETYPE_ID, quote(&p.archetype_id)),
                    (stat_keys::RATING, format!("{:?}", p.rating)),
                ];
                let counters = [
                    (stat_keys::GOALS, p.goals),
                    (stat_keys::ASSISTS, p.assists),
                    (stat_keys::SHOTS, p.shots),
                    (stat_keys::PASSES_MADE, p.passes_made),
                    (stat_keys::PASS_ATTEMPTS, p.pass_attempts),
                    (stat_keys::TACKLES_MADE, p.tackles_made),
                    (stat_keys::TACKLE_ATTEMPTS, p.tackle_attempts),
                    (stat_keys::SAVES, p.saves),
                    (stat_keys::SECONDS_PLAYED, p.seconds_played),
                    (stat_keys::SCORE, p.score),
                    (stat_keys::WINS, p.wins),
                    (stat_keys::LOSSES, p.losses),
                    (stat_keys::RED_CARDS, p.red_cards),
                    (stat_keys::USER_RESULT, p.user_result),
                ];
                let fields: Vec<String> = texts
                    .into_iter()
                    .map(|(k, v)| format!("{}: {}", quote(k), v))
                    .chain(counters.into_iter().map(|(k, v)| format!("{}: {}", quote(k), v)))
                    .collect();
                let _ = write!(out, "{}: {{{}}}", quote(&p.player_id), fields.join(", "));
            }
            out.push('}');
        }
        out.push('}');
        out
    }

    /// Creates the raw input row that normalizes back into `game`
    pub fn create_raw_row(game: &Match) -> RawRow {
        RawRow::new()
            .with(input_columns::MATCH_ID, game.match_id.as_str())
            .with(input_columns::TIMESTAMP, game.timestamp.as_str())
            .with(input_columns::TIME_AGO, game.time_ago.as_str())
            .with(input_columns::PLAYERS, Self::players_literal(game))
    }

    /// Writes an input CSV holding `matches` in the given order
    pub fn write_input_csv(path: &Path, matches: &[Match]) -> Result<(), AppError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            input_columns::MATCH_ID,
            input_columns::TIMESTAMP,
            input_columns::TIME_AGO,
            input_columns::PLAYERS,
        ])?;
        for game in matches {
            let players = Self::players_literal(game);
            writer.write_record([
                game.match_id.as_str(),
                game.timestamp.as_str(),
                game.time_ago.as_str(),
                players.as_str(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Checks the structural rules every normalized match must satisfy
    pub fn validate_match(game: &Match) -> Result<(), String> {
        if game.match_id.is_empty() {
            return Err("Match id cannot be empty".to_string());
        }
        for roster in game.clubs() {
            for p in &roster.players {
                if p.club_id != roster.club_id {
                    return Err(format!(
                        "Player {} is filed under club {} but belongs to {}",
                        p.player_id, roster.club_id, p.club_id
                    ));
                }
                if p.player_id.is_empty() {
                    return Err(format!("Empty player id in club {}", roster.club_id));
                }
            }
        }
        Ok(())
    }
}
