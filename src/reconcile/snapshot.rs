use crate::ingest::{Match, PlayerStat};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Column order of the persisted snapshot
pub const SNAPSHOT_COLUMNS: [&str; 18] = [
    "matchId",
    "timestamp",
    "timeAgo",
    "club_id",
    "player_id",
    "player_name",
    "position",
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
];

/// One persisted (match, player) row.
///
/// Archetype, wins, losses, red cards and user result are not carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    #[serde(rename = "matchId")]
    pub match_id: String,
    pub timestamp: String,
    #[serde(rename = "timeAgo")]
    pub time_ago: String,
    pub club_id: String,
    pub player_id: String,
    pub player_name: String,
    pub position: String,
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
}

impl SnapshotRow {
    pub fn from_player(game: &Match, player: &PlayerStat) -> Self {
        Self {
            match_id: game.match_id.clone(),
            timestamp: game.timestamp.clone(),
            time_ago: game.time_ago.clone(),
            club_id: player.club_id.clone(),
            player_id: player.player_id.clone(),
            player_name: player.player_name.clone(),
            position: player.position.clone(),
            rating: player.rating,
            goals: player.goals,
            assists: player.assists,
            shots: player.shots,
            passes_made: player.passes_made,
            pass_attempts: player.pass_attempts,
            tackles_made: player.tackles_made,
            tackle_attempts: player.tackle_attempts,
            saves: player.saves,
            seconds_played: player.seconds_played,
            score: player.score,
        }
    }

    /// Unique key of the row among all persisted rows
    pub fn key(&self) -> (&str, &str) {
        (&self.match_id, &self.player_id)
    }

    /// Rebuilds the player; fields the snapshot does not carry take defaults
    pub fn to_player(&self) -> PlayerStat {
        PlayerStat {
            player_name: self.player_name.clone(),
            position: self.position.clone(),
            rating: self.rating,
            goals: self.goals,
            assists: self.assists,
            shots: self.shots,
            passes_made: self.passes_made,
            pass_attempts: self.pass_attempts,
            tackles_made: self.tackles_made,
            tackle_attempts: self.tackle_attempts,
            saves: self.saves,
            seconds_played: self.seconds_played,
            score: self.score,
            ..PlayerStat::new(self.player_id.clone(), self.club_id.clone())
        }
    }
}

/// Flattens one match into one row per (club, player) pair
pub fn flatten_match(game: &Match) -> Vec<SnapshotRow> {
    game.all_players()
        .map(|player| SnapshotRow::from_player(game, player))
        .collect()
}

/// Flattens matches in order, club by club, player by player
pub fn flatten_matches(matches: &[Match]) -> Vec<SnapshotRow> {
    matches.iter().flat_map(flatten_match).collect()
}

/// Reconstructs matches from snapshot rows, grouping by match id and then by
/// club id in first-seen order. Match metadata comes from the first row of
/// each match.
pub fn rows_to_matches(rows: &[SnapshotRow]) -> Vec<Match> {
    let mut matches: Vec<Match> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let idx = *positions.entry(row.match_id.as_str()).or_insert_with(|| {
            matches.push(Match::new(
                row.match_id.clone(),
                row.timestamp.clone(),
                row.time_ago.clone(),
            ));
            matches.len() - 1
        });
        matches[idx].push_player(row.to_player());
    }

    matches
}

/// The durable set of known (match, player) rows.
///
/// Holds at most one row per key. Row order is stable: replacing a row keeps
/// its position, new rows go to the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    rows: Vec<SnapshotRow>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from rows in order. Rows sharing a key collapse into
    /// the last one, kept at the position of the first.
    pub fn from_rows(rows: impl IntoIterator<Item = SnapshotRow>) -> Self {
        let mut snapshot = Self::new();
        snapshot.upsert_all(rows);
        snapshot
    }

    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<SnapshotRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct match ids present in the snapshot
    pub fn match_ids(&self) -> HashSet<&str> {
        self.rows.iter().map(|r| r.match_id.as_str()).collect()
    }

    pub fn contains_match(&self, match_id: &str) -> bool {
        self.rows.iter().any(|r| r.match_id == match_id)
    }

    pub fn get(&self, match_id: &str, player_id: &str) -> Option<&SnapshotRow> {
        self.rows.iter().find(|r| r.key() == (match_id, player_id))
    }

    /// Inserts or replaces rows by key
    pub(crate) fn upsert_all(&mut self, rows: impl IntoIterator<Item = SnapshotRow>) {
        let mut index: HashMap<(String, String), usize> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| ((r.match_id.clone(), r.player_id.clone()), i))
            .collect();

        for row in rows {
            let key = (row.match_id.clone(), row.player_id.clone());
            match index.get(&key) {
                Some(&i) => self.rows[i] = row,
                None => {
                    index.insert(key, self.rows.len());
                    self.rows.push(row);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match() -> Match {
        let mut game = Match::new("m1", "1700000000", "1 hour ago");
        let mut p1 = PlayerStat::new("p1", "home");
        p1.player_name = "Alice".to_string();
        p1.goals = 2;
        p1.rating = 8.5;
        p1.archetype_id = "5".to_string();
        p1.wins = 1;
        p1.red_cards = 1;
        let p2 = PlayerStat::new("p2", "away");
        let p3 = PlayerStat::new("p3", "home");
        game.push_player(p1);
        game.push_player(p2);
        game.push_player(p3);
        game
    }

    fn row(match_id: &str, player_id: &str, score: i64) -> SnapshotRow {
        let game = Match::new(match_id, "T", "now");
        let mut player = PlayerStat::new(player_id, "c");
        player.score = score;
        SnapshotRow::from_player(&game, &player)
    }

    #[test]
    fn test_flatten_match_one_row_per_player() {
        let rows = flatten_match(&sample_match());
        let keys: Vec<(&str, &str)> = rows.iter().map(|r| r.key()).collect();
        assert_eq!(keys, vec![("m1", "p1"), ("m1", "p3"), ("m1", "p2")]);
        assert_eq!(rows[0].club_id, "home");
        assert_eq!(rows[0].player_name, "Alice");
        assert_eq!(rows[0].time_ago, "1 hour ago");
        assert_eq!(rows[2].club_id, "away");
    }

    #[test]
    fn test_round_trip_preserves_membership_and_carried_fields() {
        let original = sample_match();
        let rebuilt = rows_to_matches(&flatten_match(&original));
        assert_eq!(rebuilt.len(), 1);
        let rebuilt = &rebuilt[0];

        assert_eq!(rebuilt.match_id, original.match_id);
        assert_eq!(rebuilt.timestamp, original.timestamp);
        assert_eq!(rebuilt.club_ids(), original.club_ids());

        for club in original.club_ids() {
            let before = original.players_for_club(club);
            let after = rebuilt.players_for_club(club);
            assert_eq!(before.len(), after.len());
            for (b, a) in before.iter().zip(after) {
                // Dropped by the projection
                let expected = PlayerStat {
                    archetype_id: "0".to_string(),
                    wins: 0,
                    losses: 0,
                    red_cards: 0,
                    user_result: 0,
                    ..b.clone()
                };
                assert_eq!(a, &expected);
            }
        }
    }

    #[test]
    fn test_rows_to_matches_groups_interleaved_rows() {
        let rows = vec![row("a", "1", 0), row("b", "2", 0), row("a", "3", 0)];
        let matches = rows_to_matches(&rows);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].match_id, "a");
        assert_eq!(matches[0].player_count(), 2);
        assert_eq!(matches[1].player_count(), 1);
    }

    #[test]
    fn test_from_rows_collapses_duplicate_keys() {
        let snapshot = Snapshot::from_rows(vec![
            row("m1", "p1", 3),
            row("m1", "p2", 1),
            row("m1", "p1", 5),
        ]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.rows()[0].key(), ("m1", "p1"));
        assert_eq!(snapshot.rows()[0].score, 5);
        assert_eq!(snapshot.get("m1", "p2").unwrap().score, 1);
    }

    #[test]
    fn test_snapshot_queries() {
        let snapshot = Snapshot::from_rows(vec![row("m1", "p1", 0), row("m2", "p1", 0)]);
        assert!(snapshot.contains_match("m2"));
        assert!(!snapshot.contains_match("m3"));
        assert_eq!(snapshot.match_ids(), HashSet::from(["m1", "m2"]));
        assert!(snapshot.get("m2", "p2").is_none());
        assert!(Snapshot::new().is_empty());
    }
}
