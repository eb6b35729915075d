use crate::constants::defaults;
use serde::Serialize;

/// One player's performance in one match for one club.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStat {
    pub player_id: String,
    pub player_name: String,
    pub club_id: String,
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
    pub user_result: i64,
}

impl PlayerStat {
    /// Creates a player with every stat at its default value
    pub fn new(player_id: impl Into<String>, club_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            player_name: defaults::PLAYER_NAME.to_string(),
            club_id: club_id.into(),
            position: defaults::POSITION.to_string(),
            archetype_id: defaults::ARCHETYPE_ID.to_string(),
            rating: defaults::RATING,
            goals: defaults::COUNTER,
            assists: defaults::COUNTER,
            shots: defaults::COUNTER,
            passes_made: defaults::COUNTER,
            pass_attempts: defaults::COUNTER,
            tackles_made: defaults::COUNTER,
            tackle_attempts: defaults::COUNTER,
            saves: defaults::COUNTER,
            seconds_played: defaults::COUNTER,
            score: defaults::COUNTER,
            wins: defaults::COUNTER,
            losses: defaults::COUNTER,
            red_cards: defaults::COUNTER,
            user_result: defaults::COUNTER,
        }
    }
}

/// The ordered roster of one club within a match
#[derive(Debug, Clone, PartialEq)]
pub struct ClubRoster {
    pub club_id: String,
    pub players: Vec<PlayerStat>,
}

/// One completed match.
///
/// Club buckets keep the order in which clubs appeared in the source data and
/// club ids are unique within a match. Any number of clubs is allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub match_id: String,
    /// Opaque, not parsed as a date
    pub timestamp: String,
    pub time_ago: String,
    clubs: Vec<ClubRoster>,
}

impl Match {
    pub fn new(
        match_id: impl Into<String>,
        timestamp: impl Into<String>,
        time_ago: impl Into<String>,
    ) -> Self {
        Self {
            match_id: match_id.into(),
            timestamp: timestamp.into(),
            time_ago: time_ago.into(),
            clubs: Vec::new(),
        }
    }

    /// Adds an empty bucket for `club_id` if it is not present yet
    pub fn ensure_club(&mut self, club_id: &str) {
        if !self.clubs.iter().any(|c| c.club_id == club_id) {
            self.clubs.push(ClubRoster {
                club_id: club_id.to_string(),
                players: Vec::new(),
            });
        }
    }

    /// Appends `player` to the bucket named by its `club_id`, creating the
    /// bucket at the end when needed.
    pub fn push_player(&mut self, player: PlayerStat) {
        match self.clubs.iter_mut().find(|c| c.club_id == player.club_id) {
            Some(roster) => roster.players.push(player),
            None => self.clubs.push(ClubRoster {
                club_id: player.club_id.clone(),
                players: vec![player],
            }),
        }
    }

    pub fn clubs(&self) -> &[ClubRoster] {
        &self.clubs
    }

    pub fn club_ids(&self) -> Vec<&str> {
        self.clubs.iter().map(|c| c.club_id.as_str()).collect()
    }

    /// Players of one club; empty when the club did not take part
    pub fn players_for_club(&self, club_id: &str) -> &[PlayerStat] {
        self.clubs
            .iter()
            .find(|c| c.club_id == club_id)
            .map(|c| c.players.as_slice())
            .unwrap_or(&[])
    }

    /// All players, club by club, in roster order
    pub fn all_players(&self) -> impl Iterator<Item = &PlayerStat> {
        self.clubs.iter().flat_map(|c| c.players.iter())
    }

    pub fn player_count(&self) -> usize {
        self.clubs.iter().map(|c| c.players.len()).sum()
    }
}
