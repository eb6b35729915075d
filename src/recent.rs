use crate::ingest::{Match, PlayerStat};

/// The first match of a run with its players flattened across clubs.
#[derive(Debug, Clone, PartialEq)]
pub struct MostRecentMatch {
    pub match_id: String,
    pub timestamp: String,
    pub time_ago: String,
    pub players: Vec<PlayerStat>,
    pub is_new: bool,
}

impl MostRecentMatch {
    pub fn players_for_club(&self, club_id: &str) -> Vec<&PlayerStat> {
        self.players.iter().filter(|p| p.club_id == club_id).collect()
    }

    pub fn all_players(&self) -> &[PlayerStat] {
        &self.players
    }
}

/// Selects the most recent match.
///
/// The source lists matches newest first, so this is the first match in input
/// order; nothing is sorted. Returns `None` when there are no matches.
pub fn select_most_recent(matches: &[Match], is_new: bool) -> Option<MostRecentMatch> {
    let first = matches.first()?;
    Some(MostRecentMatch {
        match_id: first.match_id.clone(),
        timestamp: first.timestamp.clone(),
        time_ago: first.time_ago.clone(),
        players: first.all_players().cloned().collect(),
        is_new,
    })
}
