use super::snapshot::Snapshot;
use crate::ingest::Match;
use std::collections::HashSet;
use tracing::info;

/// Which matches of a run are not yet in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatchDetection {
    /// Ids not present in the snapshot, in first-appearance order
    pub new_match_ids: Vec<String>,
    /// False on a first run, when no snapshot had been persisted yet
    pub snapshot_existed: bool,
    /// Number of matches the detection ran over
    pub current_match_count: usize,
}

impl NewMatchDetection {
    /// True when the snapshot should be updated: there is at least one match
    /// and either no snapshot existed or some match id is unknown.
    pub fn has_new(&self) -> bool {
        self.current_match_count > 0 && (!self.snapshot_existed || !self.new_match_ids.is_empty())
    }

    pub fn is_new(&self, match_id: &str) -> bool {
        self.new_match_ids.iter().any(|id| id == match_id)
    }
}

/// Computes `{ids of matches} - {ids in snapshot}`.
///
/// With no snapshot every match id is new and `snapshot_existed` is false, so
/// a first run is distinguishable from a snapshot that simply had no overlap.
pub fn detect_new(matches: &[Match], snapshot: Option<&Snapshot>) -> NewMatchDetection {
    let known: HashSet<&str> = snapshot.map(Snapshot::match_ids).unwrap_or_default();

    let mut seen = HashSet::new();
    let new_match_ids: Vec<String> = matches
        .iter()
        .map(|m| m.match_id.as_str())
        .filter(|id| !known.contains(id) && seen.insert(*id))
        .map(str::to_string)
        .collect();

    let detection = NewMatchDetection {
        new_match_ids,
        snapshot_existed: snapshot.is_some(),
        current_match_count: matches.len(),
    };

    if !detection.snapshot_existed {
        info!("No existing snapshot found. All current matches are new.");
    } else if detection.new_match_ids.is_empty() {
        info!("No new matches detected");
    } else {
        info!("Detected {} new match(es)", detection.new_match_ids.len());
    }

    detection
}
