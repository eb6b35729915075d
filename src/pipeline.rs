//! The full ingestion run: read, normalize, reconcile, select, export.

use crate::error::AppError;
use crate::export::{write_document, write_players_csv};
use crate::ingest::{BatchSummary, Match, RowFailure, normalize_batch, read_rows};
use crate::recent::{MostRecentMatch, select_most_recent};
use crate::reconcile::{CsvSnapshotStore, NewMatchDetection, Snapshot, SnapshotStore, detect_new, merge};
use std::path::PathBuf;
use tracing::{error, info};

/// File locations for one run. Exports are skipped when their path is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    pub input: PathBuf,
    pub snapshot: PathBuf,
    pub json_export: Option<PathBuf>,
    pub players_export: Option<PathBuf>,
}

impl RunPaths {
    /// Checks that no run output would overwrite the input, and that the
    /// snapshot and the exports do not share a file
    pub fn validate(&self) -> Result<(), AppError> {
        let mut targets = vec![("snapshot", &self.snapshot)];
        targets.extend(self.json_export.iter().map(|p| ("JSON export", p)));
        targets.extend(self.players_export.iter().map(|p| ("players export", p)));

        for (i, (label, path)) in targets.iter().enumerate() {
            if *path == &self.input {
                return Err(AppError::config_error(format!(
                    "The {label} path must differ from the input path: '{}'",
                    path.display()
                )));
            }
            if let Some((other, _)) = targets[..i].iter().find(|(_, p)| p == path) {
                return Err(AppError::config_error(format!(
                    "The {label} and {other} paths must differ: '{}'",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// What reconciliation did with the snapshot
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub detection: NewMatchDetection,
    /// The merged snapshot, present only when new matches were found
    pub merged: Option<Snapshot>,
    /// Persistence failure of the merged snapshot. The merge itself succeeded.
    pub write_error: Option<AppError>,
}

/// Everything a run produced
#[derive(Debug)]
pub struct RunReport {
    pub batch: BatchSummary,
    pub failures: Vec<RowFailure>,
    pub matches: Vec<Match>,
    pub detection: NewMatchDetection,
    pub most_recent: Option<MostRecentMatch>,
    pub merged_snapshot: Option<Snapshot>,
    pub snapshot_write_error: Option<AppError>,
}

impl RunReport {
    /// True when the merged snapshot could not be persisted
    pub fn has_fatal_error(&self) -> bool {
        self.snapshot_write_error.is_some()
    }
}

/// Detects new matches against `store` and, when there are any, merges and
/// saves them.
///
/// # Errors
/// * `AppError::SnapshotRead` - the stored snapshot exists but is unreadable
/// * `AppError::MalformedSnapshotKey` - merge aborted; nothing was written
///
/// A failing `save` does not error: the merged snapshot is returned together
/// with the write error so the caller can retry persisting it.
pub fn reconcile_with_store(
    matches: &[Match],
    store: &dyn SnapshotStore,
) -> Result<ReconcileOutcome, AppError> {
    let existing = store.load()?;
    let detection = detect_new(matches, existing.as_ref());

    if !detection.has_new() {
        return Ok(ReconcileOutcome {
            detection,
            merged: None,
            write_error: None,
        });
    }

    let merged = merge(matches, &existing.unwrap_or_default())?;
    let write_error = match store.save(&merged) {
        Ok(()) => None,
        Err(e) => {
            error!("{}", e);
            Some(e)
        }
    };

    Ok(ReconcileOutcome {
        detection,
        merged: Some(merged),
        write_error,
    })
}

/// Runs the whole pipeline over the files in `paths`.
///
/// Row failures are recorded in the report and never abort the run. Colliding
/// paths, reading the input or the snapshot, and writing exports are fatal.
pub fn run(paths: &RunPaths) -> Result<RunReport, AppError> {
    paths.validate()?;
    info!("Reading match history from {}", paths.input.display());
    let rows = read_rows(&paths.input)?;
    let outcome = normalize_batch(&rows);
    let batch = outcome.summary();

    let store = CsvSnapshotStore::new(&paths.snapshot);
    let reconciled = reconcile_with_store(&outcome.matches, &store)?;

    let most_recent = select_most_recent(&outcome.matches, reconciled.detection.has_new());

    if let Some(path) = &paths.json_export {
        write_document(path, &outcome.matches)?;
    }
    if let Some(path) = &paths.players_export {
        write_players_csv(path, &outcome.matches)?;
    }

    Ok(RunReport {
        batch,
        failures: outcome.failures,
        matches: outcome.matches,
        detection: reconciled.detection,
        most_recent,
        merged_snapshot: reconciled.merged,
        snapshot_write_error: reconciled.write_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::PlayerStat;
    use crate::reconcile::flatten_matches;
    use std::cell::RefCell;

    /// In-memory store recording every save
    #[derive(Default)]
    struct MemoryStore {
        stored: RefCell<Option<Snapshot>>,
        saves: RefCell<usize>,
        fail_saves: bool,
    }

    impl SnapshotStore for MemoryStore {
        fn load(&self) -> Result<Option<Snapshot>, AppError> {
            Ok(self.stored.borrow().clone())
        }

        fn save(&self, snapshot: &Snapshot) -> Result<(), AppError> {
            if self.fail_saves {
                return Err(AppError::snapshot_write("memory", "disk full"));
            }
            *self.saves.borrow_mut() += 1;
            *self.stored.borrow_mut() = Some(snapshot.clone());
            Ok(())
        }
    }

    struct BrokenStore;

    impl SnapshotStore for BrokenStore {
        fn load(&self) -> Result<Option<Snapshot>, AppError> {
            Err(AppError::snapshot_read("broken", "bad header"))
        }

        fn save(&self, _snapshot: &Snapshot) -> Result<(), AppError> {
            panic!("save must not be called after a failed load");
        }
    }

    fn game(id: &str) -> Match {
        let mut m = Match::new(id, "T", "now");
        m.push_player(PlayerStat::new("p1", "c1"));
        m.push_player(PlayerStat::new("p2", "c2"));
        m
    }

    #[test]
    fn test_first_run_saves_everything() {
        let store = MemoryStore::default();
        let outcome = reconcile_with_store(&[game("1"), game("2")], &store).unwrap();

        assert!(!outcome.detection.snapshot_existed);
        assert!(outcome.detection.has_new());
        assert_eq!(outcome.merged.as_ref().unwrap().len(), 4);
        assert_eq!(*store.saves.borrow(), 1);
    }

    #[test]
    fn test_known_matches_skip_the_write() {
        let store = MemoryStore::default();
        *store.stored.borrow_mut() = Some(Snapshot::from_rows(flatten_matches(&[game("1")])));

        let outcome = reconcile_with_store(&[game("1")], &store).unwrap();
        assert!(!outcome.detection.has_new());
        assert!(outcome.merged.is_none());
        assert_eq!(*store.saves.borrow(), 0);
    }

    #[test]
    fn test_save_failure_still_returns_merged_snapshot() {
        let store = MemoryStore {
            fail_saves: true,
            ..MemoryStore::default()
        };
        let outcome = reconcile_with_store(&[game("1")], &store).unwrap();

        assert!(outcome.merged.is_some());
        assert!(matches!(
            outcome.write_error,
            Some(AppError::SnapshotWrite { .. })
        ));
    }

    #[test]
    fn test_unreadable_snapshot_is_fatal() {
        let err = reconcile_with_store(&[game("1")], &BrokenStore).unwrap_err();
        assert!(matches!(err, AppError::SnapshotRead { .. }));
    }

    #[test]
    fn test_malformed_key_aborts_before_save() {
        let store = MemoryStore::default();
        let bad = Match::new("", "T", "now");
        let mut bad = bad;
        bad.push_player(PlayerStat::new("p1", "c1"));

        let err = reconcile_with_store(&[bad], &store).unwrap_err();
        assert!(matches!(err, AppError::MalformedSnapshotKey { .. }));
        assert_eq!(*store.saves.borrow(), 0);
        assert!(store.stored.borrow().is_none());
    }

    fn paths(input: &str, snapshot: &str) -> RunPaths {
        RunPaths {
            input: PathBuf::from(input),
            snapshot: PathBuf::from(snapshot),
            json_export: Some(PathBuf::from("out.json")),
            players_export: Some(PathBuf::from("players.csv")),
        }
    }

    #[test]
    fn test_distinct_paths_are_valid() {
        assert!(paths("in.csv", "snap.csv").validate().is_ok());
    }

    #[test]
    fn test_snapshot_on_input_is_rejected() {
        let err = paths("x.csv", "x.csv").validate().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("snapshot path must differ from the input"));
    }

    #[test]
    fn test_export_collisions_are_rejected() {
        let mut p = paths("in.csv", "snap.csv");
        p.players_export = Some(PathBuf::from("in.csv"));
        assert!(p.validate().is_err());

        let mut p = paths("in.csv", "snap.csv");
        p.json_export = Some(PathBuf::from("snap.csv"));
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("JSON export and snapshot"));

        let mut p = paths("in.csv", "snap.csv");
        p.json_export = None;
        p.players_export = Some(PathBuf::from("snap.csv"));
        assert!(p.validate().is_err());
    }
}
