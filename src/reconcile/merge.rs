use super::snapshot::{Snapshot, flatten_matches};
use crate::error::AppError;
use crate::ingest::Match;
use tracing::{debug, info};

/// Merges the flattened rows of `matches` into a copy of `snapshot`.
///
/// Rows are keyed by (match id, player id). A row whose key already exists
/// replaces the existing row in place with its full content; other rows are
/// appended after all existing rows in iteration order. Merging the same
/// matches again yields the same rows.
///
/// # Errors
/// * `AppError::MalformedSnapshotKey` - a row would have an empty match or
///   player id. Nothing is merged and `snapshot` is left as it was.
///
/// No I/O happens here; persisting the result is up to the caller.
pub fn merge(matches: &[Match], snapshot: &Snapshot) -> Result<Snapshot, AppError> {
    let incoming = flatten_matches(matches);

    if let Some(bad) = incoming
        .iter()
        .find(|r| r.match_id.is_empty() || r.player_id.is_empty())
    {
        return Err(AppError::malformed_snapshot_key(
            bad.match_id.clone(),
            bad.player_id.clone(),
        ));
    }

    let before = snapshot.len();
    let incoming_rows = incoming.len();
    let mut merged = snapshot.clone();
    merged.upsert_all(incoming);

    let appended = merged.len() - before;
    debug!(
        "Merged {} rows: {} appended, {} replaced",
        incoming_rows,
        appended,
        incoming_rows - appended
    );
    info!("Snapshot now holds {} rows", merged.len());

    Ok(merged)
}
