pub mod detect;
pub mod merge;
pub mod snapshot;
pub mod store;

pub use detect::{NewMatchDetection, detect_new};
pub use merge::merge;
pub use snapshot::{
    SNAPSHOT_COLUMNS, Snapshot, SnapshotRow, flatten_match, flatten_matches, rows_to_matches,
};
pub use store::{CsvSnapshotStore, SnapshotStore};
