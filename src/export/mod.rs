pub mod document;
pub mod flat;

pub use document::{MatchDocument, build_document, write_document};
pub use flat::{FlatPlayerRow, PLAYER_EXPORT_COLUMNS, flatten_for_export, write_players_csv};

use std::path::Path;

/// Creates the parent directory of `path` when it is missing
pub(crate) fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent)
        }
        _ => Ok(()),
    }
}
