pub mod literal;
pub mod models;
pub mod normalizer;
pub mod source;

pub use literal::{LiteralError, LiteralValue, parse_literal};
pub use models::{ClubRoster, Match, PlayerStat};
pub use normalizer::{BatchOutcome, BatchSummary, RowFailure, normalize, normalize_batch};
pub use source::{RawRow, read_rows, read_rows_from_reader};
