use thiserror::Error;

/// Run-level errors. Anything here aborts the step that raised it.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read input rows from {path}: {message}")]
    InputRead { path: String, message: String },

    // Snapshot persistence errors
    #[error("Snapshot at {path} exists but could not be read: {message}")]
    SnapshotRead { path: String, message: String },

    #[error("Failed to write snapshot to {path}: {message}")]
    SnapshotWrite { path: String, message: String },

    #[error("Snapshot row has an empty key: match_id='{match_id}', player_id='{player_id}'")]
    MalformedSnapshotKey { match_id: String, player_id: String },

    // Export errors
    #[error("Failed to write export to {path}: {message}")]
    ExportWrite { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create an input read error for the row source at `path`
    pub fn input_read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InputRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a snapshot read error. Only used when the file exists;
    /// a missing snapshot is not an error.
    pub fn snapshot_read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SnapshotRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a snapshot write error
    pub fn snapshot_write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SnapshotWrite {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a malformed snapshot key error
    pub fn malformed_snapshot_key(
        match_id: impl Into<String>,
        player_id: impl Into<String>,
    ) -> Self {
        Self::MalformedSnapshotKey {
            match_id: match_id.into(),
            player_id: player_id.into(),
        }
    }

    /// Create an export write error
    pub fn export_write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExportWrite {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if the error came from reading or writing the persisted snapshot
    pub fn is_fatal_snapshot_error(&self) -> bool {
        matches!(
            self,
            AppError::SnapshotRead { .. } | AppError::SnapshotWrite { .. }
        )
    }
}

/// Per-row normalization errors. A row failing with one of these is skipped;
/// the rest of the batch is still processed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RowError {
    #[error("Row is missing required field '{field}'")]
    MissingField { field: String },

    #[error("Could not parse players data: {message}")]
    MalformedPlayersField { message: String },

    #[error("Row has an empty {field}")]
    EmptyIdentifier { field: String },

    #[error("Field '{field}' of player '{player_id}' (club '{club_id}') cannot be coerced from {value}")]
    FieldCoercion {
        field: String,
        player_id: String,
        club_id: String,
        value: String,
    },
}

impl RowError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn empty_identifier(field: impl Into<String>) -> Self {
        Self::EmptyIdentifier {
            field: field.into(),
        }
    }

    pub fn malformed_players_field(message: impl Into<String>) -> Self {
        Self::MalformedPlayersField {
            message: message.into(),
        }
    }

    pub fn field_coercion(
        field: impl Into<String>,
        player_id: impl Into<String>,
        club_id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::FieldCoercion {
            field: field.into(),
            player_id: player_id.into(),
            club_id: club_id.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_helper() {
        let error = AppError::config_error("Invalid configuration");
        assert!(matches!(error, AppError::Config(_)));
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid configuration"
        );
    }

    #[test]
    fn test_log_setup_error_helper() {
        let error = AppError::log_setup_error("Failed to initialize logger");
        assert!(matches!(error, AppError::LogSetup(_)));
        assert_eq!(
            error.to_string(),
            "Log setup error: Failed to initialize logger"
        );
    }

    #[test]
    fn test_snapshot_read_helper() {
        let error = AppError::snapshot_read("most_recent_matches.csv", "missing column");
        assert!(matches!(error, AppError::SnapshotRead { .. }));
        assert_eq!(
            error.to_string(),
            "Snapshot at most_recent_matches.csv exists but could not be read: missing column"
        );
    }

    #[test]
    fn test_snapshot_write_helper() {
        let error = AppError::snapshot_write("/readonly/snap.csv", "permission denied");
        assert!(matches!(error, AppError::SnapshotWrite { .. }));
        assert_eq!(
            error.to_string(),
            "Failed to write snapshot to /readonly/snap.csv: permission denied"
        );
    }

    #[test]
    fn test_malformed_snapshot_key_helper() {
        let error = AppError::malformed_snapshot_key("42", "");
        assert_eq!(
            error.to_string(),
            "Snapshot row has an empty key: match_id='42', player_id=''"
        );
    }

    #[test]
    fn test_is_fatal_snapshot_error() {
        assert!(AppError::snapshot_read("a", "b").is_fatal_snapshot_error());
        assert!(AppError::snapshot_write("a", "b").is_fatal_snapshot_error());

        assert!(!AppError::input_read("a", "b").is_fatal_snapshot_error());
        assert!(!AppError::export_write("a", "b").is_fatal_snapshot_error());
        assert!(!AppError::config_error("bad").is_fatal_snapshot_error());
        assert!(!AppError::malformed_snapshot_key("", "p1").is_fatal_snapshot_error());
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::Io(_)));
    }

    #[test]
    fn test_error_from_toml_deserialize() {
        let invalid_toml = "invalid = [toml";
        let toml_error = toml::from_str::<toml::Table>(invalid_toml).unwrap_err();
        let app_error: AppError = toml_error.into();
        assert!(matches!(app_error, AppError::TomlDeserialize(_)));
    }

    #[test]
    fn test_row_error_messages() {
        let error = RowError::missing_field("players");
        assert_eq!(error.to_string(), "Row is missing required field 'players'");

        let error = RowError::empty_identifier("matchId");
        assert_eq!(error.to_string(), "Row has an empty matchId");

        let error = RowError::malformed_players_field("unexpected '}' at offset 3");
        assert_eq!(
            error.to_string(),
            "Could not parse players data: unexpected '}' at offset 3"
        );

        let error = RowError::field_coercion("goals", "p1", "club1", "'many'");
        assert_eq!(
            error.to_string(),
            "Field 'goals' of player 'p1' (club 'club1') cannot be coerced from 'many'"
        );
    }

    #[test]
    fn test_error_display_formats() {
        let errors = vec![
            AppError::config_error("test config error"),
            AppError::log_setup_error("test log error"),
            AppError::input_read("club_matches.csv", "not found"),
            AppError::snapshot_read("snap.csv", "bad header"),
            AppError::snapshot_write("snap.csv", "disk full"),
            AppError::export_write("out.json", "disk full"),
            AppError::malformed_snapshot_key("", ""),
        ];

        for error in errors {
            let display_string = error.to_string();
            assert!(
                display_string.len() > 5,
                "Error display should be descriptive: {error:?}"
            );
        }
    }
}
