use crate::constants::{env_vars, files};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing file locations for a run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Match history CSV read on every run.
    #[serde(default = "default_input_path")]
    pub input_path: String,
    /// Snapshot of known (match, player) rows. Created on the first run.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
    /// Hierarchical JSON export destination.
    #[serde(default = "default_json_export_path")]
    pub json_export_path: String,
    /// Flat per-player CSV export destination.
    #[serde(default = "default_players_export_path")]
    pub players_export_path: String,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
}

fn default_input_path() -> String {
    files::INPUT.to_string()
}

fn default_snapshot_path() -> String {
    files::SNAPSHOT.to_string()
}

fn default_json_export_path() -> String {
    files::JSON_EXPORT.to_string()
}

fn default_players_export_path() -> String {
    files::PLAYERS_EXPORT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_path: default_input_path(),
            snapshot_path: default_snapshot_path(),
            json_export_path: default_json_export_path(),
            players_export_path: default_players_export_path(),
            log_file_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// A missing config file yields the defaults; nothing is written.
    /// Environment variables can override config file values.
    ///
    /// # Environment Variables
    /// - `CLUB_INGEST_INPUT` - Override input CSV path
    /// - `CLUB_INGEST_SNAPSHOT` - Override snapshot CSV path
    /// - `CLUB_INGEST_LOG_FILE` - Override log file path
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(AppError)` - Error occurred during load or validation
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Replaces fields with values from the environment, when set
    pub fn apply_env_overrides(&mut self) {
        if let Ok(input) = std::env::var(env_vars::INPUT) {
            self.input_path = input;
        }

        if let Ok(snapshot) = std::env::var(env_vars::SNAPSHOT) {
            self.snapshot_path = snapshot;
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    ///
    /// # Notes
    /// - Shows config file location and the effective settings
    /// - Defaults are shown when no config file exists
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();
        let config = Config::load().await?;

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        if Path::new(&config_path).exists() {
            println!("{config_path}");
        } else {
            println!("{config_path} (not created, using defaults)");
        }
        println!("────────────────────────────────────");
        println!("Input:");
        println!("{}", config.input_path);
        println!("────────────────────────────────────");
        println!("Snapshot:");
        println!("{}", config.snapshot_path);
        println!("────────────────────────────────────");
        println!("Exports:");
        println!("{}", config.json_export_path);
        println!("{}", config.players_export_path);
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/{}", files::LOG_FILE);
            println!("(Default location)");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path, creating the parent
    /// directory if it doesn't exist.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }

        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path. Missing keys take defaults.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn clear_env() {
        // SAFETY: tests touching the environment are serialized with #[serial]
        unsafe {
            std::env::remove_var(env_vars::INPUT);
            std::env::remove_var(env_vars::SNAPSHOT);
            std::env::remove_var(env_vars::LOG_FILE);
        }
    }

    #[test]
    fn test_default_config_uses_default_file_names() {
        let config = Config::default();
        assert_eq!(config.input_path, "club_matches.csv");
        assert_eq!(config.snapshot_path, "most_recent_matches.csv");
        assert_eq!(config.json_export_path, "matches_readable.json");
        assert_eq!(config.players_export_path, "players_per_match.csv");
        assert_eq!(config.log_file_path, None);
    }

    #[tokio::test]
    async fn test_config_load_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config_content = r#"
input_path = "/data/club.csv"
snapshot_path = "/data/snapshot.csv"
log_file_path = "/custom/log/path"
"#;
        tokio::fs::write(&config_path, config_content).await.unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();

        assert_eq!(config.input_path, "/data/club.csv");
        assert_eq!(config.snapshot_path, "/data/snapshot.csv");
        assert_eq!(config.json_export_path, "matches_readable.json");
        assert_eq!(config.log_file_path, Some("/custom/log/path".to_string()));
    }

    #[tokio::test]
    async fn test_config_empty_file_takes_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "").await.unwrap();

        let config = Config::load_from_path(&config_path.to_string_lossy())
            .await
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_config_save_and_load_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("dir").join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config = Config {
            input_path: "in.csv".to_string(),
            snapshot_path: "snap.csv".to_string(),
            json_export_path: "out/matches.json".to_string(),
            players_export_path: "out/players.csv".to_string(),
            log_file_path: Some("/tmp/ingest.log".to_string()),
        };
        config.save_to_path(&config_path_str).await.unwrap();
        assert!(config_path.exists());

        let content = tokio::fs::read_to_string(&config_path).await.unwrap();
        assert!(content.contains("snapshot_path") && content.contains("snap.csv"));

        let loaded = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_log_file_path_skipped_when_none() {
        let toml_string = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(!toml_string.contains("log_file_path"));
        assert!(toml_string.contains("input_path"));
    }

    #[tokio::test]
    async fn test_config_load_from_nonexistent_path() {
        let result = Config::load_from_path("/nonexistent/path/config.toml").await;
        assert!(matches!(result.unwrap_err(), AppError::Io(_)));
    }

    #[tokio::test]
    async fn test_config_malformed_toml_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "input_path = [unclosed")
            .await
            .unwrap();

        let result = Config::load_from_path(&config_path.to_string_lossy()).await;
        assert!(matches!(result.unwrap_err(), AppError::TomlDeserialize(_)));
    }

    #[tokio::test]
    async fn test_config_with_extra_fields() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "input_path = \"a.csv\"\nunknown_field = 3\n")
            .await
            .unwrap();

        let config = Config::load_from_path(&config_path.to_string_lossy())
            .await
            .unwrap();
        assert_eq!(config.input_path, "a.csv");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        // SAFETY: serialized with other env tests
        unsafe {
            std::env::set_var(env_vars::INPUT, "/env/in.csv");
            std::env::set_var(env_vars::LOG_FILE, "/env/ingest.log");
        }

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.input_path, "/env/in.csv");
        assert_eq!(config.snapshot_path, "most_recent_matches.csv");
        assert_eq!(config.log_file_path, Some("/env/ingest.log".to_string()));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_overrides_absent_leave_config_untouched() {
        clear_env();
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_get_config_path() {
        let path = Config::get_config_path();
        assert!(path.contains("club_match_ingest"));
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn test_get_log_dir_path() {
        let path = Config::get_log_dir_path();
        assert!(path.contains("club_match_ingest"));
        assert!(path.ends_with("logs"));
    }
}
