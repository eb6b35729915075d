use super::Config;
use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - No configured path may be empty
/// - The input and snapshot paths must differ, otherwise a run would
///   overwrite its own input
/// - If a log file path is provided, its parent directory must exist or be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    let required = [
        ("Input path", &config.input_path),
        ("Snapshot path", &config.snapshot_path),
        ("JSON export path", &config.json_export_path),
        ("Players export path", &config.players_export_path),
    ];
    for (label, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::config_error(format!("{label} cannot be empty")));
        }
    }

    if Path::new(&config.input_path) == Path::new(&config.snapshot_path) {
        return Err(AppError::config_error(format!(
            "Input path and snapshot path must differ: '{}'",
            config.input_path
        )));
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
