//! Centralized configuration paths for formula-editor
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/formula-editor/`
//! - Windows: `%APPDATA%\formula-editor\`
//!
//! This module is the single source of truth for config paths.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "formula-editor";

/// Prefix of the daily-rotated log files
pub const LOG_FILE_PREFIX: &str = "formula.log";

/// Base config directory for formula-editor
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/formula-editor`
///   - Else: `~/.config/formula-editor`
///
/// Windows:
///   - `%APPDATA%\formula-editor`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/formula-editor/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/formula-editor/keyclasses.yaml`
pub fn key_classes_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("keyclasses.yaml"))
}

/// `~/.config/formula-editor/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure the base config dir exists, returning it
pub fn ensure_config_dir() -> Result<PathBuf, String> {
    let dir = config_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let config = ensure_config_dir()?;
    let logs = config.join("logs");
    ensure_dir(&logs)?;
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_app_dir() {
        if let (Some(dir), Some(file)) = (config_dir(), config_file()) {
            assert!(dir.ends_with(APP_DIR));
            assert_eq!(file.parent(), Some(dir.as_path()));
        }
        if let Some(classes) = key_classes_file() {
            assert!(classes.to_string_lossy().contains("formula-editor"));
            assert!(classes.ends_with("keyclasses.yaml"));
        }
    }
}
