//! Centralized configuration paths for cellsync
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/cellsync/`
//! - Windows: `%APPDATA%\cellsync\`

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

const APP_DIR: &str = "cellsync";

/// Base config directory for cellsync
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/cellsync`
///   - Else: `~/.config/cellsync`
///
/// Windows:
///   - `%APPDATA%\cellsync`
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

/// `~/.config/cellsync/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/cellsync/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))
}

/// Ensure the base config dir exists, returning it
pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
    let dir = config_dir().context("No config directory available")?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> anyhow::Result<PathBuf> {
    let logs = ensure_config_dir()?.join("logs");
    ensure_dir(&logs)?;
    Ok(logs)
}
