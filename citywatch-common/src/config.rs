//! Configuration loading and data folder resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Environment variable naming the data folder (highest priority after CLI)
pub const DATA_FOLDER_ENV: &str = "CITYWATCH_DATA";

/// Environment variable holding the shared admin credential
pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";

/// Data folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. CITYWATCH_DATA environment variable
/// 3. TOML config file (`data_folder` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_folder(cli_arg: Option<&str>) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATA_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(folder) = config.get("data_folder").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(folder));
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(default_data_folder())
}

/// Get the configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/citywatch/config.toml first, then /etc/citywatch/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("citywatch").join("config.toml"));
        let system_config = PathBuf::from("/etc/citywatch/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    }

    let config_path = dirs::config_dir()
        .map(|d| d.join("citywatch").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// Get OS-dependent default data folder path
fn default_data_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("citywatch"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/citywatch"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("citywatch"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/citywatch"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("citywatch"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\citywatch"))
    } else {
        PathBuf::from("./citywatch_data")
    }
}

/// Ensure the data folder and its images subdirectory exist
pub fn ensure_data_folder(folder: &std::path::Path) -> Result<()> {
    std::fs::create_dir_all(folder)?;
    std::fs::create_dir_all(folder.join("images"))?;
    Ok(())
}

/// Path of the SQLite database inside the data folder
pub fn database_path(folder: &std::path::Path) -> PathBuf {
    folder.join("citywatch.db")
}

/// Shared admin credential from the environment.
///
/// Returns `None` when unset or blank; the portal disables admin login in
/// that case rather than falling back to a compiled-in password.
pub fn admin_password() -> Option<String> {
    match std::env::var(ADMIN_PASSWORD_ENV) {
        Ok(pwd) if !pwd.trim().is_empty() => Some(pwd),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arg_wins() {
        let folder = resolve_data_folder(Some("/tmp/cw-test")).unwrap();
        assert_eq!(folder, PathBuf::from("/tmp/cw-test"));
    }

    #[test]
    fn test_default_folder_is_nonempty() {
        let folder = default_data_folder();
        assert!(!folder.as_os_str().is_empty());
    }

    #[test]
    fn test_database_path_under_folder() {
        let folder = PathBuf::from("/tmp/cw");
        assert_eq!(database_path(&folder), PathBuf::from("/tmp/cw/citywatch.db"));
    }

    #[test]
    fn test_ensure_data_folder_creates_images_dir() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("data");
        ensure_data_folder(&folder).unwrap();
        assert!(folder.join("images").is_dir());
    }
}
