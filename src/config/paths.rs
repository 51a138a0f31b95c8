//!
//! Platform-native path resolution for toolbridge.
//!
//! - Linux/Unix: XDG Base Directory Specification (~/.config, ~/.local/share)
//! - macOS: Standard Application Support directories (~/Library/...)
//! - Windows: Known Folder system (%APPDATA%, %LOCALAPPDATA%)
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use crate::error::{BridgeError, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/* --- constants ------------------------------------------------------------------------------- */

/// Application name for directory resolution
const APP_NAME: &str = "toolbridge";
/// Organization qualifier for directory resolution
const ORGANIZATION: &str = "com";
/// Organization name for directory resolution
const ORG_NAME: &str = "SkyCorp";
/// Capture subdirectory below the data directory
const CAPTURE_DIR_NAME: &str = "captures";

/* --- public functions ------------------------------------------------------------------------ */

/// Get the user configuration directory for toolbridge
///
/// - Linux: ~/.config/toolbridge/
/// - macOS: ~/Library/Application Support/toolbridge/
/// - Windows: %APPDATA%/toolbridge/
///
/// # Returns
/// * `Ok(PathBuf)` - Path to user configuration directory
/// * `Err(BridgeError)` - Unable to determine config directory
pub fn user_config_dir() -> Result<PathBuf> {
    Ok(get_project_dirs()?.config_dir().to_path_buf())
}

/// Get the user data directory for toolbridge
///
/// - Linux: ~/.local/share/toolbridge/
/// - macOS: ~/Library/Application Support/toolbridge/
/// - Windows: %APPDATA%/toolbridge/
///
/// # Returns
/// * `Ok(PathBuf)` - Path to user data directory
/// * `Err(BridgeError)` - Unable to determine data directory
pub fn user_data_dir() -> Result<PathBuf> {
    Ok(get_project_dirs()?.data_dir().to_path_buf())
}

/// Get the system configuration directory for toolbridge
///
/// - Linux: /etc/toolbridge/
/// - macOS: /Library/Preferences/toolbridge/
/// - Windows: %PROGRAMDATA%/toolbridge/
///
/// # Returns
/// * `Ok(PathBuf)` - Path to system configuration directory
/// * `Err(BridgeError)` - Unable to determine system config directory
pub fn system_config_dir() -> Result<PathBuf> {
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Ok(PathBuf::from("/etc").join(APP_NAME))
    }

    #[cfg(target_os = "macos")]
    {
        Ok(PathBuf::from("/Library/Preferences").join(APP_NAME))
    }

    #[cfg(windows)]
    {
        std::env::var("PROGRAMDATA").map(|path| PathBuf::from(path).join(APP_NAME)).map_err(|_| {
            BridgeError::Config("PROGRAMDATA environment variable not found".to_string())
        })
    }
}

/// Path of the user configuration file (`<user config dir>/config.toml`)
pub fn user_config_file() -> Result<PathBuf> {
    Ok(user_config_dir()?.join("config.toml"))
}

/// Path of the system configuration file (`<system config dir>/config.toml`)
pub fn system_config_file() -> Result<PathBuf> {
    Ok(system_config_dir()?.join("config.toml"))
}

/// Default capture directory (`<user data dir>/captures`); not created here
pub fn default_capture_dir() -> Result<PathBuf> {
    Ok(user_data_dir()?.join(CAPTURE_DIR_NAME))
}

/// Expand tilde (~) and environment variables in file paths
///
/// # Arguments
/// * `path` - Path string that may contain ~ or environment variables
///
/// # Returns
/// * `Ok(PathBuf)` - Expanded path
/// * `Err(BridgeError)` - Path expansion failed
///
/// # Examples
/// ```rust
/// use toolbridge::config::paths::expand_path;
///
/// let expanded = expand_path("~/captures").unwrap();
/// assert!(!expanded.to_string_lossy().starts_with('~'));
/// ```
pub fn expand_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path_str = path.as_ref().to_string_lossy();

    if let Some(rest) = path_str.strip_prefix("~/") {
        return directories::UserDirs::new().map(|dirs| dirs.home_dir().join(rest)).ok_or_else(
            || {
                BridgeError::Config(
                    "Unable to determine user home directory for tilde expansion".to_string(),
                )
            },
        );
    }

    if path_str.contains('$') {
        let expanded = shellexpand::full(&path_str).map_err(|e| {
            BridgeError::Config(format!(
                "Failed to expand environment variables in path '{}': {}",
                path_str, e
            ))
        })?;
        return Ok(PathBuf::from(expanded.as_ref()));
    }

    Ok(path.as_ref().to_path_buf())
}

/// Check if a configuration file exists and is readable
///
/// # Arguments
/// * `path` - Path to configuration file to check
///
/// # Returns
/// * `Ok(())` - File exists and is readable
/// * `Err(BridgeError)` - File doesn't exist, isn't readable, or is not a file
pub fn validate_config_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BridgeError::Config(format!(
            "Configuration file '{}' does not exist",
            path.display()
        )));
    }

    if !path.is_file() {
        return Err(BridgeError::Config(format!(
            "Configuration path '{}' exists but is not a regular file",
            path.display()
        )));
    }

    std::fs::File::open(path).map_err(|e| {
        BridgeError::Config(format!(
            "Configuration file '{}' exists but cannot be read: {}\n\
             You can fix this with: chmod 644 '{}'",
            path.display(),
            e,
            path.display()
        ))
    })?;

    Ok(())
}

/// Configuration file paths in precedence order (highest first)
pub fn config_file_paths() -> Vec<PathBuf> {
    [user_config_file(), system_config_file()].into_iter().filter_map(|path| path.ok()).collect()
}

/* --- private functions ----------------------------------------------------------------------- */

/// Get ProjectDirs instance for toolbridge
fn get_project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(ORGANIZATION, ORG_NAME, APP_NAME).ok_or_else(|| {
        BridgeError::Config(
            "Unable to determine user directories. Please ensure your user account has a valid \
             home directory."
                .to_string(),
        )
    })
}

/* --- tests ----------------------------------------------------------------------------------- */
