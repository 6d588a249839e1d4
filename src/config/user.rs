//! User configuration loading for showtype.
//!
//! User config location: $XDG_CONFIG_HOME/showtype/showtype.toml
//! Fallback: the platform config directory (~/.config/showtype/showtype.toml on Linux)

use std::path::PathBuf;

use super::settings::ShowTypeToml;
use crate::error::{ShowTypeError, ShowTypeResult};

/// Returns the path to the user configuration file.
///
/// Returns None if no config directory can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return Some(PathBuf::from(xdg_config).join("showtype").join("showtype.toml"));
    }

    dirs::config_dir().map(|dir| dir.join("showtype").join("showtype.toml"))
}

/// Load the user configuration file if it exists.
///
/// A missing file is `Ok(None)`; an unreadable or malformed one is an error.
pub fn load_user_config() -> ShowTypeResult<Option<ShowTypeToml>> {
    let Some(path) = user_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)?;
    toml::from_str(&contents)
        .map(Some)
        .map_err(|e| ShowTypeError::config(format!("{}: {}", path.display(), e)))
}
