use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base ue4util config directory (~/.config/ue4util/, %APPDATA%\ue4util on Windows)
pub fn ue4util() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("ue4util"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("ue4util"))
    }
}

/// Global ue4util.json config file path
pub fn ue4util_json() -> Result<PathBuf> {
    Ok(ue4util()?.join("ue4util.json"))
}
