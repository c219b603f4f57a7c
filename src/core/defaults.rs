use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::core::paths;

/// Root configuration structure for ue4util.json
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Ue4UtilConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via ue4util.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Defaults {
    #[serde(default = "default_process")]
    pub process: ProcessDefaults,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            process: default_process(),
        }
    }
}

/// Defaults applied to `run` and `capture` when the command line is silent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessDefaults {
    /// Strict mode unless `--strict`/`--lenient` says otherwise.
    #[serde(default)]
    pub raise_on_error: bool,

    /// Where `capture` echoes live output.
    #[serde(default = "default_capture_echo")]
    pub capture_echo: EchoTarget,

    /// Environment variables added to every child; `--env` flags win.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EchoTarget {
    Stdout,
    Stderr,
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_process() -> ProcessDefaults {
    ProcessDefaults {
        raise_on_error: false,
        capture_echo: default_capture_echo(),
        env: BTreeMap::new(),
    }
}

// `capture` prints a JSON envelope on stdout, so live output goes to stderr.
fn default_capture_echo() -> EchoTarget {
    EchoTarget::Stderr
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
/// If ue4util.json is missing or invalid, silently returns built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full ue4util.json config, falling back to defaults on any error.
pub fn load_config() -> Ue4UtilConfig {
    paths::ue4util_json()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_default()
}

/// Attempt to load config from a specific file.
pub fn load_config_from(path: &Path) -> crate::Result<Ue4UtilConfig> {
    if !path.exists() {
        return Err(crate::Error::other(format!("{} not found", path.display())));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    let config: Ue4UtilConfig = serde_json::from_str(&content).map_err(|e| {
        crate::Error::validation_invalid_json(e, Some("parse ue4util.json".to_string()))
    })?;

    Ok(config)
}

/// Save config to ue4util.json file (creates if missing).
pub fn save_config(config: &Ue4UtilConfig) -> crate::Result<()> {
    save_config_to(&paths::ue4util_json()?, config)
}

/// Save config to a specific file, creating parent directories.
pub fn save_config_to(path: &Path, config: &Ue4UtilConfig) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("create {}", parent.display())))
        })?;
    }

    let content = serde_json::to_string_pretty(config).map_err(|e| {
        crate::Error::internal_json(e.to_string(), Some("serialize ue4util.json".to_string()))
    })?;

    crate::io::write_file_atomic(path, &content, &format!("write {}", path.display()))
}

/// Check if ue4util.json file exists
pub fn config_exists() -> bool {
    paths::ue4util_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

/// Delete ue4util.json file (reset to defaults)
pub fn reset_config() -> crate::Result<bool> {
    let path = paths::ue4util_json()?;
    if path.exists() {
        fs::remove_file(&path).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("delete {}", path.display())))
        })?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Get the path to ue4util.json (for display purposes)
pub fn config_path() -> crate::Result<String> {
    Ok(paths::ue4util_json()?.display().to_string())
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}
