//! Configuration file loading for the CLI
//!
//! This module handles finding and loading the `mlg.conf` TOML file from
//! various locations (explicit path, working directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info, warn};
use thiserror::Error;

use mathlingua::{MathlinguaError, config::AppConfig};
use mathlingua_core::span::Position;
use mathlingua_parser::error::{Diagnostic, ErrorCode, Origin};

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "mlg.conf";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for MathlinguaError {
    fn from(err: ConfigError) -> Self {
        MathlinguaError::Config(err.to_string())
    }
}

/// A configuration together with the problem that replaced it by the
/// default, if any.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub warning: Option<Diagnostic>,
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. `mlg.conf` in the working directory
/// 3. `mlg.conf` in the platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if an explicit path is provided and the file is missing,
/// unreadable or invalid. A discovered file with the same problems only
/// produces a warning and the default configuration.
pub fn load_config(
    explicit_path: Option<impl AsRef<Path>>,
) -> Result<LoadedConfig, MathlinguaError> {
    let system_config = ProjectDirs::from("org", "mathlingua", "mlg")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME));
    if system_config.is_none() {
        debug!("Could not determine platform-specific config directory");
    }

    let local_config = Path::new(CONFIG_FILE_NAME);
    let candidates = [Some(local_config.to_path_buf()), system_config];
    load_config_from(explicit_path, candidates.iter().flatten())
}

/// Load configuration from an explicit path or the first existing
/// candidate.
pub(crate) fn load_config_from<'a>(
    explicit_path: Option<impl AsRef<Path>>,
    candidates: impl IntoIterator<Item = &'a PathBuf>,
) -> Result<LoadedConfig, MathlinguaError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        let config = load_config_file(path)?;
        return Ok(LoadedConfig {
            config,
            warning: None,
        });
    }

    // 2. Try the discovered locations in order
    for path in candidates {
        if !path.exists() {
            debug!(path = path.display().to_string(); "Configuration file not found");
            continue;
        }

        info!(path = path.display().to_string(); "Loading configuration");
        return Ok(match load_config_file(path) {
            Ok(config) => LoadedConfig {
                config,
                warning: None,
            },
            Err(err) => {
                warn!(path = path.display().to_string(), err:%; "Ignoring configuration file");
                LoadedConfig {
                    config: AppConfig::default(),
                    warning: Some(ignored_config(path, &err)),
                }
            }
        });
    }

    // 3. If no config is found, return default config
    debug!("No configuration file found, using default configuration");
    Ok(LoadedConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
fn load_config_file(path: &Path) -> Result<AppConfig, MathlinguaError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

fn ignored_config(path: &Path, err: &MathlinguaError) -> Diagnostic {
    Diagnostic::warning(
        Origin::Config,
        format!("Ignoring configuration file, using defaults: {err}"),
    )
    .with_code(ErrorCode::E600)
    .with_location(path.display().to_string(), Position::default())
}
