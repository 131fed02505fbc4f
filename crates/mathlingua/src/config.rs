//! Configuration types for checking MathLingua workspaces.
//!
//! The configuration is read from an `mlg.conf` TOML file. All types
//! implement [`serde::Deserialize`] and every field has a default, so an
//! empty file is a valid configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`CheckConfig`] - Controls which files `check` collects from directories.
//!
//! # Example
//!
//! ```
//! # use mathlingua::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.check().extensions(), ["math"]);
//! assert!(!config.check().include_hidden());
//! ```

use std::path::Path;

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// The `[check]` section.
    #[serde(default)]
    check: CheckConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given check settings.
    pub fn new(check: CheckConfig) -> Self {
        Self { check }
    }

    /// Returns the check configuration.
    pub fn check(&self) -> &CheckConfig {
        &self.check
    }
}

/// Settings for collecting documents from directories.
///
/// Files named explicitly on the command line are always checked; these
/// settings only apply while walking a directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// File extensions, without the leading dot.
    extensions: Vec<String>,

    /// Whether directories whose name starts with `.` are walked.
    include_hidden: bool,
}

impl CheckConfig {
    /// Creates a new [`CheckConfig`].
    ///
    /// # Arguments
    ///
    /// * `extensions` - File extensions collected from directories.
    /// * `include_hidden` - Whether dot-directories are walked.
    pub fn new(extensions: Vec<String>, include_hidden: bool) -> Self {
        Self {
            extensions,
            include_hidden,
        }
    }

    /// Returns the collected file extensions.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Returns whether dot-directories are walked.
    pub fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    /// Whether `path` has one of the configured extensions.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["math".to_string()],
            include_hidden: false,
        }
    }
}
