//! `pbxsync.toml` settings.
//!
//! Every field is optional; a missing file or table falls back to the
//! defaults below. Command line flags are applied on top in
//! [`crate::SyncContext`].

/// TOML parsing and value validation
pub mod parser;
/// Detection of unknown configuration keys
pub mod validator;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings read from `pbxsync.toml`; every field has a default
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// `[project]` table
    #[serde(default)]
    pub project: ProjectConfig,

    /// `[sources]` table
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Which project to update and where its sources live
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    /// Project name, i.e. `<name>.xcodeproj`; detected when unset
    pub name: Option<String>,
    /// Directory scanned for sources, relative to the working directory
    /// (defaults to the project name)
    pub source_root: Option<PathBuf>,
    /// Group for files directly under the source root (defaults to the project name)
    pub default_group: Option<String>,
}

/// Which files count as sources and how they are registered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// File extension without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Written as `lastKnownFileType` of new file references
    #[serde(default = "default_file_type")]
    pub file_type: String,
    /// Glob patterns for directory and file names to skip
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
    /// Follow symbolic links while scanning
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            file_type: default_file_type(),
            ignore_patterns: default_ignore_patterns(),
            follow_symlinks: false,
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// A missing file yields the defaults; nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML
    /// - A value fails validation
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        parser::parse_config_file(path)
    }

    /// Render the configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if TOML serialization fails
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get a configuration value by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.len() != 2 {
            return None;
        }

        match (parts[0], parts[1]) {
            ("project", "name") => self.project.name.clone(),
            ("project", "source_root") => self
                .project
                .source_root
                .as_ref()
                .map(|p| p.display().to_string()),
            ("project", "default_group") => self.project.default_group.clone(),
            ("sources", "extension") => Some(self.sources.extension.clone()),
            ("sources", "file_type") => Some(self.sources.file_type.clone()),
            ("sources", "ignore_patterns") => Some(self.sources.ignore_patterns.join(", ")),
            ("sources", "follow_symlinks") => Some(self.sources.follow_symlinks.to_string()),
            _ => None,
        }
    }
}

// Default functions for serde
fn default_extension() -> String {
    "swift".to_string()
}

fn default_file_type() -> String {
    "sourcecode.swift".to_string()
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        ".build".to_string(),
        "build".to_string(),
        "DerivedData".to_string(),
        "Pods".to_string(),
        "*.xcodeproj".to_string(),
        "*.xcassets".to_string(),
    ]
}
