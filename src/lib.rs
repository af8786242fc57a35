#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # pbxsync - Xcode project file synchronizer
//!
//! pbxsync finds source files on disk that an Xcode project does not
//! reference yet and writes the entries that make them part of the build:
//! a file reference, a build file, membership in the Sources build phase and
//! membership in the group named after the file's top-level directory.
//!
//! The project file is never parsed into a tree. It is read as text,
//! searched with patterns and spliced at well-known section markers, then
//! written back in one piece. Running pbxsync twice in a row adds nothing the
//! second time.
//!
//! ## Architecture
//!
//! - [`project`]: project file text, existing entry extraction, identifiers, patching
//! - [`scanner`]: source directory traversal
//! - [`commands`]: command implementations (sync, config)
//! - [`config`]: `pbxsync.toml` parsing and validation
//! - [`output`]: console output and logging
//! - [`cli`]: argument definitions
//!
//! ## Example Usage
//!
//! ```no_run
//! use pbxsync::{SyncContext, SyncOptions, commands};
//!
//! # fn main() -> anyhow::Result<()> {
//! let root = std::env::current_dir()?;
//! let ctx = SyncContext::new(
//!     root.clone(),
//!     root.join(pbxsync::DEFAULT_CONFIG_FILE),
//!     SyncOptions::default(),
//! )?;
//! let outcome = commands::sync::execute(&ctx)?;
//! std::process::exit(outcome.exit_code());
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Commands module containing all CLI command implementations.
pub mod commands;

/// Configuration parsing and validation.
pub mod config;

/// Output formatting and logging.
pub mod output;

/// Project file access: extraction, identifiers, patching, errors.
pub mod project;

/// Source directory scanning.
pub mod scanner;

use anyhow::Result;
use project::SyncError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Current version of the pbxsync binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extension of the project descriptor directory.
pub const PROJECT_EXTENSION: &str = "xcodeproj";

/// Name of the project file inside the descriptor directory.
pub const MANIFEST_FILE: &str = "project.pbxproj";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "pbxsync.toml";

/// Command line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Project name, with or without the `.xcodeproj` suffix
    pub project: Option<String>,
    /// Directory to scan, relative to the working directory
    pub source_root: Option<PathBuf>,
    /// Patch in memory only; never write the project file
    pub dry_run: bool,
}

/// Everything a sync run needs to know about its surroundings.
///
/// Creating a context performs the precondition check: the project
/// descriptor directory must exist in `root`, otherwise construction fails
/// before any file is read.
///
/// # Examples
///
/// ```no_run
/// use pbxsync::{SyncContext, SyncOptions};
///
/// # fn main() -> anyhow::Result<()> {
/// let options = SyncOptions {
///     project: Some("VoiceControl".to_string()),
///     ..SyncOptions::default()
/// };
/// let ctx = SyncContext::new("/work/app".into(), "/work/app/pbxsync.toml".into(), options)?;
/// assert!(ctx.manifest_path().ends_with("VoiceControl.xcodeproj/project.pbxproj"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SyncContext {
    /// Working directory holding the `.xcodeproj` and the source directory.
    pub root: PathBuf,

    /// Path of the configuration file (it may not exist).
    pub config_path: PathBuf,

    /// Effective configuration, command line overrides applied.
    pub config: config::Config,

    /// Name of the project, without the `.xcodeproj` suffix.
    pub project_name: String,

    /// Whether to skip writing the project file.
    pub dry_run: bool,
}

impl SyncContext {
    /// Load the configuration and locate the project.
    ///
    /// # Errors
    /// Returns an error if the configuration file is invalid, or a
    /// [`SyncError`] if the project cannot be found or is ambiguous.
    pub fn new(root: PathBuf, config_path: PathBuf, options: SyncOptions) -> Result<Self> {
        let config = config::Config::load(&config_path)?;

        // Unknown keys are most likely typos; report them but keep going
        let validator = config::validator::ConfigValidator::new();
        match validator.unknown_fields_in_file(&config_path) {
            Ok(unknown) => {
                for field in unknown {
                    output::warning(&format!("Unknown configuration field: {field}"));
                }
            }
            Err(e) => output::warning(&format!("Configuration validation failed: {e}")),
        }

        Self::with_config(root, config_path, config, options).map_err(Into::into)
    }

    /// Build a context from an already loaded configuration.
    ///
    /// # Errors
    /// Returns [`SyncError::ProjectNotFound`] or [`SyncError::AmbiguousProject`].
    pub fn with_config(
        root: PathBuf,
        config_path: PathBuf,
        mut config: config::Config,
        options: SyncOptions,
    ) -> Result<Self, SyncError> {
        if let Some(name) = options.project {
            config.project.name = Some(name);
        }
        if let Some(source_root) = options.source_root {
            config.project.source_root = Some(source_root);
        }

        let project_name = resolve_project_name(&root, config.project.name.as_deref())?;
        debug!(project = %project_name, root = %root.display(), "Project located");

        Ok(Self {
            root,
            config_path,
            config,
            project_name,
            dry_run: options.dry_run,
        })
    }

    /// The `<Name>.xcodeproj` directory.
    #[must_use]
    pub fn project_dir(&self) -> PathBuf {
        self.root
            .join(format!("{}.{PROJECT_EXTENSION}", self.project_name))
    }

    /// The `project.pbxproj` file inside the project directory.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.project_dir().join(MANIFEST_FILE)
    }

    /// Directory scanned for source files.
    #[must_use]
    pub fn source_dir(&self) -> PathBuf {
        match &self.config.project.source_root {
            Some(dir) => self.root.join(dir),
            None => self.root.join(&self.project_name),
        }
    }

    /// Group for source files that sit directly in the source directory.
    #[must_use]
    pub fn default_group(&self) -> &str {
        self.config
            .project
            .default_group
            .as_deref()
            .unwrap_or(&self.project_name)
    }

    /// Configuration with the detected project and its fallbacks filled in
    #[must_use]
    pub fn effective_config(&self) -> config::Config {
        let mut config = self.config.clone();
        config.project.name = Some(self.project_name.clone());
        config
            .project
            .source_root
            .get_or_insert_with(|| PathBuf::from(&self.project_name));
        config
            .project
            .default_group
            .get_or_insert_with(|| self.project_name.clone());
        config
    }
}

/// Find the project to update in `root`.
///
/// A configured name must exist as `<name>.xcodeproj`; without one, the
/// single `.xcodeproj` directory in `root` is used.
fn resolve_project_name(root: &Path, configured: Option<&str>) -> Result<String, SyncError> {
    if let Some(name) = configured {
        let name = name
            .strip_suffix(&format!(".{PROJECT_EXTENSION}"))
            .unwrap_or(name);
        if root.join(format!("{name}.{PROJECT_EXTENSION}")).is_dir() {
            return Ok(name.to_string());
        }
        return Err(SyncError::ProjectNotFound {
            root: root.to_path_buf(),
            name: Some(name.to_string()),
        });
    }

    let not_found = || SyncError::ProjectNotFound {
        root: root.to_path_buf(),
        name: None,
    };

    let mut candidates: Vec<String> = std::fs::read_dir(root)
        .map_err(|_| not_found())?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_dir() && path.extension().and_then(|e| e.to_str()) == Some(PROJECT_EXTENSION)
        })
        .filter_map(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
        })
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(not_found()),
        1 => Ok(candidates.remove(0)),
        _ => Err(SyncError::AmbiguousProject {
            root: root.to_path_buf(),
            candidates,
        }),
    }
}
