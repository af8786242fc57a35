use anyhow::{Context, Result};
use glob::Pattern;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{Level, debug, span};
use walkdir::{DirEntry, WalkDir};

/// A source file on disk that the project file does not know about yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    /// Path relative to the scan root (e.g. `Features/SettingsView.swift`)
    pub relative_path: PathBuf,
    /// Base name of the file
    pub file_name: String,
    /// First directory below the scan root, or the default group
    pub group: String,
}

/// What to look for while scanning
#[derive(Debug, Clone)]
pub struct ScanOptions<'a> {
    /// Source file extension without the dot (e.g. `swift`)
    pub extension: &'a str,
    /// Group for files sitting directly in the scan root
    pub default_group: &'a str,
    /// Glob patterns matched against entry names; matching entries are skipped
    pub ignore_patterns: &'a [String],
    /// Follow symbolic links while walking
    pub follow_symlinks: bool,
}

/// Find source files under `root` whose base name is not in `existing`
///
/// Entries are visited in file name order, so the result is stable across
/// runs. Base names are the only identity: when two files share a name,
/// the first one visited is returned and the other is skipped.
///
/// # Arguments
/// * `root` - Directory to scan
/// * `existing` - Base names already registered in the project file
/// * `options` - Extension, default group and ignore rules
///
/// # Errors
///
/// Returns an error if `root` is not a directory, an ignore pattern is
/// invalid, or directory traversal fails
pub fn find_new_sources<S: ::std::hash::BuildHasher>(
    root: &Path,
    existing: &HashSet<String, S>,
    options: &ScanOptions<'_>,
) -> Result<Vec<PendingFile>> {
    let span = span!(Level::DEBUG, "find_new_sources", root = %root.display());
    let _guard = span.enter();

    if !root.is_dir() {
        anyhow::bail!("Source directory not found: {}", root.display());
    }

    let ignore = compile_patterns(options.ignore_patterns)?;
    let mut queued: HashSet<String> = HashSet::new();
    let mut pending = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(options.follow_symlinks)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(e, &ignore));

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(options.extension) {
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            debug!(path = %path.display(), "Skipping non UTF-8 file name");
            continue;
        };

        if existing.contains(file_name) {
            continue;
        }
        if !queued.insert(file_name.to_string()) {
            debug!(path = %path.display(), "Base name already queued, skipping");
            continue;
        }

        let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        let group = group_for(&relative_path, options.default_group);

        pending.push(PendingFile {
            file_name: file_name.to_string(),
            relative_path,
            group,
        });
    }

    debug!(found = pending.len(), "Source scan complete");
    Ok(pending)
}

/// First path segment for nested files, the default group otherwise
fn group_for(relative_path: &Path, default_group: &str) -> String {
    let mut components = relative_path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(first)), Some(_)) => first.to_string_lossy().into_owned(),
        _ => default_group.to_string(),
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid ignore pattern: {p}")))
        .collect()
}

fn is_ignored(entry: &DirEntry, patterns: &[Pattern]) -> bool {
    let name = entry.file_name().to_string_lossy();
    patterns.iter().any(|p| p.matches(&name))
}
