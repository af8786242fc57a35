//! Detection of source files and identifiers already present in a project file.
//!
//! The project file is treated as text. A source file counts as registered
//! when a `path = <name>.<ext>;` assignment names it (quoted or not); the
//! match is purely textual, so a `path` attribute that is not directly
//! followed by `;` is not seen.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{Level, debug, span};

static OBJECT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9A-F]{24}\b").expect("valid regex"));

/// What a project file already contains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingEntries {
    /// Base names of registered source files (e.g. `AppDelegate.swift`)
    pub file_names: HashSet<String>,
    /// Every 24 digit object identifier in the file
    pub ids: HashSet<String>,
}

impl ExistingEntries {
    /// Check whether a source file with this base name is registered
    #[must_use]
    pub fn contains_file(&self, file_name: &str) -> bool {
        self.file_names.contains(file_name)
    }
}

/// Scan project file text for registered source files and object identifiers
///
/// # Errors
///
/// Returns an error if the extension cannot be turned into a pattern.
pub fn extract(contents: &str, extension: &str) -> Result<ExistingEntries> {
    let span = span!(Level::DEBUG, "extract_existing", extension);
    let _guard = span.enter();

    // Quoted values may hold `;` and escaped quotes; bare ones end at the first `;`
    let ext = regex::escape(extension);
    let pattern = format!(r#"path = (?:"((?:[^"\\]|\\.)*\.{ext})"|([^";][^;]*\.{ext}));"#);
    let path_re =
        Regex::new(&pattern).with_context(|| format!("Invalid source extension: {extension}"))?;

    let file_names: HashSet<String> = path_re
        .captures_iter(contents)
        .filter_map(|caps| match (caps.get(1), caps.get(2)) {
            (Some(quoted), _) => Some(unescape(quoted.as_str())),
            (None, Some(bare)) => Some(bare.as_str().to_string()),
            (None, None) => None,
        })
        .map(|path| base_name(&path).to_string())
        .collect();

    let ids: HashSet<String> = OBJECT_ID_RE
        .find_iter(contents)
        .map(|m| m.as_str().to_string())
        .collect();

    debug!(
        files = file_names.len(),
        ids = ids.len(),
        "Existing project entries extracted"
    );

    Ok(ExistingEntries { file_names, ids })
}

/// Undo the `\"` and `\\` escapes of a quoted value
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Last `/`-separated segment of a project file path value
fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
