//! Textual insertion of new source files into a project file.
//!
//! Four splices, in order:
//!
//! 1. build file objects, before the end of the `PBXBuildFile` section
//! 2. file reference objects, before the end of the `PBXFileReference` section
//! 3. build file ids, into the `files` list of the first Sources build phase
//! 4. file reference ids, into the `children` list of each file's group
//!
//! Steps 1 and 2 are required: both section markers are checked before the
//! text is touched, and a missing marker aborts the patch. Steps 3 and 4 are
//! best effort and report what they had to skip.

use super::errors::SyncError;
use super::ids::PendingIds;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;
use tracing::{Level, debug, span};

/// Marker closing the build file section
pub const BUILD_FILE_SECTION_END: &str = "/* End PBXBuildFile section */";

/// Marker closing the file reference section
pub const FILE_REFERENCE_SECTION_END: &str = "/* End PBXFileReference section */";

static SOURCES_PHASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/\* Sources \*/ = \{[^}]+files = \([^)]+").expect("valid regex")
});

/// A source file ready to be written into the project file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    /// Base name of the file (e.g. `SettingsView.swift`)
    pub file_name: String,
    /// Name of the group the file belongs to
    pub group: String,
    /// Identifiers assigned to the file
    pub ids: PendingIds,
}

/// An insertion that was skipped because its anchor is missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchWarning {
    /// No Sources build phase with a `files` list was found
    MissingSourcesPhase,
    /// No group with this path and a `children` list was found
    MissingGroup(String),
}

impl fmt::Display for PatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSourcesPhase => write!(
                f,
                "Sources build phase not found: new files were not added to any target"
            ),
            Self::MissingGroup(group) => write!(
                f,
                "Group '{group}' not found: its files will not show up in the project navigator"
            ),
        }
    }
}

/// Counts of the lines inserted by each step, plus skipped steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Build file objects inserted
    pub build_files: usize,
    /// File reference objects inserted
    pub file_references: usize,
    /// Lines added to the Sources build phase
    pub phase_members: usize,
    /// Lines added to group children lists
    pub group_members: usize,
    /// Insertions that could not be made
    pub warnings: Vec<PatchWarning>,
}

impl PatchReport {
    /// True when every insertion was made
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Insert `entries` into the project file text
///
/// `file_type` is written as `lastKnownFileType` of each file reference.
///
/// # Errors
///
/// Returns [`SyncError::MissingAnchor`] if either section end marker is
/// absent. In that case `text` is left untouched.
pub fn apply(
    text: &mut String,
    entries: &[NewEntry],
    file_type: &str,
) -> Result<PatchReport, SyncError> {
    let span = span!(Level::DEBUG, "patch_project", entries = entries.len());
    let _guard = span.enter();

    let mut report = PatchReport::default();
    if entries.is_empty() {
        return Ok(report);
    }

    for marker in [BUILD_FILE_SECTION_END, FILE_REFERENCE_SECTION_END] {
        if !text.contains(marker) {
            return Err(SyncError::MissingAnchor(marker));
        }
    }

    let build_lines: Vec<String> = entries.iter().map(build_file_line).collect();
    report.build_files = insert_before(text, BUILD_FILE_SECTION_END, &build_lines)?;

    // The build file lines moved the marker; it is searched again.
    let reference_lines: Vec<String> = entries
        .iter()
        .map(|entry| file_reference_line(entry, file_type))
        .collect();
    report.file_references = insert_before(text, FILE_REFERENCE_SECTION_END, &reference_lines)?;

    match insert_phase_members(text, entries) {
        Some(count) => report.phase_members = count,
        None => {
            debug!("No Sources build phase found");
            report.warnings.push(PatchWarning::MissingSourcesPhase);
        }
    }

    for group in distinct_groups(entries) {
        let members: Vec<&NewEntry> = entries.iter().filter(|e| e.group == group).collect();
        match insert_group_members(text, group, &members) {
            Some(count) => report.group_members += count,
            None => {
                debug!(group, "No group found for new files");
                report
                    .warnings
                    .push(PatchWarning::MissingGroup(group.to_string()));
            }
        }
    }

    debug!(
        build_files = report.build_files,
        file_references = report.file_references,
        phase_members = report.phase_members,
        group_members = report.group_members,
        "Project text patched"
    );

    Ok(report)
}

fn build_file_line(entry: &NewEntry) -> String {
    format!(
        "\t\t{build} /* {name} in Sources */ = {{isa = PBXBuildFile; fileRef = {file} /* {name} */; }};",
        build = entry.ids.build_ref,
        file = entry.ids.file_ref,
        name = entry.file_name,
    )
}

fn file_reference_line(entry: &NewEntry, file_type: &str) -> String {
    format!(
        "\t\t{file} /* {name} */ = {{isa = PBXFileReference; lastKnownFileType = {file_type}; path = {path}; sourceTree = \"<group>\"; }};",
        file = entry.ids.file_ref,
        name = entry.file_name,
        path = quote_if_needed(&entry.file_name),
    )
}

/// Insert whole lines right before the first occurrence of `marker`
fn insert_before(
    text: &mut String,
    marker: &'static str,
    lines: &[String],
) -> Result<usize, SyncError> {
    let pos = text.find(marker).ok_or(SyncError::MissingAnchor(marker))?;
    let mut block = lines.join("\n");
    block.push('\n');
    text.insert_str(pos, &block);
    Ok(lines.len())
}

fn insert_phase_members(text: &mut String, entries: &[NewEntry]) -> Option<usize> {
    let end = SOURCES_PHASE_RE.find(text)?.end();
    let lines: Vec<String> = entries
        .iter()
        .map(|e| format!("\t\t\t\t{} /* {} in Sources */,", e.ids.build_ref, e.file_name))
        .collect();
    splice_into_list(text, end, &lines);
    Some(lines.len())
}

fn insert_group_members(text: &mut String, group: &str, members: &[&NewEntry]) -> Option<usize> {
    let end = find_group_list_end(text, group)?;
    let lines: Vec<String> = members
        .iter()
        .map(|e| format!("\t\t\t\t{} /* {} */,", e.ids.file_ref, e.file_name))
        .collect();
    splice_into_list(text, end, &lines);
    Some(lines.len())
}

/// Locate the end of the `children` list of the group whose path is `group`
///
/// Accepts `path` before `children` as well as the order Xcode writes
/// (`children` first, `path` after it, within the same object).
fn find_group_list_end(text: &str, group: &str) -> Option<usize> {
    let escaped = regex::escape(group);
    let name = format!(r#"(?:{escaped}|"{escaped}")"#);

    let path_first = Regex::new(&format!(r"path = {name};[^}}]+children = \([^)]+")).ok()?;
    if let Some(m) = path_first.find(text) {
        return Some(m.end());
    }

    let children_first =
        Regex::new(&format!(r"children = \(([^)]*)\);[^{{}}]*path = {name};")).ok()?;
    children_first
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.end())
}

/// Insert list item lines at `end`, the position right before a list's `)`
///
/// When the closing paren sits on its own indented line, the new lines go
/// above it; otherwise they are appended after `end`.
fn splice_into_list(text: &mut String, end: usize, lines: &[String]) {
    let head = &text[..end];
    let line_start = head.trim_end_matches([' ', '\t']).len();

    if head[..line_start].ends_with('\n') {
        let block: String = lines.iter().map(|line| format!("{line}\n")).collect();
        text.insert_str(line_start, &block);
    } else {
        let block: String = lines.iter().map(|line| format!("\n{line}")).collect();
        text.insert_str(end, &block);
    }
}

/// Groups in order of first appearance
fn distinct_groups(entries: &[NewEntry]) -> Vec<&str> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|e| e.group.as_str())
        .filter(|group| seen.insert(*group))
        .collect()
}

/// Quote a path value the way project files do when it has special characters
fn quote_if_needed(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_$+/:.-".contains(c));
    if plain {
        value.to_string()
    } else {
        format!(
            "\"{}\"",
            value.replace('\\', "\\\\").replace('"', "\\\"")
        )
    }
}
