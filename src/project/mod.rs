//! Xcode project file access.
//!
//! A `project.pbxproj` is handled as plain text: it is read whole, scanned
//! with patterns, spliced in memory and written back in one go. No
//! structural model of the file is ever built.
//!
//! - [`extract`]: what the file already registers
//! - [`ids`]: fresh object identifiers
//! - [`patch`]: insertion of new source files
//! - [`errors`]: failures that abort a run

/// Errors that stop a sync run
pub mod errors;

/// Detection of registered source files and object identifiers
pub mod extract;

/// Object identifier generation
pub mod ids;

/// Textual insertion of new entries
pub mod patch;

pub use errors::SyncError;
pub use extract::ExistingEntries;
pub use ids::{IdGenerator, ObjectId, PendingIds};
pub use patch::{NewEntry, PatchReport, PatchWarning};

use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// The text of a project file, owned for the duration of a run
#[derive(Debug, Clone)]
pub struct ProjectFile {
    path: PathBuf,
    contents: String,
}

impl ProjectFile {
    /// Read the project file at `path`
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ManifestRead`] if the file is missing or unreadable.
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SyncError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), bytes = contents.len(), "Project file loaded");

        Ok(Self {
            path: path.to_path_buf(),
            contents,
        })
    }

    /// Wrap text that did not come from disk; `save` writes it to `path`
    #[must_use]
    pub fn from_contents(path: PathBuf, contents: String) -> Self {
        Self { path, contents }
    }

    /// Location the file was read from and is written back to
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current text, including any insertions made so far
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Find the source files and object identifiers already present
    ///
    /// # Errors
    ///
    /// Returns an error if the extension cannot be turned into a pattern.
    pub fn existing_entries(&self, extension: &str) -> Result<ExistingEntries> {
        extract::extract(&self.contents, extension)
    }

    /// Insert `entries` into the text
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingAnchor`] if a required section marker is
    /// missing; the text is unchanged in that case.
    pub fn patch(&mut self, entries: &[NewEntry], file_type: &str) -> Result<PatchReport, SyncError> {
        patch::apply(&mut self.contents, entries, file_type)
    }

    /// Replace the file on disk with the current text
    ///
    /// The text goes to a temporary file next to the original which is then
    /// renamed over it, so a failed write leaves the old file in place.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ManifestWrite`] if the temporary file cannot be
    /// created, written or renamed.
    pub fn save(&self) -> Result<(), SyncError> {
        let write_error = |source| SyncError::ManifestWrite {
            path: self.path.clone(),
            source,
        };

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
        temp.write_all(self.contents.as_bytes()).map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;

        // The temporary file is created 0600; keep the mode of the file it replaces
        match std::fs::metadata(&self.path) {
            Ok(metadata) => temp
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(write_error)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(write_error(e)),
        }

        temp.persist(&self.path)
            .map_err(|e| write_error(e.error))?;

        debug!(path = %self.path.display(), bytes = self.contents.len(), "Project file written");
        Ok(())
    }
}
