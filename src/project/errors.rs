use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failures that stop a sync run before the project file is modified
#[derive(Debug)]
pub enum SyncError {
    /// The `<Name>.xcodeproj` directory is not in the working directory
    ProjectNotFound {
        /// Directory that was searched
        root: PathBuf,
        /// Expected project name, if one was configured
        name: Option<String>,
    },
    /// More than one `.xcodeproj` directory and no project name to choose between them
    AmbiguousProject {
        /// Directory that was searched
        root: PathBuf,
        /// Names of the candidate projects
        candidates: Vec<String>,
    },
    /// The project file could not be read
    ManifestRead {
        /// Path of the project file
        path: PathBuf,
        /// Underlying IO failure
        source: io::Error,
    },
    /// The project file could not be written back
    ManifestWrite {
        /// Path of the project file
        path: PathBuf,
        /// Underlying IO failure
        source: io::Error,
    },
    /// A section marker required for insertion is missing from the project file
    MissingAnchor(&'static str),
}

impl SyncError {
    /// Get a user-friendly error message with actionable guidance
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ProjectNotFound { root, name } => {
                let what = name.as_ref().map_or_else(
                    || "Xcode project (.xcodeproj directory)".to_string(),
                    |name| format!("{name}.xcodeproj"),
                );
                format!(
                    "{what} not found in {}\n\nSuggestions:\n\
                     - Run pbxsync from the project root directory\n\
                     - Pass the project name with --project",
                    root.display()
                )
            }
            Self::AmbiguousProject { root, candidates } => format!(
                "Found several Xcode projects in {}: {}\n\nSuggestions:\n\
                 - Pick one with --project <NAME>\n\
                 - Set project.name in pbxsync.toml",
                root.display(),
                candidates.join(", ")
            ),
            Self::ManifestRead { path, source } => {
                format!("Failed to read project file {}: {source}", path.display())
            }
            Self::ManifestWrite { path, source } => format!(
                "Failed to write project file {}: {source}\n\nThe project file was left unchanged.",
                path.display()
            ),
            Self::MissingAnchor(marker) => format!(
                "Could not find proper insertion points: '{marker}' is missing\n\n\
                 The project file was left unchanged. Open the project in Xcode and \
                 save it once to restore the standard section layout."
            ),
        }
    }

    /// Get a short description of the error type
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::ProjectNotFound { .. } => "Project Not Found",
            Self::AmbiguousProject { .. } => "Ambiguous Project",
            Self::ManifestRead { .. } => "Read Error",
            Self::ManifestWrite { .. } => "Write Error",
            Self::MissingAnchor(_) => "Missing Section",
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ManifestRead { source, .. } | Self::ManifestWrite { source, .. } => Some(source),
            _ => None,
        }
    }
}
