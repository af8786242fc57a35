use crate::SyncContext;
use crate::output;
use crate::project::{IdGenerator, NewEntry, PatchReport, ProjectFile};
use crate::scanner::{self, PendingFile, ScanOptions};
use anyhow::Result;
use tracing::{Level, debug, span};

/// Exit code for a run that wrote the project but skipped some insertions
pub const EXIT_PARTIAL: i32 = 2;

/// What a sync run did
#[derive(Debug)]
pub enum SyncOutcome {
    /// Every source file is already referenced; nothing was written
    UpToDate,
    /// New files were patched in
    Updated {
        /// Files that were added, in scan order
        files: Vec<PendingFile>,
        /// What the patch inserted and skipped
        report: PatchReport,
        /// False for a dry run
        written: bool,
    },
}

impl SyncOutcome {
    /// Process exit code for this outcome
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Updated { report, .. } if !report.is_complete() => EXIT_PARTIAL,
            _ => 0,
        }
    }
}

/// Add source files missing from the project
///
/// Reads the project file, collects the file names and identifiers it
/// already holds, scans the source directory for the rest, patches them in
/// and writes the result back. Nothing is written when no new files turn up,
/// on a dry run, or when the project file lacks a section marker.
///
/// # Errors
///
/// Returns an error if:
/// - The project file cannot be read or written
/// - The source directory does not exist or an ignore pattern is invalid
/// - The build file or file reference section marker is missing
pub fn execute(ctx: &SyncContext) -> Result<SyncOutcome> {
    let span = span!(Level::DEBUG, "sync", project = %ctx.project_name);
    let _enter = span.enter();

    let sources = &ctx.config.sources;

    output::info("Reading project file...");
    let mut project = ProjectFile::load(&ctx.manifest_path())?;
    output::verbose(&format!("Project file: {}", project.path().display()));

    output::info("Extracting existing files...");
    let existing = project.existing_entries(&sources.extension)?;
    output::verbose(&format!(
        "{} files and {} identifiers already in the project",
        existing.file_names.len(),
        existing.ids.len()
    ));

    output::info("Finding new source files...");
    let options = ScanOptions {
        extension: &sources.extension,
        default_group: ctx.default_group(),
        ignore_patterns: &sources.ignore_patterns,
        follow_symlinks: sources.follow_symlinks,
    };
    let files = scanner::find_new_sources(&ctx.source_dir(), &existing.file_names, &options)?;

    if files.is_empty() {
        output::plain("\nNo new files found to add.");
        return Ok(SyncOutcome::UpToDate);
    }

    output::plain(&format!("\nFound {} new files to add:", files.len()));
    for file in &files {
        output::action("new file:", &file.relative_path.display().to_string());
    }

    output::info("\nUpdating project file...");
    let mut ids = IdGenerator::new(&existing.ids);
    let entries: Vec<NewEntry> = files
        .iter()
        .map(|file| NewEntry {
            file_name: file.file_name.clone(),
            group: file.group.clone(),
            ids: ids.pair(),
        })
        .collect();
    debug!(issued = entries.len() * 2, "Identifiers drawn");

    let report = project.patch(&entries, &sources.file_type)?;
    for warning in &report.warnings {
        output::warning(&warning.to_string());
    }

    if ctx.dry_run {
        output::info("\nDry run: project file left unchanged");
        return Ok(SyncOutcome::Updated {
            files,
            report,
            written: false,
        });
    }

    output::info("Writing updated project file...");
    project.save()?;

    print_summary(&report);

    Ok(SyncOutcome::Updated {
        files,
        report,
        written: true,
    })
}

fn print_summary(report: &PatchReport) {
    if report.is_complete() {
        output::success("\nProject updated successfully!");
    } else {
        output::warning("Project updated, but some entries could not be placed (see above)");
    }

    output::plain("\nNext steps:");
    output::plain("1. Open Xcode and verify the files appear correctly");
    output::plain("2. Build the project to ensure everything compiles");
    output::plain("3. If needed, manually adjust file locations in Xcode");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::PatchWarning;
    use crate::{SyncOptions, config::Config};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const MANIFEST: &str = "// !$*UTF8*$!
{
\tobjects = {

/* Begin PBXBuildFile section */
\t\tAAAAAAAAAAAAAAAAAAAAAAA1 /* Old.swift in Sources */ = {isa = PBXBuildFile; fileRef = BBBBBBBBBBBBBBBBBBBBBBB1 /* Old.swift */; };
/* End PBXBuildFile section */

/* Begin PBXFileReference section */
\t\tBBBBBBBBBBBBBBBBBBBBBBB1 /* Old.swift */ = {isa = PBXFileReference; lastKnownFileType = sourcecode.swift; path = Old.swift; sourceTree = \"<group>\"; };
/* End PBXFileReference section */

/* Begin PBXGroup section */
\t\tCCCCCCCCCCCCCCCCCCCCCCC1 /* App */ = {
\t\t\tisa = PBXGroup;
\t\t\tchildren = (
\t\t\t\tBBBBBBBBBBBBBBBBBBBBBBB1 /* Old.swift */,
\t\t\t);
\t\t\tpath = App;
\t\t\tsourceTree = \"<group>\";
\t\t};
/* End PBXGroup section */

/* Begin PBXSourcesBuildPhase section */
\t\tDDDDDDDDDDDDDDDDDDDDDDD1 /* Sources */ = {
\t\t\tisa = PBXSourcesBuildPhase;
\t\t\tbuildActionMask = 2147483647;
\t\t\tfiles = (
\t\t\t\tAAAAAAAAAAAAAAAAAAAAAAA1 /* Old.swift in Sources */,
\t\t\t);
\t\t\trunOnlyForDeploymentPostprocessing = 0;
\t\t};
/* End PBXSourcesBuildPhase section */
\t};
}
";

    fn setup(manifest: &str, sources: &[&str]) -> (TempDir, SyncContext) {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("App.xcodeproj")).unwrap();
        fs::write(root.join("App.xcodeproj/project.pbxproj"), manifest).unwrap();
        for source in sources {
            let path = root.join("App").join(source);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "import Foundation\n").unwrap();
        }

        let ctx = SyncContext::with_config(
            root.to_path_buf(),
            root.join("pbxsync.toml"),
            Config::default(),
            SyncOptions::default(),
        )
        .unwrap();
        (temp, ctx)
    }

    fn manifest(root: &Path) -> String {
        fs::read_to_string(root.join("App.xcodeproj/project.pbxproj")).unwrap()
    }

    #[test]
    fn test_nothing_new_leaves_file_alone() {
        let (temp, ctx) = setup(MANIFEST, &["Old.swift"]);

        let outcome = execute(&ctx).unwrap();

        assert!(matches!(outcome, SyncOutcome::UpToDate));
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(manifest(temp.path()), MANIFEST);
    }

    #[test]
    fn test_adds_new_files_once() {
        let (temp, ctx) = setup(MANIFEST, &["Old.swift", "New.swift", "App/Extra.swift"]);

        let outcome = execute(&ctx).unwrap();
        let SyncOutcome::Updated {
            files,
            report,
            written,
        } = outcome
        else {
            panic!("expected an update");
        };
        assert!(written);
        assert_eq!(files.len(), 2);
        assert_eq!(report.build_files, 2);
        assert!(report.is_complete());

        let text = manifest(temp.path());
        assert!(text.contains("/* New.swift in Sources */ = {isa = PBXBuildFile;"));
        assert!(text.contains("path = Extra.swift;"));

        // Second run finds nothing
        assert!(matches!(execute(&ctx).unwrap(), SyncOutcome::UpToDate));
        assert_eq!(manifest(temp.path()), text);
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let (temp, mut ctx) = setup(MANIFEST, &["New.swift"]);
        ctx.dry_run = true;

        let outcome = execute(&ctx).unwrap();

        assert!(matches!(outcome, SyncOutcome::Updated { written: false, .. }));
        assert_eq!(manifest(temp.path()), MANIFEST);
    }

    #[test]
    fn test_missing_group_is_partial() {
        let (temp, ctx) = setup(MANIFEST, &["Other/Thing.swift"]);

        let outcome = execute(&ctx).unwrap();

        assert_eq!(outcome.exit_code(), EXIT_PARTIAL);
        match outcome {
            SyncOutcome::Updated { report, .. } => {
                assert_eq!(
                    report.warnings,
                    vec![PatchWarning::MissingGroup("Other".to_string())]
                );
            }
            SyncOutcome::UpToDate => panic!("expected an update"),
        }
        assert!(manifest(temp.path()).contains("path = Thing.swift;"));
    }

    #[test]
    fn test_missing_marker_is_an_error() {
        let broken = MANIFEST.replace("/* End PBXFileReference section */", "");
        let (temp, ctx) = setup(&broken, &["New.swift"]);

        let err = execute(&ctx).unwrap_err();

        assert!(err.to_string().contains("Could not find proper insertion points"));
        assert_eq!(manifest(temp.path()), broken);
    }

    #[test]
    fn test_missing_source_directory_is_an_error() {
        let (temp, ctx) = setup(MANIFEST, &[]);

        let err = execute(&ctx).unwrap_err();

        assert!(err.to_string().contains("Source directory not found"));
        assert_eq!(manifest(temp.path()), MANIFEST);
    }
}
