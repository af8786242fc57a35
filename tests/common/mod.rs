#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Project file with no source entries, a `VoiceControl` group and a
/// `Views` group, as Xcode writes them
pub const EMPTY_MANIFEST: &str = "// !$*UTF8*$!
{
\tarchiveVersion = 1;
\tobjectVersion = 56;
\tobjects = {

/* Begin PBXBuildFile section */
/* End PBXBuildFile section */

/* Begin PBXFileReference section */
\t\t0A1B2C3D4E5F60718293A4B5 /* VoiceControl.app */ = {isa = PBXFileReference; explicitFileType = wrapper.application; includeInIndex = 0; path = VoiceControl.app; sourceTree = BUILT_PRODUCTS_DIR; };
/* End PBXFileReference section */

/* Begin PBXGroup section */
\t\t1A1B2C3D4E5F60718293A4B5 /* VoiceControl */ = {
\t\t\tisa = PBXGroup;
\t\t\tchildren = (
\t\t\t\t2A1B2C3D4E5F60718293A4B5 /* Views */,
\t\t\t);
\t\t\tpath = VoiceControl;
\t\t\tsourceTree = \"<group>\";
\t\t};
\t\t2A1B2C3D4E5F60718293A4B5 /* Views */ = {
\t\t\tisa = PBXGroup;
\t\t\tchildren = (
\t\t\t);
\t\t\tpath = Views;
\t\t\tsourceTree = \"<group>\";
\t\t};
/* End PBXGroup section */

/* Begin PBXSourcesBuildPhase section */
\t\t3A1B2C3D4E5F60718293A4B5 /* Sources */ = {
\t\t\tisa = PBXSourcesBuildPhase;
\t\t\tbuildActionMask = 2147483647;
\t\t\tfiles = (
\t\t\t);
\t\t\trunOnlyForDeploymentPostprocessing = 0;
\t\t};
/* End PBXSourcesBuildPhase section */
\t};
\trootObject = 4A1B2C3D4E5F60718293A4B5 /* Project object */;
}
";

/// Working directory holding `VoiceControl.xcodeproj` and its sources
pub struct TestProject {
    pub temp_dir: TempDir,
}

impl TestProject {
    /// Create a project whose manifest is `manifest`
    pub fn new(manifest: &str) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("VoiceControl.xcodeproj");
        fs::create_dir_all(&project_dir)?;
        fs::write(project_dir.join("project.pbxproj"), manifest)?;
        fs::create_dir_all(temp_dir.path().join("VoiceControl"))?;
        Ok(Self { temp_dir })
    }

    /// Working directory path
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path().join("VoiceControl.xcodeproj/project.pbxproj")
    }

    pub fn manifest(&self) -> Result<String> {
        Ok(fs::read_to_string(self.manifest_path())?)
    }

    /// Create a source file at `relative` under the source directory
    pub fn add_source(&self, relative: &str) -> Result<()> {
        let path = self.path().join("VoiceControl").join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, "import Foundation\n")?;
        Ok(())
    }

    /// pbxsync command running in the project directory
    pub fn command(&self) -> Result<Command> {
        let mut cmd = Command::cargo_bin("pbxsync")?;
        cmd.current_dir(self.path())
            .env_remove("PBXSYNC_CONFIG")
            .env_remove("PBXSYNC_LOG")
            .env("NO_COLOR", "1");
        Ok(cmd)
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new(EMPTY_MANIFEST).expect("Failed to create test project")
    }
}
