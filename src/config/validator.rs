use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;

/// Flags configuration keys that pbxsync does not understand
pub struct ConfigValidator {
    /// Set of valid configuration fields that are recognized by pbxsync
    known_fields: HashSet<&'static str>,
}

impl ConfigValidator {
    /// Create a new validator with known configuration fields
    #[must_use]
    pub fn new() -> Self {
        let known_fields = [
            "project.name",
            "project.source_root",
            "project.default_group",
            "sources.extension",
            "sources.file_type",
            "sources.ignore_patterns",
            "sources.follow_symlinks",
        ]
        .into_iter()
        .collect();

        Self { known_fields }
    }

    /// List unknown fields in a config file
    ///
    /// A missing file has no unknown fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn unknown_fields_in_file(&self, config_path: &Path) -> Result<Vec<String>> {
        if !config_path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(config_path)?;
        self.unknown_fields(&content)
    }

    /// List unknown fields in config text, as dotted keys
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML
    pub fn unknown_fields(&self, content: &str) -> Result<Vec<String>> {
        let parsed: toml::Value = toml::from_str(content)?;
        let mut unknown = Vec::new();
        self.check_table(&parsed, "", &mut unknown);
        unknown.sort();
        Ok(unknown)
    }

    /// Recursively checks a TOML table for unknown fields
    fn check_table(&self, table: &toml::Value, prefix: &str, unknown: &mut Vec<String>) {
        if let toml::Value::Table(map) = table {
            for (key, value) in map {
                let full_key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };

                if self.known_fields.contains(full_key.as_str()) {
                    continue;
                }

                if let toml::Value::Table(_) = value {
                    self.check_table(value, &full_key, unknown);
                } else {
                    unknown.push(full_key);
                }
            }
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fields_pass() -> Result<()> {
        let validator = ConfigValidator::new();
        let unknown = validator.unknown_fields(
            "[project]\nname = \"Demo\"\n[sources]\nignore_patterns = [\"Pods\"]\n",
        )?;
        assert!(unknown.is_empty());
        Ok(())
    }

    #[test]
    fn test_unknown_fields_reported() -> Result<()> {
        let validator = ConfigValidator::new();
        let unknown = validator.unknown_fields(
            "verbose = true\n[project]\nnmae = \"Demo\"\n[scan.extra]\ndepth = 2\n",
        )?;
        assert_eq!(
            unknown,
            vec![
                "project.nmae".to_string(),
                "scan.extra.depth".to_string(),
                "verbose".to_string(),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_missing_file_has_no_unknown_fields() -> Result<()> {
        let temp = tempfile::TempDir::new()?;
        let unknown = ConfigValidator::new().unknown_fields_in_file(&temp.path().join("none.toml"))?;
        assert!(unknown.is_empty());
        Ok(())
    }
}
