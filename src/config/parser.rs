use super::Config;
use anyhow::{Context, Result};
use std::path::Path;

/// Read and validate a config file
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config_str(&content)
}

/// Parse and validate config text
///
/// # Errors
///
/// Returns an error if the text is not valid TOML or fails validation
pub fn parse_config_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse TOML config")?;

    // Validate and return validation errors directly without wrapping
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &Config) -> Result<()> {
    let extension = &config.sources.extension;
    if extension.is_empty() {
        anyhow::bail!("sources.extension cannot be empty");
    }
    if extension.starts_with('.') {
        anyhow::bail!("sources.extension must not start with a dot (use \"swift\", not \".swift\")");
    }

    if config.sources.file_type.trim().is_empty() {
        anyhow::bail!("sources.file_type cannot be empty");
    }

    if let Some(name) = &config.project.name
        && (name.is_empty() || name.contains('/'))
    {
        anyhow::bail!("project.name must be a plain directory name, got '{name}'");
    }

    Ok(())
}
