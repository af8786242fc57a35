use crate::config::Config;
use crate::output;
use anyhow::Result;

/// Execute config command to show configuration values
///
/// With a key, prints that value alone; otherwise prints the whole
/// configuration as TOML. Callers pass the configuration with project
/// fallbacks already resolved when a project was found.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized
pub fn execute(config: &Config, key: Option<&str>) -> Result<()> {
    let Some(key) = key else {
        print!("{}", config.to_toml()?);
        return Ok(());
    };

    if let Some(val) = config.get(key) {
        println!("{val}");
    } else {
        output::warning(&format!("Configuration key '{key}' is not set"));
    }

    Ok(())
}
