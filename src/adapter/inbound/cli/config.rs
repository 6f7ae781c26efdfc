//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};

/// Default config template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../../../fundwatch.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your assets and venues", path.display()));
    output::note(&format!("2. Run: fundwatch check config -c {}", path.display()));
    output::note(&format!("3. Run: fundwatch scan -c {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::Config;
    use tempfile::tempdir;

    #[test]
    fn init_writes_a_loadable_template() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("fundwatch.toml");

        execute_init(&path, false).unwrap();
        let config = Config::load(&path).unwrap();
        assert!(config.instruments.contains_key("BTC"));
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fundwatch.toml");
        fs::write(&path, "# mine").unwrap();

        let err = execute_init(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine");

        execute_init(&path, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG_TEMPLATE);
    }
}
