//! Application configuration for pressmill.
//!
//! User config lives at `~/.pressmill/pressmill.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PressmillError, Result};
use crate::params::Params;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pressmill.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pressmill";

// ---------------------------------------------------------------------------
// Config structs (matching pressmill.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Default run parameters, overridable per invocation.
    #[serde(default)]
    pub params: Params,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory the final artifact is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Output kinds rendered when none are requested explicitly.
    #[serde(default = "default_outputs")]
    pub outputs: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            outputs: default_outputs(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}
fn default_outputs() -> Vec<String> {
    vec!["tabular".into()]
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pressmill/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PressmillError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pressmill/pressmill.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PressmillError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        PressmillError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    config.params.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PressmillError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PressmillError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PressmillError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("minimal_support"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.outputs, vec!["tabular".to_string()]);
        assert_eq!(parsed.params.minimal_support, 1);
    }

    #[test]
    fn config_with_params_section() {
        let toml_str = r#"
[defaults]
output_dir = "/tmp/corpus"
outputs = ["tabular", "aggregate-stats"]

[params]
filter_keywords = true
minimal_support = 4
minimal_support_journals = 2
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.outputs.len(), 2);
        assert!(config.params.filter_keywords);
        assert_eq!(config.params.journal_support(), 2);
        assert_eq!(config.params.author_support(), 4);
    }

    #[test]
    fn load_rejects_invalid_params() {
        let dir = std::env::temp_dir().join(format!("pressmill-config-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pressmill.toml");
        std::fs::write(&path, "[params]\nminimal_support = 0\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("minimal_support"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
