use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level project configuration loaded from `.oam.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Directory holding one OpenAPI document per service.
    pub input_dir: PathBuf,
    /// Where the unified document is written. `.json` selects JSON output.
    pub output: PathBuf,
    /// Run the validator before writing.
    pub validate: bool,
    pub envelope: Envelope,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("specs"),
            output: PathBuf::from("mock_server_openapi.yml"),
            validate: true,
            envelope: Envelope::default(),
        }
    }
}

/// Fixed values stamped onto every unified document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Envelope {
    pub openapi: String,
    pub title: String,
    pub version: String,
    pub description: String,
    pub server_url: String,
    pub server_description: Option<String>,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            openapi: "3.1.0".to_string(),
            title: "Mock Server API".to_string(),
            version: "1.0.0".to_string(),
            description: "Unified Mock Server API specification".to_string(),
            server_url: "http://localhost:8000".to_string(),
            server_description: None,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oam.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<MergeConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: MergeConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oam configuration
input_dir: specs                     # one OpenAPI document per service (*.yml, *.yaml, *.json)
output: mock_server_openapi.yml      # use a .json extension for JSON output
validate: true                       # refuse to write a document that fails validation

# Fixed values of the unified document.
envelope:
  openapi: 3.1.0
  title: Mock Server API
  version: 1.0.0
  description: Unified Mock Server API specification
  server_url: http://localhost:8000
  # server_description: Local mock server
"#
}
