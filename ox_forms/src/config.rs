use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, error};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::error::ConfigError;
use crate::registry::DefaultFieldConfig;

pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 1_000_000;

fn default_max_image_bytes() -> u64 {
    DEFAULT_MAX_IMAGE_BYTES
}

fn default_temporary() -> bool {
    true
}

/// Settings shared by every form built with this crate.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FormsConfig {
    /// Ceiling for a single dropped image, in bytes.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
    /// Upper bound on entries of a multi image field; unbounded when absent.
    #[serde(default)]
    pub max_images: Option<usize>,
    /// Ask the storage collaborator to keep uploads temporary until the record is saved.
    #[serde(default = "default_temporary")]
    pub temporary_uploads: bool,
    /// Extra data type to component mappings, merged over the standard ones.
    #[serde(default)]
    pub type_mappings: HashMap<String, DefaultFieldConfig>,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_images: None,
            temporary_uploads: true,
            type_mappings: HashMap::new(),
        }
    }
}

impl FormsConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        load_config_from_path(path)
    }
}

/// Reads a YAML or JSON file, picking the parser from the extension.
pub fn load_config_from_path<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    debug!("Loading config from: {:?}", path);

    if !path.exists() {
        error!("Configuration file not found at {:?}", path);
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let contents = fs::read_to_string(path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => {
            debug!("Parsing as YAML");
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
        }
        Some("json") => {
            debug!("Parsing as JSON");
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
        }
        other => {
            error!("Unsupported config file format: {:?}", other);
            Err(ConfigError::UnsupportedFormat(other.unwrap_or_default().to_string()))
        }
    }
}
