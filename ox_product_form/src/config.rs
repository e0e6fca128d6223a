use std::path::Path;

use ox_forms::config::load_config_from_path;
use ox_forms::{ConfigError, FormsConfig};
use serde::{Deserialize, Serialize};

/// Product form settings: the shared form settings plus the pricing floor.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ProductFormConfig {
    #[serde(flatten)]
    pub forms: FormsConfig,
    /// Lowest accepted price. Prices equal to it are accepted.
    #[serde(default)]
    pub min_price: f64,
}

impl ProductFormConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        load_config_from_path(path)
    }

    pub fn with_min_price(mut self, min_price: f64) -> Self {
        self.min_price = min_price;
        self
    }
}
