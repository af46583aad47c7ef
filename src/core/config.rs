use crate::core::currency::{CurrencyCode, RateTable};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct InsightProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_display_currencies")]
    pub display_currencies: Vec<CurrencyCode>,
    #[serde(default = "default_currency")]
    pub default_currency: CurrencyCode,
    /// Overrides of the built-in rates, as base units per unit of currency.
    #[serde(default)]
    pub rates: HashMap<CurrencyCode, f64>,
    pub data_path: Option<String>,
    pub insight: Option<InsightProviderConfig>,
}

fn default_display_currencies() -> Vec<CurrencyCode> {
    vec![CurrencyCode::Usd, CurrencyCode::Sll]
}

fn default_currency() -> CurrencyCode {
    CurrencyCode::Sll
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            display_currencies: default_display_currencies(),
            default_currency: default_currency(),
            rates: HashMap::new(),
            data_path: None,
            insight: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or the defaults when the
    /// file has not been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "savr", "savr")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("org", "savr", "savr")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .rate_table()
            .with_context(|| format!("Invalid rates in config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// The built-in rate table with this config's overrides applied.
    pub fn rate_table(&self) -> Result<RateTable> {
        RateTable::default().with_overrides(&self.rates)
    }
}
