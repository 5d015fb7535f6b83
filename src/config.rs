use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::jurisdiction::{JurisdictionChecker, JurisdictionIndex, SamplerSettings};
use crate::models::JurisdictionMarker;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub sampler: SamplerSettings,
    #[serde(default)]
    pub markers: Vec<JurisdictionMarker>,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = Self::from_toml(&content)?;
        info!(
            "Loaded {} jurisdiction markers from {}",
            config.markers.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        config
            .sampler
            .validate()
            .context("Invalid sampler settings")?;
        Ok(config)
    }

    pub fn checker(&self) -> Result<JurisdictionChecker> {
        Ok(JurisdictionChecker::new(self.sampler)?)
    }

    pub fn index(&self) -> JurisdictionIndex {
        JurisdictionIndex::build(self.markers.clone())
    }
}
