//! Outer JSON configuration: function name, per-parameter type and domain
//! specs, and the random sample count.
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::parse::{parse_domains, parse_types, ParseError};
use crate::types::DomainNode;

fn default_seed() -> u64 {
    42
}

/// A parsed configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Name of the function under test.
    #[serde(rename = "fname")]
    pub func_name: String,
    /// One type spec per parameter.
    pub types: Vec<String>,
    /// One exhaustive domain spec per parameter.
    #[serde(rename = "exhaustive domain")]
    pub exhaustive_domain: Vec<String>,
    /// One random domain spec per parameter.
    #[serde(rename = "random domain")]
    pub random_domain: Vec<String>,
    /// Number of random test cases to draw.
    #[serde(rename = "num random")]
    pub num_random: u64,
    /// Seed for random sampling.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{types} types, {exhaustive} exhaustive domains and {random} random domains; expected one of each per parameter")]
    LengthMismatch {
        types: usize,
        exhaustive: usize,
        random: usize,
    },

    #[error(transparent)]
    Spec(#[from] ParseError),
}

impl ConfigFile {
    /// Parse and shape-check a JSON config.
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        let config: ConfigFile = serde_json::from_str(json)?;
        let (types, exhaustive, random) = (
            config.types.len(),
            config.exhaustive_domain.len(),
            config.random_domain.len(),
        );
        if types != exhaustive || types != random {
            return Err(ConfigError::LengthMismatch {
                types,
                exhaustive,
                random,
            });
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Build the populated domain tree for every parameter.
    pub fn nodes(&self) -> Result<Vec<DomainNode>, ConfigError> {
        let mut nodes = parse_types(&self.types)?;
        parse_domains(&self.exhaustive_domain, &self.random_domain, &mut nodes)?;
        info!(
            func = %self.func_name,
            params = nodes.len(),
            num_random = self.num_random,
            "parsed config"
        );
        Ok(nodes)
    }
}
