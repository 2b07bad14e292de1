use crate::policies::PolicyConfig;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct ExperimentConfig {
    pub placement_ids: Vec<String>,
    #[serde(default)]
    pub sparsity: Option<usize>,
    /// Simulated rounds played against the history before recommending.
    #[serde(default)]
    pub rounds: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub history: HistoryConfig,
    pub experiment: ExperimentConfig,
    pub policy: PolicyConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config"))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        builder.try_deserialize()
    }
}
