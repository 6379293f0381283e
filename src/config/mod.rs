// src/config/mod.rs
//! Configuration for dataset generation and simulation runs

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};

use serde::{Deserialize, Serialize};

use crate::sampling::ResponseType;
use crate::synthetic::SyntheticConfig;

/// Complete configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct SystemConfig {
    /// Dataset identity
    #[serde(default)]
    pub dataset: DatasetSettings,
    /// Synthetic session parameters
    #[serde(default)]
    pub synthetic: SyntheticConfig,
    /// Simulation run parameters
    #[serde(default)]
    pub sampling: SamplingSettings,
}

/// Identity of the dataset under simulation
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DatasetSettings {
    /// Session name shown in logs
    #[serde(default = "defaults::dataset_name")]
    pub name: String,

    /// Free-form tag such as "nhp" or "rat"
    #[serde(default = "defaults::species")]
    pub species: String,
}

/// How simulated queries are drawn
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SamplingSettings {
    /// Trials each query draws from
    #[serde(default = "defaults::response_type")]
    pub response_type: ResponseType,

    /// Run `i` is seeded with `seed + i`
    #[serde(default = "defaults::seed")]
    pub seed: u64,

    /// Independent runs, each on its own dataset copy
    #[serde(default = "defaults::runs")]
    pub runs: usize,

    /// Random queries per run
    #[serde(default = "defaults::queries_per_run")]
    pub queries_per_run: usize,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::*;
    use crate::sampling::ResponseType;

    pub fn dataset_name() -> String { dataset::DEFAULT_DATASET_NAME.to_string() }
    pub fn species() -> String { dataset::DEFAULT_SPECIES.to_string() }

    pub fn response_type() -> ResponseType { ResponseType::Valid }
    pub fn seed() -> u64 { sampling::DEFAULT_SEED }
    pub fn runs() -> usize { sampling::DEFAULT_RUNS }
    pub fn queries_per_run() -> usize { sampling::DEFAULT_QUERIES_PER_RUN }
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            name: defaults::dataset_name(),
            species: defaults::species(),
        }
    }
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            response_type: defaults::response_type(),
            seed: defaults::seed(),
            runs: defaults::runs(),
            queries_per_run: defaults::queries_per_run(),
        }
    }
}

impl SystemConfig {
    /// Validate configuration consistency
    pub fn validate_consistency(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = self.synthetic.validate() {
            errors.push(e.to_string());
        }

        if self.sampling.runs == 0 || self.sampling.runs > sampling::MAX_RUNS {
            errors.push(format!(
                "sampling.runs must be in [1, {}], got {}",
                sampling::MAX_RUNS,
                self.sampling.runs
            ));
        }

        if self.sampling.queries_per_run == 0 {
            errors.push("sampling.queries_per_run must be at least 1".to_string());
        }

        if self.dataset.name.trim().is_empty() {
            errors.push("dataset.name must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
