// src/config/constants.rs
//! Crate-wide configuration constants

/// Dataset identity
pub mod dataset {
    /// Name of a dataset loaded without one
    pub const DEFAULT_DATASET_NAME: &str = "NO_NAME";
    /// Untagged species
    pub const DEFAULT_SPECIES: &str = "";
}

/// Synthetic session shape, matching the reference demo session
pub mod synthetic {
    /// Cortical array channels
    pub const CHANNEL_COUNT: usize = 128;
    /// One label per implanted EMG
    pub const EMG_LABELS: [&str; 3] = ["pc1", "pc2", "pc3"];
    /// Stimulus repetitions per channel/EMG pair
    pub const TRIALS_PER_PAIR: usize = 7;
    /// Channels per row of the electrode layout
    pub const GRID_COLUMNS: usize = 2;
}

/// Simulation run defaults
pub mod sampling {
    /// Seed of run 0
    pub const DEFAULT_SEED: u64 = 0;
    /// Independent simulation runs
    pub const DEFAULT_RUNS: usize = 1;
    /// Queries issued by each run
    pub const DEFAULT_QUERIES_PER_RUN: usize = 15;
    /// Upper bound accepted for `sampling.runs`
    pub const MAX_RUNS: usize = 10_000;
}

/// Configuration file locations and environment overrides
pub mod paths {
    /// Project configuration in the working directory
    pub const DEFAULT_CONFIG_FILE: &str = "emg_dataset.toml";
    /// Untracked local overrides, merged last
    pub const LOCAL_CONFIG_FILE: &str = "emg_dataset.local.toml";
    /// Configuration under `config/`, merged first
    pub const CONFIG_DIR_FILE: &str = "config/emg_dataset.toml";
    /// `EMG_DATASET__SAMPLING__RUNS=4` sets `sampling.runs`
    pub const ENV_PREFIX: &str = "EMG_DATASET__";
    /// Separates section and key in override names
    pub const ENV_SEPARATOR: &str = "__";
}
