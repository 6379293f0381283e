//! EMG-Dataset: stimulation-evoked EMG responses for closed-loop optimization simulations
//!
//! This library wraps a recorded (or synthetic) cortical stimulation session so that a
//! Bayesian-optimization simulator can query it as if it were a living subject. It
//! provides:
//!
//! - A channel × EMG response grid with per-trial validity flags
//! - Valid-only, realistic (valid + outlier) and mean response queries
//! - Explicit, caller-supplied randomness for reproducible simulations
//! - Synthetic session generation and layered TOML configuration
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use emg_dataset::synthetic::{generate_seeded, SyntheticConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SyntheticConfig { seed: Some(1), ..SyntheticConfig::default() };
//!     let dataset = generate_seeded(&config)?;
//!
//!     // Arguments are (emg_id, electrode_id)
//!     let mut rng = StdRng::seed_from_u64(7);
//!     let response = dataset.get_valid_response(0, 12, &mut rng)?;
//!     println!("Response: {:.3}", response);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod sampling;
pub mod synthetic;

// Re-export commonly used types for convenience
pub use dataset::{DatasetRecord, DatasetSummary, ResponseDataset, TrialCounts, TrialValidity};
pub use error::{DatasetError, DatasetResult, GridAxis};
pub use sampling::{independent_runs, ResponseSource, ResponseType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
