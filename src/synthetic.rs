//! Synthetic response datasets for simulations and tests
//!
//! Generates a dataset shaped like a real recording session: uniform responses in
//! `[0, 1)`, channels laid out on a grid `grid_columns` wide, and a configurable share
//! of baseline-contaminated and outlier trials.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::constants::synthetic as defaults;
use crate::dataset::{compute_valid_means, ResponseDataset, TrialValidity};
use crate::error::{DatasetError, DatasetResult};

/// Shape and flag rates of a synthetic session
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// Stimulation channels (c)
    pub channel_count: usize,
    /// One label per EMG (e)
    pub emg_labels: Vec<String>,
    /// Trials recorded for every channel/EMG pair
    pub trials_per_pair: usize,
    /// Channels per row of the electrode layout
    pub grid_columns: usize,
    /// Probability that a trial is flagged baseline-contaminated
    pub contaminated_fraction: f64,
    /// Probability that a trial is flagged outlier
    pub outlier_fraction: f64,
    /// Seed for [`generate_seeded`]; OS entropy when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            channel_count: defaults::CHANNEL_COUNT,
            emg_labels: defaults::EMG_LABELS.iter().map(|s| s.to_string()).collect(),
            trials_per_pair: defaults::TRIALS_PER_PAIR,
            grid_columns: defaults::GRID_COLUMNS,
            contaminated_fraction: 0.0,
            outlier_fraction: 0.0,
            seed: None,
        }
    }
}

impl SyntheticConfig {
    /// Reject empty shapes and flag rates outside `[0, 1]` or summing above 1
    pub fn validate(&self) -> DatasetResult<()> {
        if self.channel_count == 0 {
            return Err(DatasetError::configuration("channel_count", "must be at least 1"));
        }
        if self.emg_labels.is_empty() {
            return Err(DatasetError::configuration("emg_labels", "need at least one EMG"));
        }
        if self.trials_per_pair == 0 {
            return Err(DatasetError::configuration("trials_per_pair", "must be at least 1"));
        }
        if self.grid_columns == 0 {
            return Err(DatasetError::configuration("grid_columns", "must be at least 1"));
        }

        for (field, value) in [
            ("contaminated_fraction", self.contaminated_fraction),
            ("outlier_fraction", self.outlier_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(DatasetError::configuration(
                    field,
                    format!("{} is outside [0, 1]", value),
                ));
            }
        }
        if self.contaminated_fraction + self.outlier_fraction > 1.0 {
            return Err(DatasetError::configuration(
                "outlier_fraction",
                "contaminated and outlier fractions sum above 1",
            ));
        }

        Ok(())
    }

    /// `<x, y>` of channel `i`: `x = i / grid_columns`, `y = i % grid_columns`
    pub fn channel_layout(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.channel_count, 2), |(channel, axis)| match axis {
            0 => (channel / self.grid_columns) as f64,
            _ => (channel % self.grid_columns) as f64,
        })
    }

    fn draw_validity<R: Rng + ?Sized>(&self, rng: &mut R) -> TrialValidity {
        let u: f64 = rng.gen();
        if u < self.contaminated_fraction {
            TrialValidity::BaselineContaminated
        } else if u < self.contaminated_fraction + self.outlier_fraction {
            TrialValidity::Outlier
        } else {
            TrialValidity::Valid
        }
    }
}

/// Generate a dataset from `config`, drawing from `rng`
///
/// Means are computed over valid trials; a pair with no valid trial gets a NaN mean.
pub fn generate<R: Rng + ?Sized>(
    config: &SyntheticConfig,
    rng: &mut R,
) -> DatasetResult<ResponseDataset> {
    config.validate()?;

    let shape = (config.channel_count, config.emg_labels.len());
    let responses = Array2::from_shape_simple_fn(shape, || {
        (0..config.trials_per_pair).map(|_| rng.gen::<f64>()).collect::<Vec<_>>()
    });
    let validity = Array2::from_shape_simple_fn(shape, || {
        (0..config.trials_per_pair)
            .map(|_| config.draw_validity(rng))
            .collect::<Vec<_>>()
    });
    let means = compute_valid_means(&responses, &validity);

    let dataset = ResponseDataset::new(
        config.emg_labels.clone(),
        config.channel_count,
        responses,
        validity,
        config.channel_layout(),
        means,
    )?;

    let summary = dataset.summary();
    info!(
        channels = summary.channel_count,
        emgs = summary.emg_labels.len(),
        valid = summary.trials.valid,
        contaminated = summary.trials.baseline_contaminated,
        outliers = summary.trials.outlier,
        "generated synthetic dataset"
    );
    Ok(dataset)
}

/// Generate with `config.seed`, or OS entropy when unset
pub fn generate_seeded(config: &SyntheticConfig) -> DatasetResult<ResponseDataset> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    generate(config, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::ResponseType;

    fn small_config() -> SyntheticConfig {
        SyntheticConfig {
            channel_count: 6,
            emg_labels: vec!["pc1".to_string(), "pc2".to_string()],
            trials_per_pair: 5,
            seed: Some(11),
            ..SyntheticConfig::default()
        }
    }

    #[test]
    fn test_default_config_matches_demo_session() {
        let config = SyntheticConfig::default();
        assert_eq!(config.channel_count, 128);
        assert_eq!(config.emg_labels, vec!["pc1", "pc2", "pc3"]);
        assert_eq!(config.trials_per_pair, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_channel_layout_two_columns() {
        let layout = SyntheticConfig::default().channel_layout();
        assert_eq!(layout.dim(), (128, 2));
        assert_eq!(layout.row(0).to_vec(), vec![0.0, 0.0]);
        assert_eq!(layout.row(1).to_vec(), vec![0.0, 1.0]);
        assert_eq!(layout.row(2).to_vec(), vec![1.0, 0.0]);
        assert_eq!(layout.row(127).to_vec(), vec![63.0, 1.0]);
    }

    #[test]
    fn test_all_valid_by_default() {
        let dataset = generate_seeded(&small_config()).unwrap();
        let summary = dataset.summary();
        assert_eq!(summary.trials.valid, 6 * 2 * 5);
        assert_eq!(summary.pairs_without_valid, 0);

        for channel in 0..6 {
            for emg in 0..2 {
                let (responses, _) = dataset.trials(emg, channel).unwrap();
                assert!(responses.iter().all(|r| (0.0..1.0).contains(r)));
                let mean = responses.iter().sum::<f64>() / responses.len() as f64;
                assert!((dataset.get_mean_response(emg, channel).unwrap() - mean).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_seed_reproducible() {
        let config = small_config();
        assert_eq!(generate_seeded(&config).unwrap(), generate_seeded(&config).unwrap());
    }

    #[test]
    fn test_flag_fractions() {
        let config = SyntheticConfig {
            contaminated_fraction: 1.0,
            ..small_config()
        };
        let dataset = generate_seeded(&config).unwrap();
        assert_eq!(
            dataset.eligible_channels(0, ResponseType::Realistic).unwrap(),
            Vec::<usize>::new()
        );

        let config = SyntheticConfig {
            outlier_fraction: 1.0,
            ..small_config()
        };
        let dataset = generate_seeded(&config).unwrap();
        let summary = dataset.summary();
        assert_eq!(summary.trials.outlier, 60);
        assert_eq!(summary.pairs_without_realistic, 0);
    }

    #[test]
    fn test_invalid_configs() {
        let cases = [
            SyntheticConfig { channel_count: 0, ..small_config() },
            SyntheticConfig { emg_labels: Vec::new(), ..small_config() },
            SyntheticConfig { trials_per_pair: 0, ..small_config() },
            SyntheticConfig { grid_columns: 0, ..small_config() },
            SyntheticConfig { outlier_fraction: -0.1, ..small_config() },
            SyntheticConfig { contaminated_fraction: 0.6, outlier_fraction: 0.6, ..small_config() },
        ];

        for config in cases {
            assert!(matches!(
                generate_seeded(&config),
                Err(DatasetError::Configuration { .. })
            ));
        }
    }
}
