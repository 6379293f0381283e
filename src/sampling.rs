//! Response sampling seam used by optimization simulators
//!
//! A simulator chooses which EMG and electrode to query and which [`ResponseType`] to
//! draw, and supplies its own random generator. Nothing here holds random state, so
//! repeated runs are reproducible as long as the caller seeds its generator.

use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{ResponseDataset, TrialValidity};
use crate::error::{DatasetError, DatasetResult};

/// Which trials a query draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Uniform draw among valid trials
    Valid,
    /// Uniform draw among valid and outlier trials
    Realistic,
    /// Stored mean, no draw
    Mean,
}

impl ResponseType {
    /// Every response type, in configuration order
    pub const ALL: [ResponseType; 3] = [
        ResponseType::Valid,
        ResponseType::Realistic,
        ResponseType::Mean,
    ];

    /// Whether a trial with this flag can be returned by the query
    ///
    /// For [`ResponseType::Mean`] these are the trials the stored mean averages.
    pub fn accepts(self, validity: TrialValidity) -> bool {
        match self {
            ResponseType::Valid | ResponseType::Mean => validity.is_valid(),
            ResponseType::Realistic => validity.is_realistic(),
        }
    }

    /// Lowercase name used in configuration files
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseType::Valid => "valid",
            ResponseType::Realistic => "realistic",
            ResponseType::Mean => "mean",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResponseType::ALL
            .into_iter()
            .find(|response_type| response_type.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                DatasetError::configuration(
                    "response_type",
                    format!("'{}' is not one of valid, realistic, mean", s),
                )
            })
    }
}

/// What a simulator needs from a dataset to set up its search space and query it
pub trait ResponseSource {
    /// Label of each EMG, indexed by `emg_id`
    fn emg_labels(&self) -> &[String];

    /// Number of electrodes a simulator can stimulate
    fn channel_count(&self) -> usize;

    /// `channel_count × 2` electrode positions
    fn channel_coordinates(&self) -> ArrayView2<'_, f64>;

    /// One response for `emg_id` stimulated through `electrode_id`
    fn sample_response(
        &self,
        response_type: ResponseType,
        emg_id: usize,
        electrode_id: usize,
        rng: &mut dyn RngCore,
    ) -> DatasetResult<f64>;
}

impl ResponseSource for ResponseDataset {
    fn emg_labels(&self) -> &[String] {
        ResponseDataset::emg_labels(self)
    }

    fn channel_count(&self) -> usize {
        ResponseDataset::channel_count(self)
    }

    fn channel_coordinates(&self) -> ArrayView2<'_, f64> {
        ResponseDataset::channel_coordinates(self)
    }

    fn sample_response(
        &self,
        response_type: ResponseType,
        emg_id: usize,
        electrode_id: usize,
        rng: &mut dyn RngCore,
    ) -> DatasetResult<f64> {
        match response_type {
            ResponseType::Valid => self.get_valid_response(emg_id, electrode_id, rng),
            ResponseType::Realistic => self.get_realistic_response(emg_id, electrode_id, rng),
            ResponseType::Mean => self.get_mean_response(emg_id, electrode_id),
        }
    }
}

/// Run `runs` independent simulations against copies of one baseline dataset
///
/// Run `i` gets its own deep copy of `dataset` and a `StdRng` seeded with
/// `base_seed + i`, so results do not depend on scheduling. Runs execute on the rayon
/// pool; results come back in run order.
pub fn independent_runs<T, F>(
    dataset: &ResponseDataset,
    runs: usize,
    base_seed: u64,
    run: F,
) -> Vec<T>
where
    T: Send,
    F: Fn(usize, ResponseDataset, &mut StdRng) -> T + Sync,
{
    debug!(runs, base_seed, dataset = dataset.name(), "starting independent runs");

    (0..runs)
        .into_par_iter()
        .map(|index| {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(index as u64));
            run(index, dataset.clone(), &mut rng)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn dataset() -> ResponseDataset {
        ResponseDataset::new(
            vec!["emg0".to_string()],
            1,
            Array2::from_elem((1, 1), vec![1.0, 2.0, 3.0]),
            Array2::from_elem(
                (1, 1),
                vec![
                    TrialValidity::Valid,
                    TrialValidity::BaselineContaminated,
                    TrialValidity::Outlier,
                ],
            ),
            array![[0.0, 0.0]],
            array![[1.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_response_type_parsing() {
        assert_eq!("valid".parse::<ResponseType>().unwrap(), ResponseType::Valid);
        assert_eq!(" Realistic ".parse::<ResponseType>().unwrap(), ResponseType::Realistic);
        assert_eq!("MEAN".parse::<ResponseType>().unwrap(), ResponseType::Mean);
        assert!("median".parse::<ResponseType>().is_err());

        for response_type in ResponseType::ALL {
            assert_eq!(response_type.to_string().parse::<ResponseType>().unwrap(), response_type);
        }
    }

    #[test]
    fn test_response_type_serde() {
        let json = serde_json::to_string(&ResponseType::Realistic).unwrap();
        assert_eq!(json, "\"realistic\"");
    }

    #[test]
    fn test_sample_response_dispatch() {
        let dataset = dataset();
        let source: &dyn ResponseSource = &dataset;
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(source.channel_count(), 1);
        assert_eq!(source.emg_labels(), &["emg0".to_string()]);
        assert_eq!(source.sample_response(ResponseType::Valid, 0, 0, &mut rng).unwrap(), 1.0);
        assert_eq!(source.sample_response(ResponseType::Mean, 0, 0, &mut rng).unwrap(), 1.0);
        let realistic = source
            .sample_response(ResponseType::Realistic, 0, 0, &mut rng)
            .unwrap();
        assert!(realistic == 1.0 || realistic == 3.0);
    }

    #[test]
    fn test_independent_runs_reproducible() {
        let dataset = dataset();
        let draw = |_: usize, copy: ResponseDataset, rng: &mut StdRng| -> Vec<f64> {
            (0..20)
                .map(|_| copy.get_realistic_response(0, 0, rng).unwrap())
                .collect()
        };

        let first = independent_runs(&dataset, 4, 99, draw);
        let second = independent_runs(&dataset, 4, 99, draw);
        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
    }
}
