//! Trial statistics over a response dataset
//! Location: src/dataset/stats.rs

use ndarray::{Array2, Zip};
use serde::Serialize;

use super::validity::TrialValidity;
use super::ResponseDataset;
use crate::error::{DatasetError, DatasetResult};
use crate::sampling::ResponseType;

/// Number of trials per validity class for one channel/EMG pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrialCounts {
    /// Trials flagged 1
    pub valid: usize,
    /// Trials flagged 0
    pub baseline_contaminated: usize,
    /// Trials flagged -1
    pub outlier: usize,
}

impl TrialCounts {
    /// Count the classes in one flag sequence
    pub fn from_flags(flags: &[TrialValidity]) -> Self {
        flags.iter().fold(Self::default(), |mut counts, flag| {
            match flag {
                TrialValidity::Valid => counts.valid += 1,
                TrialValidity::BaselineContaminated => counts.baseline_contaminated += 1,
                TrialValidity::Outlier => counts.outlier += 1,
            }
            counts
        })
    }

    /// All trials regardless of class
    pub fn total(&self) -> usize {
        self.valid + self.baseline_contaminated + self.outlier
    }

    /// Trials a response type accepts, see [`ResponseType::accepts`]
    pub fn eligible(&self, response_type: ResponseType) -> usize {
        [
            (TrialValidity::Valid, self.valid),
            (TrialValidity::BaselineContaminated, self.baseline_contaminated),
            (TrialValidity::Outlier, self.outlier),
        ]
        .into_iter()
        .filter(|(validity, _)| response_type.accepts(*validity))
        .map(|(_, count)| count)
        .sum()
    }

    fn accumulate(&mut self, other: TrialCounts) {
        self.valid += other.valid;
        self.baseline_contaminated += other.baseline_contaminated;
        self.outlier += other.outlier;
    }
}

/// Overview of a dataset, suitable for logging
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    /// Session name
    pub name: String,
    /// Species tag
    pub species: String,
    /// Number of stimulation channels
    pub channel_count: usize,
    /// EMG labels in column order
    pub emg_labels: Vec<String>,
    /// Trial classes summed over every pair
    pub trials: TrialCounts,
    /// Pairs where a valid-only draw fails
    pub pairs_without_valid: usize,
    /// Pairs where a realistic draw fails
    pub pairs_without_realistic: usize,
}

/// Mean of the valid trials of every pair; NaN where a pair has none
pub fn compute_valid_means(
    responses: &Array2<Vec<f64>>,
    validity: &Array2<Vec<TrialValidity>>,
) -> Array2<f64> {
    Zip::from(responses)
        .and(validity)
        .map_collect(|trials, flags| valid_mean_of(trials, flags).unwrap_or(f64::NAN))
}

fn valid_mean_of(trials: &[f64], flags: &[TrialValidity]) -> Option<f64> {
    let (sum, count) = trials
        .iter()
        .zip(flags)
        .filter(|(_, flag)| flag.is_valid())
        .fold((0.0, 0usize), |(sum, count), (response, _)| (sum + response, count + 1));
    (count > 0).then(|| sum / count as f64)
}

impl ResponseDataset {
    /// Trial classes recorded for one EMG on one electrode
    pub fn trial_counts(
        &self,
        emg_id: usize,
        electrode_id: usize,
    ) -> DatasetResult<TrialCounts> {
        let (_, flags) = self.trials(emg_id, electrode_id)?;
        Ok(TrialCounts::from_flags(flags))
    }

    /// Mean of the valid trials recomputed from the raw responses
    ///
    /// Unlike [`ResponseDataset::get_mean_response`] this ignores the stored mean grid.
    pub fn valid_mean(&self, emg_id: usize, electrode_id: usize) -> DatasetResult<f64> {
        let (responses, flags) = self.trials(emg_id, electrode_id)?;
        valid_mean_of(responses, flags).ok_or(DatasetError::EmptySelection {
            response_type: ResponseType::Valid,
            emg: emg_id,
            channel: electrode_id,
        })
    }

    /// Channels on which a query of `response_type` for `emg_id` cannot run out of trials
    ///
    /// Mean queries never draw, so every channel qualifies for them.
    pub fn eligible_channels(
        &self,
        emg_id: usize,
        response_type: ResponseType,
    ) -> DatasetResult<Vec<usize>> {
        let mut channels = Vec::with_capacity(self.channel_count);
        for electrode_id in 0..self.channel_count {
            let counts = self.trial_counts(emg_id, electrode_id)?;
            if response_type == ResponseType::Mean || counts.eligible(response_type) > 0 {
                channels.push(electrode_id);
            }
        }
        Ok(channels)
    }

    /// Totals over the whole grid, plus the pairs a random query cannot draw from
    pub fn summary(&self) -> DatasetSummary {
        let mut trials = TrialCounts::default();
        let mut pairs_without_valid = 0;
        let mut pairs_without_realistic = 0;

        for flags in self.validity.iter() {
            let counts = TrialCounts::from_flags(flags);
            if counts.eligible(ResponseType::Valid) == 0 {
                pairs_without_valid += 1;
            }
            if counts.eligible(ResponseType::Realistic) == 0 {
                pairs_without_realistic += 1;
            }
            trials.accumulate(counts);
        }

        DatasetSummary {
            name: self.name.clone(),
            species: self.species.clone(),
            channel_count: self.channel_count,
            emg_labels: self.emg_labels.clone(),
            trials,
            pairs_without_valid,
            pairs_without_realistic,
        }
    }
}
