//! Stimulation response dataset
//!
//! A [`ResponseDataset`] holds, for every cortical stimulation channel and every implanted
//! EMG, the collapsed response magnitude of each stimulus trial together with its
//! [`TrialValidity`] flag, plus a precomputed mean per pair. It is built once and never
//! mutated; queries sample it the way a simulator would query a living subject, one trial
//! at a time.
//!
//! # Index order
//!
//! Every query takes `(emg_id, electrode_id)` but the grids are indexed
//! `[electrode_id, emg_id]`: channels are rows, EMGs are columns. Swapping the two
//! arguments is not detected whenever both indices happen to be in range.
//!
//! ```rust
//! use emg_dataset::dataset::{ResponseDataset, TrialValidity};
//! use ndarray::{array, Array2};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let responses = Array2::from_elem((1, 1), vec![1.0, 2.0, 3.0]);
//! let validity = Array2::from_elem(
//!     (1, 1),
//!     vec![TrialValidity::Valid, TrialValidity::BaselineContaminated, TrialValidity::Outlier],
//! );
//! let dataset = ResponseDataset::new(
//!     vec!["biceps".to_string()],
//!     1,
//!     responses,
//!     validity,
//!     array![[0.0, 0.0]],
//!     array![[1.0]],
//! )
//! .unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! assert_eq!(dataset.get_valid_response(0, 0, &mut rng).unwrap(), 1.0);
//! ```

pub mod record;
pub mod stats;
pub(crate) mod validation;
pub mod validity;

pub use record::DatasetRecord;
pub use stats::{compute_valid_means, DatasetSummary, TrialCounts};
pub use validity::TrialValidity;

use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::config::constants::dataset::DEFAULT_DATASET_NAME;
use crate::error::{check_index, DatasetError, DatasetResult, GridAxis};
use crate::sampling::ResponseType;
use validation::GridShape;

/// Channel × EMG grid of per-trial stimulation responses
///
/// `Clone` produces a fully independent deep copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDataset {
    name: String,
    species: String,
    emg_labels: Vec<String>,
    channel_count: usize,
    channel_coordinates: Array2<f64>,
    responses: Array2<Vec<f64>>,
    validity: Array2<Vec<TrialValidity>>,
    mean_responses: Array2<f64>,
}

impl ResponseDataset {
    /// Assemble a dataset from its grids
    ///
    /// `responses`, `validity` and `mean_responses` must be `channel_count × emg_labels.len()`,
    /// `channel_coordinates` must be `channel_count × 2`, and each response sequence must
    /// have exactly one flag per trial. Violations fail with
    /// [`DatasetError::ShapeMismatch`].
    pub fn new(
        emg_labels: Vec<String>,
        channel_count: usize,
        responses: Array2<Vec<f64>>,
        validity: Array2<Vec<TrialValidity>>,
        channel_coordinates: Array2<f64>,
        mean_responses: Array2<f64>,
    ) -> DatasetResult<Self> {
        let shape = GridShape::new(channel_count, emg_labels.len());
        shape.check_grid("responses", &responses)?;
        shape.check_grid("validity_flags", &validity)?;
        shape.check_grid("mean_responses", &mean_responses)?;
        shape.check_coordinates(&channel_coordinates)?;
        shape.check_trial_lengths(&responses, &validity)?;

        debug!(
            channels = channel_count,
            emgs = emg_labels.len(),
            "response dataset assembled"
        );

        Ok(Self {
            name: DEFAULT_DATASET_NAME.to_string(),
            species: String::new(),
            emg_labels,
            channel_count,
            channel_coordinates,
            responses,
            validity,
            mean_responses,
        })
    }

    /// Session name used in logs and summaries
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Species or preparation tag, e.g. "nhp" or "rat". Not interpreted.
    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = species.into();
        self
    }

    /// Session name, `NO_NAME` unless set
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Species tag, empty unless set
    pub fn species(&self) -> &str {
        &self.species
    }

    /// Label of each EMG, indexed by `emg_id`
    pub fn emg_labels(&self) -> &[String] {
        &self.emg_labels
    }

    /// Number of EMGs (e)
    pub fn emg_count(&self) -> usize {
        self.emg_labels.len()
    }

    /// Number of stimulation channels (c)
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// `channel_count × 2` relative `<x, y>` positions, in electrode spacing units
    pub fn channel_coordinates(&self) -> ArrayView2<'_, f64> {
        self.channel_coordinates.view()
    }

    /// `<x, y>` position of one electrode
    pub fn channel_coordinate(
        &self,
        electrode_id: usize,
    ) -> DatasetResult<ArrayView1<'_, f64>> {
        let channel = check_index(GridAxis::Channel, electrode_id, self.channel_count)?;
        Ok(self.channel_coordinates.row(channel))
    }

    /// Stored mean grid, `[channel, emg]`
    pub fn mean_responses(&self) -> ArrayView2<'_, f64> {
        self.mean_responses.view()
    }

    /// Raw responses and flags recorded for one EMG on one electrode
    pub fn trials(
        &self,
        emg_id: usize,
        electrode_id: usize,
    ) -> DatasetResult<(&[f64], &[TrialValidity])> {
        let [channel, emg] = self.grid_index(emg_id, electrode_id)?;
        Ok((
            self.responses[[channel, emg]].as_slice(),
            self.validity[[channel, emg]].as_slice(),
        ))
    }

    /// Draw one valid trial uniformly at random
    ///
    /// Only trials flagged [`TrialValidity::Valid`] are eligible.
    pub fn get_valid_response<R: Rng + ?Sized>(
        &self,
        emg_id: usize,
        electrode_id: usize,
        rng: &mut R,
    ) -> DatasetResult<f64> {
        self.draw(ResponseType::Valid, emg_id, electrode_id, rng)
    }

    /// Draw one trial that an online session could not have rejected
    ///
    /// Valid trials and clean-baseline outliers are eligible; baseline-contaminated trials
    /// are not.
    pub fn get_realistic_response<R: Rng + ?Sized>(
        &self,
        emg_id: usize,
        electrode_id: usize,
        rng: &mut R,
    ) -> DatasetResult<f64> {
        self.draw(ResponseType::Realistic, emg_id, electrode_id, rng)
    }

    /// Stored mean for one EMG on one electrode. Deterministic.
    pub fn get_mean_response(&self, emg_id: usize, electrode_id: usize) -> DatasetResult<f64> {
        let index = self.grid_index(emg_id, electrode_id)?;
        Ok(self.mean_responses[index])
    }

    /// Maps query arguments `(emg_id, electrode_id)` to grid index `[electrode_id, emg_id]`.
    fn grid_index(&self, emg_id: usize, electrode_id: usize) -> DatasetResult<[usize; 2]> {
        let channel = check_index(GridAxis::Channel, electrode_id, self.channel_count)?;
        let emg = check_index(GridAxis::Emg, emg_id, self.emg_count())?;
        Ok([channel, emg])
    }

    fn draw<R: Rng + ?Sized>(
        &self,
        response_type: ResponseType,
        emg_id: usize,
        electrode_id: usize,
        rng: &mut R,
    ) -> DatasetResult<f64> {
        let (responses, flags) = self.trials(emg_id, electrode_id)?;
        let candidates: Vec<f64> = responses
            .iter()
            .zip(flags)
            .filter(|(_, flag)| response_type.accepts(**flag))
            .map(|(response, _)| *response)
            .collect();

        let response = candidates
            .choose(rng)
            .copied()
            .ok_or(DatasetError::EmptySelection {
                response_type,
                emg: emg_id,
                channel: electrode_id,
            })?;

        trace!(
            %response_type,
            emg = emg_id,
            channel = electrode_id,
            eligible = candidates.len(),
            response,
            "drew trial response"
        );
        Ok(response)
    }
}
