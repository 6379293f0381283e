//! Shape checks applied when a dataset is assembled
//! Location: src/dataset/validation.rs

use ndarray::Array2;

use super::validity::TrialValidity;
use crate::error::{DatasetError, DatasetResult};

/// Expected c × e layout every grid must agree with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GridShape {
    pub channels: usize,
    pub emgs: usize,
}

impl GridShape {
    pub fn new(channels: usize, emgs: usize) -> Self {
        Self { channels, emgs }
    }

    fn describe(dim: (usize, usize)) -> String {
        format!("{} x {}", dim.0, dim.1)
    }

    /// Check a grid has exactly `channels` rows and `emgs` columns
    pub fn check_grid<T>(&self, grid_name: &str, grid: &Array2<T>) -> DatasetResult<()> {
        let expected = (self.channels, self.emgs);
        if grid.dim() != expected {
            return Err(DatasetError::shape(
                grid_name,
                Self::describe(expected),
                Self::describe(grid.dim()),
            ));
        }
        Ok(())
    }

    /// Channel coordinates are one `<x, y>` row per channel
    pub fn check_coordinates(&self, coordinates: &Array2<f64>) -> DatasetResult<()> {
        let expected = (self.channels, 2);
        if coordinates.dim() != expected {
            return Err(DatasetError::shape(
                "channel_coordinates",
                Self::describe(expected),
                Self::describe(coordinates.dim()),
            ));
        }
        Ok(())
    }

    /// Every pair needs one flag per response
    pub fn check_trial_lengths(
        &self,
        responses: &Array2<Vec<f64>>,
        validity: &Array2<Vec<TrialValidity>>,
    ) -> DatasetResult<()> {
        for ((channel, emg), trials) in responses.indexed_iter() {
            let flags = &validity[[channel, emg]];
            if trials.len() != flags.len() {
                return Err(DatasetError::shape(
                    format!("validity_flags[{}][{}]", channel, emg),
                    format!("{} flags", trials.len()),
                    format!("{} flags", flags.len()),
                ));
            }
        }
        Ok(())
    }
}
