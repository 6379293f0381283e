//! Raw inbound form of a dataset
//! Location: src/dataset/record.rs
//!
//! A [`DatasetRecord`] is what a format-specific loader hands over: nested sequences and raw
//! integer flags, keyed the way experimental records name them (`emgs`, `nChan`,
//! `sorted_resp`, `sorted_isvalid`, `sorted_respMean`, `ch2xy`). Converting it into a
//! [`ResponseDataset`] checks every shape and flag.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::validity::TrialValidity;
use super::ResponseDataset;
use crate::config::constants::dataset::DEFAULT_DATASET_NAME;
use crate::error::{DatasetError, DatasetResult};

/// Nested-sequence dataset as stored by acquisition tooling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    /// Muscle name for each implanted EMG (e entries)
    pub emgs: Vec<String>,
    /// Number of cortical array channels (c)
    #[serde(rename = "nChan")]
    pub n_chan: usize,
    /// c × e × j response magnitudes
    pub sorted_resp: Vec<Vec<Vec<f64>>>,
    /// c × e × j flags in {1, 0, -1}; numeric exports store them as floats
    pub sorted_isvalid: Vec<Vec<Vec<f64>>>,
    /// c × e means over valid trials
    #[serde(rename = "sorted_respMean")]
    pub sorted_resp_mean: Vec<Vec<f64>>,
    /// c × 2 electrode positions
    pub ch2xy: Vec<[f64; 2]>,
    /// Session name; `NO_NAME` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,
    /// Species tag such as "nhp" or "rat"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_type: Option<String>,
}

impl DatasetRecord {
    fn rows<'a, T>(&self, grid: &str, rows: &'a [Vec<T>]) -> DatasetResult<&'a [Vec<T>]> {
        if rows.len() != self.n_chan {
            return Err(DatasetError::shape(
                grid,
                format!("{} channel rows", self.n_chan),
                format!("{} channel rows", rows.len()),
            ));
        }
        for (channel, row) in rows.iter().enumerate() {
            if row.len() != self.emgs.len() {
                return Err(DatasetError::shape(
                    format!("{}[{}]", grid, channel),
                    format!("{} emg columns", self.emgs.len()),
                    format!("{} emg columns", row.len()),
                ));
            }
        }
        Ok(rows)
    }

    fn grid<T: Clone>(&self, grid: &str, rows: &[Vec<T>]) -> DatasetResult<Array2<T>> {
        let cells: Vec<T> = self.rows(grid, rows)?.iter().flatten().cloned().collect();
        Array2::from_shape_vec((self.n_chan, self.emgs.len()), cells)
            .map_err(|e| DatasetError::shape(grid, "row-major channel x emg grid", e))
    }

    fn validity_grid(&self) -> DatasetResult<Array2<Vec<TrialValidity>>> {
        let rows = self.rows("sorted_isvalid", &self.sorted_isvalid)?;
        let mut cells = Vec::with_capacity(self.n_chan * self.emgs.len());
        for (channel, row) in rows.iter().enumerate() {
            for (emg, flags) in row.iter().enumerate() {
                let parsed = flags
                    .iter()
                    .enumerate()
                    .map(|(trial, &value)| {
                        TrialValidity::from_raw(value).ok_or(DatasetError::InvalidFlagValue {
                            channel,
                            emg,
                            trial,
                            value,
                        })
                    })
                    .collect::<DatasetResult<Vec<_>>>()?;
                cells.push(parsed);
            }
        }
        Array2::from_shape_vec((self.n_chan, self.emgs.len()), cells)
            .map_err(|e| DatasetError::shape("sorted_isvalid", "row-major channel x emg grid", e))
    }

    fn coordinates(&self) -> DatasetResult<Array2<f64>> {
        if self.ch2xy.len() != self.n_chan {
            return Err(DatasetError::shape(
                "ch2xy",
                format!("{} x 2", self.n_chan),
                format!("{} x 2", self.ch2xy.len()),
            ));
        }
        let flat: Vec<f64> = self.ch2xy.iter().flat_map(|xy| xy.iter().copied()).collect();
        Array2::from_shape_vec((self.n_chan, 2), flat)
            .map_err(|e| DatasetError::shape("ch2xy", "row-major channel x 2 grid", e))
    }
}

impl TryFrom<DatasetRecord> for ResponseDataset {
    type Error = DatasetError;

    fn try_from(record: DatasetRecord) -> DatasetResult<Self> {
        let responses = record.grid("sorted_resp", &record.sorted_resp)?;
        let validity = record.validity_grid()?;
        let means = record.grid("sorted_respMean", &record.sorted_resp_mean)?;
        let coordinates = record.coordinates()?;

        let DatasetRecord {
            emgs,
            n_chan,
            dataset_name,
            dataset_type,
            ..
        } = record;

        let dataset = ResponseDataset::new(emgs, n_chan, responses, validity, coordinates, means)?
            .with_name(dataset_name.unwrap_or_else(|| DEFAULT_DATASET_NAME.to_string()));
        Ok(match dataset_type {
            Some(species) => dataset.with_species(species),
            None => dataset,
        })
    }
}

impl ResponseDataset {
    /// Nested-sequence form of the dataset, e.g. for JSON export
    pub fn to_record(&self) -> DatasetRecord {
        let rows_of = |grid: &Array2<f64>| -> Vec<Vec<f64>> {
            grid.outer_iter().map(|row| row.to_vec()).collect()
        };

        DatasetRecord {
            emgs: self.emg_labels.clone(),
            n_chan: self.channel_count,
            sorted_resp: self
                .responses
                .outer_iter()
                .map(|row| row.iter().cloned().collect())
                .collect(),
            sorted_isvalid: self
                .validity
                .outer_iter()
                .map(|row| {
                    row.iter()
                        .map(|flags| flags.iter().map(|f| f64::from(f.as_flag())).collect())
                        .collect()
                })
                .collect(),
            sorted_resp_mean: rows_of(&self.mean_responses),
            ch2xy: self
                .channel_coordinates
                .outer_iter()
                .map(|xy| [xy[0], xy[1]])
                .collect(),
            dataset_name: Some(self.name.clone()),
            dataset_type: (!self.species.is_empty()).then(|| self.species.clone()),
        }
    }
}
