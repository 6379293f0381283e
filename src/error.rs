// src/error.rs
//! Unified error handling for the response dataset
//!
//! Every fallible operation in the crate returns [`DatasetResult`]. Errors surface
//! synchronously from the call that caused them; there is no retry or fallback inside
//! the dataset. Choosing to skip a channel, fall back to the mean response or abort a
//! simulation is left to the caller.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sampling::ResponseType;

/// Axis of the channel × EMG grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridAxis {
    /// Row axis: cortical stimulation channel (electrode)
    Channel,
    /// Column axis: EMG sensor
    Emg,
}

impl fmt::Display for GridAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridAxis::Channel => write!(f, "channel"),
            GridAxis::Emg => write!(f, "emg"),
        }
    }
}

/// Error type for dataset construction and queries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    /// A grid or sequence disagrees with the declared channel/EMG counts
    #[error("[SHAPE] {grid}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Grid or sequence path, e.g. `sorted_resp[3]`
        grid: String,
        /// Shape implied by the declared counts
        expected: String,
        /// Shape found
        actual: String,
    },

    /// A raw validity flag outside {1, 0, -1}, including non-integral values
    #[error(
        "[FLAG] invalid validity flag {value} at channel {channel}, emg {emg}, trial {trial}"
    )]
    InvalidFlagValue {
        /// Channel row of the offending flag
        channel: usize,
        /// EMG column of the offending flag
        emg: usize,
        /// Position in the trial sequence
        trial: usize,
        /// Raw value as read
        value: f64,
    },

    /// A random query had no eligible trial to choose from
    #[error("[QUERY] no {response_type} trials for emg {emg} on channel {channel}")]
    EmptySelection {
        /// Query that found nothing
        response_type: ResponseType,
        /// Queried EMG
        emg: usize,
        /// Queried electrode
        channel: usize,
    },

    /// An emg or electrode index beyond the grid
    #[error("[INDEX] {axis} index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Axis the index was checked against
        axis: GridAxis,
        /// Index as passed
        index: usize,
        /// Length of that axis
        len: usize,
    },

    /// Invalid generation or sampling parameters
    #[error("[CONFIG] invalid {field}: {reason}")]
    Configuration {
        /// Offending parameter
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

impl DatasetError {
    /// Shape mismatch for a named grid
    pub fn shape(
        grid: impl Into<String>,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        DatasetError::ShapeMismatch {
            grid: grid.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Configuration error for a named field
    pub fn configuration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DatasetError::Configuration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True when a different channel or response type could still succeed
    pub fn is_empty_selection(&self) -> bool {
        matches!(self, DatasetError::EmptySelection { .. })
    }
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Bounds check used for both grid axes
pub(crate) fn check_index(axis: GridAxis, index: usize, len: usize) -> DatasetResult<usize> {
    if index < len {
        Ok(index)
    } else {
        Err(DatasetError::IndexOutOfRange { axis, index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DatasetError::EmptySelection {
            response_type: ResponseType::Valid,
            emg: 2,
            channel: 17,
        };

        let display = format!("{}", err);
        assert!(display.contains("valid"));
        assert!(display.contains("emg 2"));
        assert!(display.contains("channel 17"));
    }

    #[test]
    fn test_shape_helper() {
        let err = DatasetError::shape("mean_responses", "4 x 3", "4 x 2");
        match err {
            DatasetError::ShapeMismatch { grid, expected, actual } => {
                assert_eq!(grid, "mean_responses");
                assert_eq!(expected, "4 x 3");
                assert_eq!(actual, "4 x 2");
            }
            _ => panic!("Expected shape mismatch"),
        }
    }

    #[test]
    fn test_check_index() {
        assert_eq!(check_index(GridAxis::Emg, 2, 3), Ok(2));
        assert_eq!(
            check_index(GridAxis::Channel, 3, 3),
            Err(DatasetError::IndexOutOfRange {
                axis: GridAxis::Channel,
                index: 3,
                len: 3
            })
        );
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DatasetError>();
    }

    #[test]
    fn test_is_empty_selection() {
        let err = DatasetError::configuration("trials_per_pair", "must be positive");
        assert!(!err.is_empty_selection());
    }
}
