//! Per-trial validity flags
//! Location: src/dataset/validity.rs

use serde::{Deserialize, Serialize};

/// Classification of a single stimulus trial
///
/// Stored records encode these as 1, 0 and -1. Baseline contamination can be detected
/// during an online session and rejected; an outlier with a clean baseline cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum TrialValidity {
    /// No reason to exclude the response (1)
    Valid,
    /// Pre-stimulus baseline activity above accepted levels (0)
    BaselineContaminated,
    /// Outlier response with baseline activity within range (-1)
    Outlier,
}

impl TrialValidity {
    /// Raw flag as found in experimental records
    pub const fn as_flag(self) -> i8 {
        match self {
            TrialValidity::Valid => 1,
            TrialValidity::BaselineContaminated => 0,
            TrialValidity::Outlier => -1,
        }
    }

    /// Parse a raw flag, `None` outside {1, 0, -1}
    pub const fn from_flag(flag: i64) -> Option<Self> {
        match flag {
            1 => Some(TrialValidity::Valid),
            0 => Some(TrialValidity::BaselineContaminated),
            -1 => Some(TrialValidity::Outlier),
            _ => None,
        }
    }

    /// Parse a flag stored as a float, as numeric array exports write them
    ///
    /// Only the integral values 1.0, 0.0 and -1.0 map to a class.
    pub fn from_raw(flag: f64) -> Option<Self> {
        if flag.fract() != 0.0 {
            return None;
        }
        Self::from_flag(flag as i64)
    }

    /// Trials usable as a clean response (1)
    pub fn is_valid(self) -> bool {
        self == TrialValidity::Valid
    }

    /// Trials that cannot be rejected online: valid ones and clean-baseline outliers
    pub fn is_realistic(self) -> bool {
        self != TrialValidity::BaselineContaminated
    }
}

impl TryFrom<i8> for TrialValidity {
    type Error = String;

    fn try_from(flag: i8) -> Result<Self, Self::Error> {
        TrialValidity::from_flag(flag as i64)
            .ok_or_else(|| format!("validity flag {} not in {{1, 0, -1}}", flag))
    }
}

impl From<TrialValidity> for i8 {
    fn from(validity: TrialValidity) -> Self {
        validity.as_flag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_mapping() {
        for flag in [1i8, 0, -1] {
            let validity = TrialValidity::try_from(flag).unwrap();
            assert_eq!(validity.as_flag(), flag);
        }
        assert!(TrialValidity::try_from(2i8).is_err());
        assert_eq!(TrialValidity::from_flag(-2), None);
    }

    #[test]
    fn test_float_flags() {
        assert_eq!(TrialValidity::from_raw(1.0), Some(TrialValidity::Valid));
        assert_eq!(TrialValidity::from_raw(-0.0), Some(TrialValidity::BaselineContaminated));
        assert_eq!(TrialValidity::from_raw(-1.0), Some(TrialValidity::Outlier));
        assert_eq!(TrialValidity::from_raw(0.5), None);
        assert_eq!(TrialValidity::from_raw(2.0), None);
        assert_eq!(TrialValidity::from_raw(f64::NAN), None);
        assert_eq!(TrialValidity::from_raw(f64::INFINITY), None);
    }

    #[test]
    fn test_realistic_excludes_contamination_only() {
        assert!(TrialValidity::Valid.is_realistic());
        assert!(TrialValidity::Outlier.is_realistic());
        assert!(!TrialValidity::BaselineContaminated.is_realistic());
        assert!(!TrialValidity::Outlier.is_valid());
    }

    #[test]
    fn test_serde_uses_raw_flags() {
        let json = serde_json::to_string(&vec![
            TrialValidity::Valid,
            TrialValidity::BaselineContaminated,
            TrialValidity::Outlier,
        ])
        .unwrap();
        assert_eq!(json, "[1,0,-1]");

        let parsed: Result<Vec<TrialValidity>, _> = serde_json::from_str("[1,5]");
        assert!(parsed.is_err());
    }
}
