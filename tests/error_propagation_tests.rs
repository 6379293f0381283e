// tests/error_propagation_tests.rs
//! Error propagation tests
//!
//! Every failure must reach the caller as a typed, matchable error:
//! - malformed inbound records are rejected with the offending location
//! - out-of-range indices report the axis they fell off
//! - empty selections stay distinguishable so a simulator can skip a channel

use emg_dataset::config::{ConfigError, ConfigLoader};
use emg_dataset::synthetic::{generate, SyntheticConfig};
use emg_dataset::{
    DatasetError, DatasetRecord, DatasetResult, GridAxis, ResponseDataset, ResponseSource,
    ResponseType,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn record_json() -> &'static str {
    r#"{
        "emgs": ["pc1", "pc2"],
        "nChan": 2,
        "sorted_resp": [[[0.1, 0.2], [0.3]], [[0.4, 0.5, 0.6], []]],
        "sorted_isvalid": [[[1, 0], [0]], [[-1, 1, 0], []]],
        "sorted_respMean": [[0.1, 0.0], [0.5, 0.0]],
        "ch2xy": [[0, 0], [0, 1]],
        "dataset_name": "json_session",
        "dataset_type": "nhp"
    }"#
}

fn load(json: &str) -> DatasetResult<ResponseDataset> {
    let record: DatasetRecord = serde_json::from_str(json).expect("record json parses");
    ResponseDataset::try_from(record)
}

#[test]
fn test_record_roundtrip_through_json() {
    let dataset = load(record_json()).unwrap();
    assert_eq!(dataset.name(), "json_session");
    assert_eq!(dataset.species(), "nhp");

    let json = serde_json::to_string(&dataset.to_record()).unwrap();
    assert!(json.contains("\"nChan\":2"));
    assert!(json.contains("\"sorted_respMean\""));
    assert_eq!(load(&json).unwrap(), dataset);
}

#[test]
fn test_invalid_flag_reports_location() {
    let json = record_json().replace("[[-1, 1, 0], []]", "[[-1, 3, 0], []]");

    assert_eq!(
        load(&json).unwrap_err(),
        DatasetError::InvalidFlagValue {
            channel: 1,
            emg: 0,
            trial: 1,
            value: 3.0
        }
    );
}

#[test]
fn test_flag_count_mismatch() {
    let json = record_json().replace("[[1, 0], [0]]", "[[1, 0], [0, 1]]");

    let err = load(&json).unwrap_err();
    match &err {
        DatasetError::ShapeMismatch { grid, expected, actual } => {
            assert_eq!(grid, "validity_flags[0][1]");
            assert_eq!(expected, "1 flags");
            assert_eq!(actual, "2 flags");
        }
        other => panic!("Expected ShapeMismatch, got {:?}", other),
    }
    assert!(err.to_string().contains("[SHAPE]"));
}

#[test]
fn test_channel_count_mismatch() {
    let json = record_json().replace("\"nChan\": 2", "\"nChan\": 3");
    assert!(matches!(
        load(&json),
        Err(DatasetError::ShapeMismatch { ref grid, .. }) if grid == "sorted_resp"
    ));
}

#[test]
fn test_index_errors_name_the_axis() {
    let dataset = load(record_json()).unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    assert_eq!(
        dataset.get_realistic_response(0, 2, &mut rng),
        Err(DatasetError::IndexOutOfRange {
            axis: GridAxis::Channel,
            index: 2,
            len: 2
        })
    );
    assert_eq!(
        dataset.get_mean_response(2, 0),
        Err(DatasetError::IndexOutOfRange {
            axis: GridAxis::Emg,
            index: 2,
            len: 2
        })
    );

    let display = dataset.trials(5, 0).unwrap_err().to_string();
    assert!(display.contains("emg index 5"));
}

#[test]
fn test_empty_selection_carries_query() {
    let dataset = load(record_json()).unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    for response_type in [ResponseType::Valid, ResponseType::Realistic] {
        // emg 1 on channel 0 holds a single contaminated trial
        let err = dataset
            .sample_response(response_type, 1, 0, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            DatasetError::EmptySelection {
                response_type,
                emg: 1,
                channel: 0
            }
        );
    }

    // emg 1 on channel 1 has no trials at all
    assert!(dataset
        .get_valid_response(1, 1, &mut rng)
        .unwrap_err()
        .is_empty_selection());
    assert_eq!(dataset.get_mean_response(1, 1).unwrap(), 0.0);
}

#[test]
fn test_simulator_style_fallback() {
    let dataset = load(record_json()).unwrap();
    let mut rng = StdRng::seed_from_u64(9);

    let response = match dataset.get_valid_response(1, 0, &mut rng) {
        Err(e) if e.is_empty_selection() => dataset.get_mean_response(1, 0),
        other => other,
    };
    assert_eq!(response.unwrap(), 0.0);
}

#[test]
fn test_bad_synthetic_config() {
    let config = SyntheticConfig {
        contaminated_fraction: 1.5,
        ..SyntheticConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(0);

    match generate(&config, &mut rng) {
        Err(DatasetError::Configuration { field, .. }) => {
            assert_eq!(field, "contaminated_fraction")
        }
        other => panic!(
            "Expected Configuration error, got {:?}",
            other.map(|d| d.name().to_string())
        ),
    }
}

#[test]
fn test_unknown_response_type_rejected_by_config() {
    let loader = ConfigLoader::with_paths(Vec::new());
    let result = loader.load_with_overrides(vec![(
        "EMG_DATASET__SAMPLING__RESPONSE_TYPE".to_string(),
        "median".to_string(),
    )]);

    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_errors_box_into_std_error() {
    fn query(dataset: &ResponseDataset) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        let mut rng = StdRng::seed_from_u64(0);
        Ok(dataset.get_valid_response(1, 0, &mut rng)?)
    }

    let dataset = load(record_json()).unwrap();
    let err = query(&dataset).unwrap_err();
    assert!(err.to_string().contains("no valid trials"));
}
