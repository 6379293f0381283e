// src/bin/emg_dataset_demo.rs
//! Drives independent query runs against a synthetic stimulation session
//!
//! Usage: `emg-dataset-demo [CONFIG.toml]`. Without an argument the default configuration
//! files are searched; a file named on the command line must exist. `RUST_LOG` controls
//! verbosity.

use std::io::IsTerminal;
use std::path::PathBuf;

use emg_dataset::config::{ConfigLoader, SamplingSettings};
use emg_dataset::synthetic::generate_seeded;
use emg_dataset::{independent_runs, DatasetResult, ResponseDataset, ResponseSource};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Outcome of one simulated run
#[derive(Debug)]
struct RunReport {
    run: usize,
    responses: Vec<f64>,
    skipped: usize,
}

impl RunReport {
    fn mean(&self) -> Option<f64> {
        (!self.responses.is_empty())
            .then(|| self.responses.iter().sum::<f64>() / self.responses.len() as f64)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);
    Registry::default().with(filter).with(fmt_layer).init();
}

/// Random (emg, electrode) queries; channels that run out of trials are skipped
fn simulate_run(
    run: usize,
    dataset: &ResponseDataset,
    settings: &SamplingSettings,
    rng: &mut StdRng,
) -> DatasetResult<RunReport> {
    let mut report = RunReport {
        run,
        responses: Vec::with_capacity(settings.queries_per_run),
        skipped: 0,
    };

    for _ in 0..settings.queries_per_run {
        let emg_id = rng.gen_range(0..dataset.emg_count());
        let electrode_id = rng.gen_range(0..dataset.channel_count());

        match dataset.sample_response(settings.response_type, emg_id, electrode_id, rng) {
            Ok(response) => report.responses.push(response),
            Err(e) if e.is_empty_selection() => {
                warn!(run, error = %e, "skipping query");
                report.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let loader = match std::env::args_os().nth(1) {
        Some(path) => ConfigLoader::from_file(PathBuf::from(path))?.with_environment(true),
        None => ConfigLoader::new(),
    };
    let config = loader.load_system_config()?;

    let dataset = generate_seeded(&config.synthetic)?
        .with_name(config.dataset.name.as_str())
        .with_species(config.dataset.species.as_str());
    info!(summary = %serde_json::to_string(&dataset.summary())?, "dataset ready");

    let settings = &config.sampling;
    info!(
        response_type = %settings.response_type,
        runs = settings.runs,
        queries = settings.queries_per_run,
        "starting simulation runs"
    );

    let reports = independent_runs(&dataset, settings.runs, settings.seed, |run, copy, rng| {
        simulate_run(run, &copy, settings, rng)
    });

    for report in reports {
        let report = report?;
        match report.mean() {
            Some(mean) => println!(
                "run {:>3}: {} responses, {} skipped, mean {:.4}",
                report.run,
                report.responses.len(),
                report.skipped,
                mean
            ),
            None => println!("run {:>3}: no responses, {} skipped", report.run, report.skipped),
        }
    }

    Ok(())
}
