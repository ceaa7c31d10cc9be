//! EEE fast simulator.
//!
//! Shoots cosmic-ray muons through a telescope station and writes the
//! triggered events to a CSV file, with a JSON run summary next to it.
//!
//! ```text
//! e3sim -s BOLO-01 -n 200000 -o bolo.csv
//! RUST_LOG=debug e3sim -s base -p 2.2 --seed 7 -i
//! ```

use std::path::Path;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, log, Level};
use muon_simulator::hardware::StationRegistry;
use muon_simulator::io::{summary_path_for, write_summary_json, CsvEventWriter};
use muon_simulator::monitor::{MonitoredSink, RunMonitor};
use muon_simulator::shared_args::SimulationArgs;
use muon_simulator::sims::SimulationEngine;
use muon_simulator::SimError;

/// Progress bar redraws are throttled to this many iterations.
const PROGRESS_STRIDE: u64 = 1_000;

fn list_stations(registry: &StationRegistry) -> Result<(), Box<dyn std::error::Error>> {
    println!("{:<10} {:>10} {:>10} {:>10}", "Station", "Width", "Height", "Sep");
    for name in registry.names() {
        let geometry = registry.get(name)?;
        println!(
            "{:<10} {:>10.1} {:>10.1} {:>10.1}",
            name,
            geometry.active_area().width(),
            geometry.active_area().height(),
            geometry.plane_separation()
        );
    }
    Ok(())
}

/// Log level and message for a failed run.
fn failure_message(error: &SimError, output_path: &Path) -> (Level, String) {
    match error {
        SimError::NoEventsTriggered { .. } => (
            Level::Warn,
            format!(
                "No summary written for {}: the run produced no usable events",
                output_path.display()
            ),
        ),
        other => (Level::Error, format!("Simulation failed: {other}")),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging from environment variables
    env_logger::init();

    let args = SimulationArgs::parse();

    let registry = match &args.stations_file {
        Some(path) => {
            info!("Loading station geometries from {}", path.display());
            StationRegistry::with_json_file(path)?
        }
        None => StationRegistry::builtin(),
    };

    if args.list_stations {
        return list_stations(&registry);
    }

    let config = args.to_config()?;
    let mut engine = SimulationEngine::new(&config, &registry)?;
    info!("Using random seed: {}", engine.seed());

    let output_path = args.output_path(engine.telescope());
    info!("Writing events to {}", output_path.display());
    let writer = CsvEventWriter::create(&output_path)?;

    let monitor = RunMonitor::new(engine.telescope(), engine.flux())?;
    let mut sink = MonitoredSink::new(writer, monitor);

    let pb = ProgressBar::new(engine.num_events());
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("█▉▊▋▌▍▎▏ "),
    );
    pb.set_message(engine.telescope().to_string());

    let num_events = engine.num_events();
    let result = engine.run_with_progress(&mut sink, |done| {
        if done % PROGRESS_STRIDE == 0 || done == num_events {
            pb.set_position(done);
        }
    });
    pb.finish_and_clear();

    let (writer, monitor) = sink.into_parts();
    writer.into_inner()?;

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            let (level, message) = failure_message(&e, &output_path);
            log!(level, "{message}");
            return Err(e.into());
        }
    };

    let summary_path = summary_path_for(&output_path);
    write_summary_json(&summary_path, &summary)?;
    info!("Run summary written to {}", summary_path.display());

    println!(
        "{}: {} of {} muons triggered ({:.2} %), {:.3} Hz over {:.3} s",
        summary.station,
        summary.num_triggered,
        summary.num_generated,
        summary.fraction_triggered * 100.0,
        summary.trigger_rate_hz,
        summary.elapsed_time
    );

    if args.interactive {
        print!("{}", monitor.report(engine.flux())?);
    }

    Ok(())
}
