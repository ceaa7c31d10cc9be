//! End-to-end runs: determinism, event stream properties and file output.

use muon_simulator::config::SimulationConfig;
use muon_simulator::hardware::{StationRegistry, StationSelection};
use muon_simulator::io::{
    read_summary_json, summary_path_for, write_summary_json, CsvEventWriter, VecSink,
};
use muon_simulator::sims::{ElapsedTimeScale, EventRecord, SimulationEngine};
use muon_simulator::SimError;
use test_helpers::{output_path, unit_square_engine, TEST_SEED};

fn station_config(station: &str, num_events: u64, seed: u64) -> SimulationConfig {
    SimulationConfig::default()
        .with_station(StationSelection::Named(station.to_string()))
        .with_num_events(num_events)
        .with_seed(seed)
}

#[test]
fn test_same_seed_same_events() {
    let _ = env_logger::builder().is_test(true).try_init();

    let registry = StationRegistry::builtin();
    let config = station_config("ROMA-01", 5_000, 1234);

    let mut first = VecSink::new();
    let mut second = VecSink::new();
    SimulationEngine::new(&config, &registry)
        .unwrap()
        .run(&mut first)
        .unwrap();
    SimulationEngine::new(&config, &registry)
        .unwrap()
        .run(&mut second)
        .unwrap();

    assert!(!first.events.is_empty());
    assert_eq!(first.events, second.events);
    assert_eq!(first.summary, second.summary);
}

#[test]
fn test_different_seeds_differ() {
    let mut a = VecSink::new();
    let mut b = VecSink::new();
    unit_square_engine(20_000, 1).run(&mut a).unwrap();
    unit_square_engine(20_000, 2).run(&mut b).unwrap();
    assert_ne!(a.events, b.events);
}

#[test]
fn test_event_stream_invariants() {
    let registry = StationRegistry::builtin();
    let config = station_config("SAVO-01", 20_000, TEST_SEED)
        .with_elapsed_time_scale(ElapsedTimeScale::Nanoseconds);
    let mut engine = SimulationEngine::new(&config, &registry).unwrap();
    let mut sink = VecSink::new();
    let summary = engine.run(&mut sink).unwrap();

    assert!(summary.num_triggered <= summary.num_generated);
    assert!((0.0..=1.0).contains(&summary.fraction_triggered));
    assert_eq!(summary.num_generated, 20_000);
    assert_eq!(summary.station, "SAVO-01");

    let geometry = registry.get("SAVO-01").unwrap();
    let area = geometry.active_area();
    let events: &[EventRecord] = &sink.events;
    assert_eq!(events[0].delta_time, 0.0);
    for pair in events.windows(2) {
        assert!(pair[1].event_number > pair[0].event_number);
        assert!(pair[1].elapsed_time >= pair[0].elapsed_time);
        assert!(pair[1].delta_time >= 0.0);
    }
    for event in events {
        assert!(area.contains(event.x_top, event.y_top));
        assert!(area.contains(event.x_bottom, event.y_bottom));
        assert!(event.nanoseconds < 1_000_000_000);
        assert!(event.theta >= 0.0 && event.theta <= engine.flux().model().theta_max() + 1e-12);
        assert!(event.track_length >= geometry.plane_separation() - 1e-9);
    }

    // Mean spacing of triggers follows the configured rate.
    let mean_dt = summary.elapsed_time / summary.num_triggered as f64;
    let expected = 1.0 / summary.rate_hz;
    assert!(
        (mean_dt - expected).abs() < 0.1 * expected,
        "mean spacing {mean_dt}, expected {expected}"
    );
}

#[test]
fn test_legacy_time_scale_combines_fields() {
    let mut engine = unit_square_engine(20_000, TEST_SEED);
    let mut nanos = VecSink::new();
    engine.run(&mut nanos).unwrap();

    let mut legacy_engine = SimulationEngine::from_parts(
        engine.telescope().clone(),
        engine.flux().clone(),
        20_000,
        TEST_SEED,
        ElapsedTimeScale::Legacy,
    );
    let mut legacy = VecSink::new();
    legacy_engine.run(&mut legacy).unwrap();

    assert_eq!(nanos.events.len(), legacy.events.len());
    for (a, b) in nanos.events.iter().zip(&legacy.events) {
        assert_eq!((a.seconds, a.nanoseconds), (b.seconds, b.nanoseconds));
        assert_eq!(
            b.elapsed_time,
            b.seconds as f64 + 1e-6 * b.nanoseconds as f64
        );
    }
}

#[test]
fn test_csv_and_summary_files() {
    let _ = env_logger::builder().is_test(true).try_init();

    let registry = StationRegistry::builtin();
    let config = station_config("bolo-01", 5_000, 99);
    let mut engine = SimulationEngine::new(&config, &registry).unwrap();

    let csv_path = output_path("run_output_bolo_mc.csv");
    let mut writer = CsvEventWriter::create(&csv_path).unwrap();
    let summary = engine.run(&mut writer).unwrap();
    let rows = writer.rows();
    writer.into_inner().unwrap();

    let summary_path = summary_path_for(&csv_path);
    write_summary_json(&summary_path, &summary).unwrap();
    assert_eq!(read_summary_json(&summary_path).unwrap(), summary);

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "RunNumber");
    assert_eq!(&headers[1], "EventNumber");
    let records: Vec<EventRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(records.len() as u64, rows);
    assert_eq!(rows, summary.num_triggered);
    assert_eq!(summary.station, "BOLO-01");
}

#[test]
fn test_unknown_station_rejected() {
    let registry = StationRegistry::builtin();
    let config = station_config("NOPE-99", 10, 1);
    assert!(matches!(
        SimulationEngine::new(&config, &registry),
        Err(SimError::UnknownStation(_))
    ));
}
