use std::sync::Arc;
use std::time::Duration;

use nordicflow::aggregate::Aggregator;
use nordicflow::config::{CoreConfig, ValueRange};
use nordicflow::error::Error;
use nordicflow::ingest::Ingestor;
use nordicflow::status::StatusRegistry;
use nordicflow::types::ids::{SourceId, StreamId};
use nordicflow::types::sample::{Sample, SourceState};
use nordicflow::types::timestamp::Timestamp;

fn build_core(config: CoreConfig) -> (Arc<Ingestor>, Arc<Aggregator>, Arc<StatusRegistry>) {
    config.validate().expect("test config must be valid");
    let aggregator = Arc::new(Aggregator::new(&config));
    let status = Arc::new(StatusRegistry::new(&config));
    let ingestor = Arc::new(Ingestor::new(&config, aggregator.clone(), status.clone()));
    (ingestor, aggregator, status)
}

#[test]
fn capacity_three_evicts_first_of_four() {
    let config = CoreConfig {
        ring_capacity: 3,
        ..CoreConfig::default()
    };
    let (ingestor, aggregator, _) = build_core(config);
    let fingrid = SourceId::from("fingrid");
    let price = StreamId::from("spot_price_eur_mwh");

    let base = Timestamp::now();
    for (i, value) in [10.0, 20.0, 30.0, 40.0].iter().enumerate() {
        ingestor
            .record(&fingrid, &price, base + Duration::from_millis(i as u64), *value)
            .unwrap();
    }

    assert_eq!(aggregator.sample_count(&price), 3);
    // The survivors span 2ms, so one 1s bucket holds them all; the t=0
    // sample (value 10.0) was evicted.
    let rollup = aggregator
        .snapshot(&price, Duration::from_secs(1))
        .next()
        .unwrap();
    assert_eq!(rollup.sample_count, 3);
    assert_eq!(rollup.min, 20.0);
    assert_eq!(rollup.max, 40.0);
}

#[test]
fn out_of_range_rejection_increments_error_counter() {
    let mut config = CoreConfig::default();
    config.value_ranges.insert(
        StreamId::from("spot_price_eur_mwh"),
        ValueRange { min: 0.0, max: 500.0 },
    );
    let (ingestor, _, status) = build_core(config);
    let fingrid = SourceId::from("fingrid");

    let err = ingestor
        .record(
            &fingrid,
            &StreamId::from("spot_price_eur_mwh"),
            Timestamp::now(),
            9999.0,
        )
        .unwrap_err();
    assert!(matches!(err, Error::OutOfRange { .. }));

    let statuses = status.snapshot();
    let fingrid_status = statuses
        .iter()
        .find(|s| s.source_id == fingrid)
        .expect("fingrid must be tracked after the rejected call");
    assert_eq!(fingrid_status.consecutive_errors, 1);
}

#[test]
fn duplicate_timestamp_reingestion_is_idempotent() {
    let (ingestor, aggregator, _) = build_core(CoreConfig::default());
    let eurostat = SourceId::from("eurostat");
    let consumption = StreamId::from("consumption_mw");
    let ts = Timestamp::now();

    ingestor.record(&eurostat, &consumption, ts, 8500.0).unwrap();
    ingestor.record(&eurostat, &consumption, ts, 8700.0).unwrap();

    assert_eq!(aggregator.sample_count(&consumption), 1);
    let rollup = aggregator
        .snapshot(&consumption, Duration::from_secs(60))
        .next()
        .unwrap();
    assert_eq!(rollup.avg, 8700.0);
}

#[test]
fn four_hour_buckets_report_fifty_percent_change() {
    let (_, aggregator, _) = build_core(CoreConfig::default());
    let price = StreamId::from("spot_price_eur_mwh");
    let four_hours_ms = 4 * 3_600_000u64;

    // First bucket averages 10.0, second averages 15.0.
    aggregator.update(&price, Sample::new(Timestamp::from_millis(0), 8.0));
    aggregator.update(&price, Sample::new(Timestamp::from_millis(1000), 12.0));
    aggregator.update(&price, Sample::new(Timestamp::from_millis(four_hours_ms), 14.0));
    aggregator.update(&price, Sample::new(Timestamp::from_millis(four_hours_ms + 1000), 16.0));

    let rollups: Vec<_> = aggregator
        .snapshot(&price, Duration::from_secs(4 * 3600))
        .collect();
    assert_eq!(rollups.len(), 2);
    assert_eq!(rollups[0].pct_change_vs_prior_bucket, None);
    assert_eq!(rollups[1].pct_change_vs_prior_bucket, Some(50.0));
}

#[test]
fn bucket_counts_sum_to_retained_samples() {
    let config = CoreConfig {
        ring_capacity: 50,
        ..CoreConfig::default()
    };
    let (_, aggregator, _) = build_core(config);
    let frequency = StreamId::from("grid_frequency_hz");

    for i in 0..80u64 {
        aggregator.update(
            &frequency,
            Sample::new(Timestamp::from_millis(i * 90_000), 50.0),
        );
    }

    let retained = aggregator.sample_count(&frequency);
    assert_eq!(retained, 50);
    let bucketed: usize = aggregator
        .snapshot(&frequency, Duration::from_secs(600))
        .map(|r| r.sample_count)
        .sum();
    assert_eq!(bucketed, retained);
}

#[test]
fn silent_registered_source_reports_down() {
    let (_, _, status) = build_core(CoreConfig::default());
    let warehouse = SourceId::from("sql_warehouse");
    status.register(&warehouse);

    let past_threshold = Timestamp::now() + Duration::from_secs(121);
    let statuses = status.snapshot_at(past_threshold);
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].state, SourceState::Down);
}

#[test]
fn concurrent_records_for_distinct_streams() {
    let (ingestor, aggregator, _) = build_core(CoreConfig::default());
    let streams: Vec<StreamId> = (0..4).map(|i| StreamId::new(format!("stream_{i}"))).collect();

    std::thread::scope(|scope| {
        for stream in &streams {
            let ingestor = ingestor.clone();
            scope.spawn(move || {
                let source = SourceId::from("fingrid");
                let base = Timestamp::now();
                for i in 0..100u64 {
                    ingestor
                        .record(&source, stream, base + Duration::from_millis(i), i as f64)
                        .unwrap();
                }
            });
        }
    });

    for stream in &streams {
        assert_eq!(aggregator.sample_count(stream), 100);
    }
}
