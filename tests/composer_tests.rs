// tests/composer_tests.rs
use gpmf_telemetry::*;

fn record(tag: &[u8; 4], value: DecodedValue) -> DecodedRecord {
    DecodedRecord { tag: FourCC::new(tag), value, depth: 2, offset: 0 }
}

fn xyz(x: f64, y: f64, z: f64) -> DecodedValue {
    DecodedValue::Xyz(Xyz { x, y, z })
}

#[test]
fn test_scale_context_replaced_wholesale() {
    let records = vec![
        record(b"SCAL", DecodedValue::Vector(smallvec_of(&[2.0, 4.0, 8.0]))),
        record(b"VPTS", DecodedValue::Float(0.0)),
        record(b"GYRO", xyz(2.0, 4.0, 8.0)),
        record(b"SCAL", DecodedValue::Float(2.0)),
        record(b"VPTS", DecodedValue::Float(1001.0)),
        record(b"GYRO", xyz(2.0, 4.0, 8.0)),
    ];
    let out = Composer::compose(&records, &DecodeOptions::default());
    let gyro = FourCC::new(b"GYRO");
    assert_eq!(out.stream.samples[0].get(gyro), Some(&AxisVector::Xyz(Xyz { x: 1.0, y: -1.0, z: -1.0 })));
    assert_eq!(out.stream.samples[1].get(gyro), Some(&AxisVector::Xyz(Xyz { x: 1.0, y: -2.0, z: -4.0 })));
}

#[test]
fn test_identity_polarity() {
    let options = DecodeOptions { polarity: PolarityTable::identity(), ..DecodeOptions::default() };
    let out = Composer::compose(&[record(b"MAGN", xyz(1.0, 2.0, 3.0))], &options);
    assert_eq!(
        out.stream.samples[0].get(FourCC::new(b"MAGN")),
        Some(&AxisVector::Xyz(Xyz { x: 1.0, y: 2.0, z: 3.0 }))
    );
}

#[test]
fn test_configured_cts_divisor() {
    let options = DecodeOptions { cts_divisor: 1000.0, ..DecodeOptions::default() };
    let records = vec![
        record(b"VPTS", DecodedValue::Float(500.0)),
        record(b"ACCL", xyz(0.0, 0.0, 0.0)),
        record(b"VPTS", DecodedValue::Float(2500.0)),
        record(b"ACCL", xyz(0.0, 0.0, 0.0)),
    ];
    let out = Composer::compose(&records, &options);
    assert_eq!(out.stream.samples.iter().map(|s| s.cts).collect::<Vec<_>>(), vec![0, 2]);
}

#[test]
fn test_fix_quality_persists_until_changed() {
    let fix = || {
        let mut r = StructRecord::new();
        for (name, v) in [("lat", 1.0), ("lon", 1.0), ("alt", 1.0), ("speed", 0.0), ("speed3d", 0.0)] {
            r.push(name, FieldValue::Number(v));
        }
        record(b"GPS5", DecodedValue::Struct(r))
    };
    let records = vec![
        record(b"GPSF", DecodedValue::Float(0.0)),
        fix(),
        fix(),
        record(b"GPSF", DecodedValue::Float(2.0)),
        fix(),
    ];
    let options = DecodeOptions { skip_bad_fix: true, ..DecodeOptions::default() };
    let out = Composer::compose(&records, &options);
    assert_eq!(out.gps_stats.bad_fix_skipped, 2);
    assert_eq!(out.gps_stats.accepted, 1);
    assert_eq!(out.gps[0].fix_quality, 2);
    assert_eq!(out.gps_stats.total(), 3);
}

#[test]
fn test_incremental_feed_matches_compose() {
    let records = vec![
        record(b"VPTS", DecodedValue::Float(0.0)),
        record(b"CORI", DecodedValue::Wxyz(Wxyz { w: 1.0, x: 0.5, y: 0.25, z: 0.125 })),
    ];
    let mut composer = Composer::new(&DecodeOptions::default());
    for r in &records {
        composer.feed(r);
    }
    assert_eq!(composer.context().vpts, Some(0.0));
    let incremental = composer.finish();
    assert_eq!(incremental, Composer::compose(&records, &DecodeOptions::default()));
}

fn smallvec_of(values: &[f64]) -> smallvec::SmallVec<[f64; 4]> {
    values.iter().copied().collect()
}
