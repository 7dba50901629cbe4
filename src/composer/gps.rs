// src/composer/gps.rs
use crate::composer::ScaleContext;
use crate::registry::StructRecord;
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;

/// One emitted GPS fix, already scaled
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub speed2d: f64,
    pub speed3d: f64,
    pub timestamp: Option<NaiveDateTime>,
    pub fix_quality: u32,
}

/// Accounting for every GPS record seen in a pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GpsStats {
    pub accepted: usize,
    /// All-zero placeholder fixes, never emitted
    pub empty: usize,
    /// Fixes recorded while the receiver reported no lock
    pub bad_fix: usize,
    /// Subset of `bad_fix` dropped because skip mode was on
    pub bad_fix_skipped: usize,
    /// Legacy fixes dropped for lack of a system clock
    pub untimed: usize,
}

impl GpsStats {
    pub fn total(&self) -> usize {
        self.accepted + self.empty + self.bad_fix_skipped + self.untimed
    }
}

/// Human label for a `GPSF` value
pub fn fix_label(fix: u32) -> &'static str {
    match fix {
        0 => "no lock",
        2 => "2D lock",
        3 => "3D lock",
        _ => "unknown",
    }
}

/// Field layout of the two GPS record families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GpsLayout {
    /// `GPS5`: lat lon alt speed speed3d
    Fix5,
    /// `GPRI`: tstamp lat lon alt speed speed3d and four trailing fields
    RawGps,
}

impl GpsLayout {
    /// Position of (lat, lon, alt, speed, speed3d) in the record
    fn positions(self) -> [usize; 5] {
        match self {
            GpsLayout::Fix5 => [0, 1, 2, 3, 4],
            GpsLayout::RawGps => [1, 2, 3, 4, 5],
        }
    }
}

/// Raw lat/lon/alt are all zero
pub(crate) fn is_empty_fix(record: &StructRecord) -> bool {
    ["lat", "lon", "alt"]
        .iter()
        .all(|name| record.number(name).unwrap_or(0.0) == 0.0)
}

/// Divide every numeric field by its positional divisor and pick the
/// point fields out of the scaled record
pub(crate) fn scaled_point(
    record: &StructRecord,
    layout: GpsLayout,
    scale: &ScaleContext,
    timestamp: Option<NaiveDateTime>,
    fix_quality: u32,
) -> GpsPoint {
    let scaled: Vec<f64> = record
        .iter()
        .enumerate()
        .map(|(i, (_, value))| scale.scale(i, value.as_f64().unwrap_or(0.0)))
        .collect();
    let field = |pos: usize| scaled.get(pos).copied().unwrap_or(0.0);
    let [lat, lon, alt, speed, speed3d] = layout.positions();

    GpsPoint {
        latitude: field(lat),
        longitude: field(lon),
        altitude: field(alt),
        speed2d: field(speed),
        speed3d: field(speed3d),
        timestamp,
        fix_quality,
    }
}

/// Legacy system clock from a decoded `SYST` record
///
/// Both scaled fields must be non-zero; the wall clock is the scaled
/// milliseconds field read as unix seconds.
pub(crate) fn system_time(record: &StructRecord, scale: &ScaleContext) -> Option<NaiveDateTime> {
    let seconds = scale.scale(0, record.number("seconds")?);
    let millis = scale.scale(1, record.number("milliseconds")?);
    if seconds == 0.0 || millis == 0.0 {
        return None;
    }
    let whole = millis.trunc();
    let nanos = ((millis - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos).map(|dt| dt.naive_utc())
}
