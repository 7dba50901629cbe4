// src/composer/mod.rs
//! Sample composition
//!
//! [`Composer`] is a single-pass reducer over the flat record list produced
//! by the stream decoder. It owns a [`ComposerContext`] holding the running
//! scale, fix quality and clocks, and emits GPS points plus time-bucketed
//! sensor samples.

mod gps;
mod polarity;
mod scale;
mod sensor;

pub use gps::{fix_label, GpsPoint, GpsStats};
pub use polarity::PolarityTable;
pub use scale::ScaleContext;
pub use sensor::{sample_rate, AxisVector, SensorSample, Stream};

use crate::config::DecodeOptions;
use crate::decoder::DecodedRecord;
use crate::registry::{DecodedValue, StructRecord};
use crate::types::FourCC;
use chrono::NaiveDateTime;
use gps::GpsLayout;
use serde::Serialize;
use tracing::{debug, info, warn};

const SCAL: FourCC = FourCC::new(b"SCAL");
const GPSF: FourCC = FourCC::new(b"GPSF");
const GPSU: FourCC = FourCC::new(b"GPSU");
const GPS5: FourCC = FourCC::new(b"GPS5");
const GPRI: FourCC = FourCC::new(b"GPRI");
const SYST: FourCC = FourCC::new(b"SYST");
const VPTS: FourCC = FourCC::new(b"VPTS");
const STNM: FourCC = FourCC::new(b"STNM");
const TSMP: FourCC = FourCC::new(b"TSMP");

/// Axis tags composed into sensor samples unless configured otherwise
pub const DEFAULT_AXIS_TAGS: [FourCC; 5] = [
    FourCC::new(b"CORI"),
    FourCC::new(b"ACCL"),
    FourCC::new(b"GRAV"),
    FourCC::new(b"MAGN"),
    FourCC::new(b"GYRO"),
];

/// Default VPTS → CTS bucket divisor
pub const DEFAULT_CTS_DIVISOR: f64 = 1001.0;

/// Running state of one composition pass
#[derive(Debug, Clone, Default)]
pub struct ComposerContext {
    pub scale: ScaleContext,
    /// Last `GPSF`; 0 means no lock
    pub fix_quality: u32,
    pub gps_time: Option<NaiveDateTime>,
    /// Clock from the last usable `SYST`
    pub legacy_time: Option<NaiveDateTime>,
    pub vpts_origin: Option<f64>,
    pub vpts: Option<f64>,
    pub cts: i64,
    pub stream_name: Option<String>,
    pub total_samples: Option<f64>,
}

/// Everything a pass produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Composition {
    pub stream: Stream,
    pub gps: Vec<GpsPoint>,
    pub gps_stats: GpsStats,
}

pub struct Composer {
    context: ComposerContext,
    skip_bad_fix: bool,
    cts_divisor: f64,
    polarity: PolarityTable,
    stream: Stream,
    gps: Vec<GpsPoint>,
    gps_stats: GpsStats,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(&DecodeOptions::default())
    }
}

impl Composer {
    pub fn new(options: &DecodeOptions) -> Self {
        let cts_divisor = if options.cts_divisor > 0.0 {
            options.cts_divisor
        } else {
            DEFAULT_CTS_DIVISOR
        };
        Composer {
            context: ComposerContext::default(),
            skip_bad_fix: options.skip_bad_fix,
            cts_divisor,
            polarity: options.polarity.clone(),
            stream: Stream::new(options.axis_tags.clone()),
            gps: Vec::new(),
            gps_stats: GpsStats::default(),
        }
    }

    /// Run a whole pass over `records`
    ///
    /// # Example
    ///
    /// ```
    /// use gpmf_telemetry::composer::Composer;
    /// use gpmf_telemetry::config::DecodeOptions;
    /// use gpmf_telemetry::decoder::StreamDecoder;
    /// use gpmf_telemetry::klv::TokenWriter;
    ///
    /// let mut writer = TokenWriter::new();
    /// writer.write_i16(b"SCAL", &[1]).unwrap();
    /// writer.write_samples::<i16>(b"ACCL", 3, &[2, 4, 6]).unwrap();
    ///
    /// let decoded = StreamDecoder::new().decode(writer.as_bytes());
    /// let composition = Composer::compose(&decoded.records, &DecodeOptions::default());
    /// assert_eq!(composition.stream.samples.len(), 1);
    /// ```
    pub fn compose(records: &[DecodedRecord], options: &DecodeOptions) -> Composition {
        let mut composer = Composer::new(options);
        for record in records {
            composer.feed(record);
        }
        composer.finish()
    }

    pub fn context(&self) -> &ComposerContext {
        &self.context
    }

    pub fn gps_stats(&self) -> &GpsStats {
        &self.gps_stats
    }

    /// Apply one record to the running state
    pub fn feed(&mut self, record: &DecodedRecord) {
        let value = &record.value;
        if value.is_absent() {
            return;
        }

        match record.tag {
            SCAL => {
                if let Some(scale) = ScaleContext::from_value(value) {
                    self.context.scale = scale;
                }
            }
            GPSF => {
                if let Some(fix) = value.as_f64() {
                    let fix = fix as u32;
                    if fix != self.context.fix_quality {
                        info!(fix, label = fix_label(fix), "GPS fix changed");
                    }
                    self.context.fix_quality = fix;
                }
            }
            GPSU => {
                if let DecodedValue::Timestamp(ts) = value {
                    self.context.gps_time = Some(*ts);
                }
            }
            VPTS => {
                if let Some(vpts) = value.as_f64() {
                    self.observe_vpts(vpts);
                }
            }
            STNM => {
                if let Some(name) = value.as_str() {
                    debug!(stream = name, "stream name");
                    self.context.stream_name = Some(name.to_string());
                }
            }
            TSMP => {
                if let Some(total) = value.as_f64() {
                    debug!(total, "total samples");
                    self.context.total_samples = Some(total);
                }
            }
            GPS5 => {
                if let DecodedValue::Struct(fix) = value {
                    self.gps_fix(fix, GpsLayout::Fix5);
                }
            }
            GPRI => {
                if let DecodedValue::Struct(fix) = value {
                    self.gps_fix(fix, GpsLayout::RawGps);
                }
            }
            SYST => {
                if let DecodedValue::Struct(clock) = value {
                    if let Some(ts) = gps::system_time(clock, &self.context.scale) {
                        self.context.legacy_time = Some(ts);
                    }
                }
            }
            tag if self.stream.datas.contains(&tag) => self.sensor(tag, value),
            _ => {}
        }
    }

    pub fn finish(mut self) -> Composition {
        self.stream.fps = sample_rate(&self.stream.samples);
        info!(
            samples = self.stream.samples.len(),
            gps_points = self.gps.len(),
            accepted = self.gps_stats.accepted,
            empty = self.gps_stats.empty,
            bad_fix = self.gps_stats.bad_fix,
            bad_fix_skipped = self.gps_stats.bad_fix_skipped,
            "composition complete"
        );
        Composition {
            stream: self.stream,
            gps: self.gps,
            gps_stats: self.gps_stats,
        }
    }

    fn observe_vpts(&mut self, vpts: f64) {
        let origin = *self.context.vpts_origin.get_or_insert(vpts);
        self.context.vpts = Some(vpts);
        self.context.cts = ((vpts - origin) / self.cts_divisor) as i64;
    }

    fn gps_fix(&mut self, fix: &StructRecord, layout: GpsLayout) {
        if gps::is_empty_fix(fix) {
            warn!("skipping empty GPS point");
            self.gps_stats.empty += 1;
            return;
        }

        if self.context.fix_quality == 0 {
            self.gps_stats.bad_fix += 1;
            if self.skip_bad_fix {
                warn!("skipping GPS point recorded without a fix");
                self.gps_stats.bad_fix_skipped += 1;
                return;
            }
        }

        let timestamp = match layout {
            GpsLayout::Fix5 => self.context.gps_time,
            GpsLayout::RawGps => match self.context.legacy_time {
                Some(ts) => Some(ts),
                None => {
                    debug!("raw GPS point before any system time");
                    self.gps_stats.untimed += 1;
                    return;
                }
            },
        };

        let point = gps::scaled_point(fix, layout, &self.context.scale, timestamp, self.context.fix_quality);
        self.gps.push(point);
        self.gps_stats.accepted += 1;
    }

    fn sensor(&mut self, tag: FourCC, value: &DecodedValue) {
        let Some(vector) = AxisVector::from_value(value) else {
            debug!(tag = %tag, kind = value.kind(), "sensor record is not a vector");
            return;
        };
        let components = vector.components();
        let scale = &self.context.scale;
        let polarity = &self.polarity;
        let corrected = vector.map_components(|i, v| scale.scale(i, v) * polarity.sign(tag, components, i));
        self.stream.record(self.context.cts, self.context.vpts, tag, corrected);
    }
}
