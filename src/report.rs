// src/report.rs
use crate::composer::{Composer, Composition, GpsPoint, GpsStats, Stream};
use crate::config::DecodeOptions;
use crate::container;
use crate::decoder::{DecodeStats, StreamDecoder};
use crate::error::Result;
use crate::source::{MetadataSource, RawMetadata};
use serde::Serialize;
use std::io::Write;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GpsReport {
    pub points: Vec<GpsPoint>,
    pub stats: GpsStats,
}

/// Final output of a decode pass
///
/// Serializes with the field names downstream viewers expect: `streams`
/// holds `datas`, `samples` and `FPS`; each sample carries `CTS`, `VPTS`
/// and one object per axis tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TelemetryReport {
    pub streams: Stream,
    pub gps: GpsReport,
    pub decode: DecodeStats,
    pub camera: Option<String>,
    pub source: Option<String>,
    pub date: Option<String>,
    /// Highlight markers in milliseconds
    pub anchors: Vec<u64>,
}

impl TelemetryReport {
    pub fn new(composition: Composition, decode: DecodeStats) -> Self {
        TelemetryReport {
            streams: composition.stream,
            gps: GpsReport {
                points: composition.gps,
                stats: composition.gps_stats,
            },
            decode,
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Fill `camera` and `anchors` from the source container
    ///
    /// A container without a readable highlight box still yields the
    /// serial; the highlight failure is logged and `anchors` stays empty.
    pub fn with_container(mut self, container: &[u8]) -> Self {
        self.camera = container::camera_serial(container);
        match container::highlights(container) {
            Ok(anchors) => self.anchors = anchors,
            Err(e) => warn!(error = %e, "no highlight markers"),
        }
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }
}

/// Decode a metadata buffer in one pass
///
/// # Example
///
/// ```
/// use gpmf_telemetry::{decode_buffer, DecodeOptions};
/// use gpmf_telemetry::klv::TokenWriter;
///
/// let mut writer = TokenWriter::new();
/// writer.write_i16(b"SCAL", &[1]).unwrap();
/// writer.write_samples::<i16>(b"ACCL", 3, &[2, 4, 6]).unwrap();
///
/// let report = decode_buffer(writer.as_bytes(), &DecodeOptions::default());
/// assert_eq!(report.streams.samples.len(), 1);
/// ```
pub fn decode_buffer(bytes: &[u8], options: &DecodeOptions) -> TelemetryReport {
    let decoded = StreamDecoder::from_options(options).decode(bytes);
    let composition = Composer::compose(&decoded.records, options);
    TelemetryReport::new(composition, decoded.stats)
}

/// Decode a loaded buffer, carrying its recording time into the report
pub fn decode_metadata(raw: &RawMetadata, options: &DecodeOptions) -> TelemetryReport {
    let mut report = decode_buffer(&raw.bytes, options);
    report.date = raw.creation_time.clone();
    report
}

/// Load `source` and decode it; load failures are returned before decoding
pub fn decode_source<S: MetadataSource + ?Sized>(source: &S, options: &DecodeOptions) -> Result<TelemetryReport> {
    let raw = source.load()?;
    let mut report = decode_metadata(&raw, options);
    report.source = source.name();
    Ok(report)
}
