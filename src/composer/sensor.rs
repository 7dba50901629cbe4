// src/composer/sensor.rs
use crate::registry::{DecodedValue, Wxyz, Xyz};
use crate::types::FourCC;
use serde::Serialize;
use std::collections::BTreeMap;

/// A scaled, polarity-corrected sensor vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisVector {
    Xyz(Xyz),
    Wxyz(Wxyz),
}

impl AxisVector {
    /// Vector from a decoded sensor value, or None for non-vector values
    pub fn from_value(value: &DecodedValue) -> Option<Self> {
        match value {
            DecodedValue::Xyz(v) => Some(AxisVector::Xyz(*v)),
            DecodedValue::Wxyz(v) => Some(AxisVector::Wxyz(*v)),
            _ => None,
        }
    }

    pub fn components(&self) -> usize {
        match self {
            AxisVector::Xyz(_) => 3,
            AxisVector::Wxyz(_) => 4,
        }
    }

    /// Rewrite every component through `f(index, value)`
    pub fn map_components<F: FnMut(usize, f64) -> f64>(self, mut f: F) -> Self {
        match self {
            AxisVector::Xyz(v) => AxisVector::Xyz(Xyz {
                x: f(0, v.x),
                y: f(1, v.y),
                z: f(2, v.z),
            }),
            AxisVector::Wxyz(v) => AxisVector::Wxyz(Wxyz {
                w: f(0, v.w),
                x: f(1, v.x),
                y: f(2, v.y),
                z: f(3, v.z),
            }),
        }
    }
}

/// All sensor vectors sharing one capture-time bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSample {
    #[serde(rename = "CTS")]
    pub cts: i64,
    #[serde(rename = "VPTS")]
    pub vpts: Option<f64>,
    #[serde(flatten)]
    pub axes: BTreeMap<String, AxisVector>,
}

impl SensorSample {
    pub fn new(cts: i64, vpts: Option<f64>) -> Self {
        SensorSample { cts, vpts, axes: BTreeMap::new() }
    }

    pub fn get(&self, tag: FourCC) -> Option<&AxisVector> {
        self.axes.get(&tag.to_string())
    }

    pub fn set(&mut self, tag: FourCC, vector: AxisVector) {
        self.axes.insert(tag.to_string(), vector);
    }
}

/// Ordered sensor samples plus the declared axis tags and the rate estimate
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stream {
    pub datas: Vec<FourCC>,
    pub samples: Vec<SensorSample>,
    #[serde(rename = "FPS")]
    pub fps: Option<f64>,
}

impl Stream {
    pub fn new(datas: Vec<FourCC>) -> Self {
        Stream { datas, samples: Vec::new(), fps: None }
    }

    /// Write `vector` into the bucket for `cts`
    ///
    /// The last sample is reused unless `cts` is strictly greater than its
    /// bucket, in which case a new sample is appended.
    pub fn record(&mut self, cts: i64, vpts: Option<f64>, tag: FourCC, vector: AxisVector) {
        let starts_bucket = self.samples.last().map_or(true, |last| cts > last.cts);
        if starts_bucket {
            self.samples.push(SensorSample::new(cts, vpts));
        }
        if let Some(sample) = self.samples.last_mut() {
            sample.set(tag, vector);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Effective rate from the most frequent VPTS delta between consecutive
/// samples, in samples per second
///
/// Missing VPTS values count as zero. Ties go to the delta seen first.
/// Returns None with fewer than two samples or when the mode is zero.
pub fn sample_rate(samples: &[SensorSample]) -> Option<f64> {
    let mut counts: Vec<(i64, usize)> = Vec::new();
    for pair in samples.windows(2) {
        let delta = (pair[1].vpts.unwrap_or(0.0) - pair[0].vpts.unwrap_or(0.0)).round() as i64;
        match counts.iter_mut().find(|(d, _)| *d == delta) {
            Some((_, n)) => *n += 1,
            None => counts.push((delta, 1)),
        }
    }

    let mut mode: Option<(i64, usize)> = None;
    for &(delta, n) in &counts {
        if mode.map_or(true, |(_, best)| n > best) {
            mode = Some((delta, n));
        }
    }

    match mode {
        Some((delta, _)) if delta != 0 => Some(1.0 / (delta as f64 / 1_000_000.0)),
        _ => None,
    }
}
