// src/config.rs
use crate::composer::{PolarityTable, DEFAULT_AXIS_TAGS, DEFAULT_CTS_DIVISOR};
use crate::error::{TelemetryError, Result};
use crate::types::FourCC;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for one decode pass
///
/// Every field has a default, so a JSON document only needs the keys it
/// changes:
///
/// ```
/// use gpmf_telemetry::config::DecodeOptions;
///
/// let options = DecodeOptions::from_json(r#"{"skip_bad_fix": true}"#).unwrap();
/// assert!(options.skip_bad_fix);
/// assert_eq!(options.cts_divisor, 1001.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeOptions {
    /// Drop GPS points recorded while the receiver had no lock
    pub skip_bad_fix: bool,
    /// VPTS units per capture-time bucket
    pub cts_divisor: f64,
    /// Tags composed into sensor samples
    pub axis_tags: Vec<FourCC>,
    /// Replacement ignore set; None keeps the built-in list
    pub ignored_tags: Option<Vec<FourCC>>,
    pub polarity: PolarityTable,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            skip_bad_fix: false,
            cts_divisor: DEFAULT_CTS_DIVISOR,
            axis_tags: DEFAULT_AXIS_TAGS.to_vec(),
            ignored_tags: None,
            polarity: PolarityTable::default(),
        }
    }
}

impl DecodeOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        let options: DecodeOptions = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.cts_divisor.is_finite() && self.cts_divisor > 0.0) {
            return Err(TelemetryError::Config(format!(
                "cts_divisor must be a positive number, got {}",
                self.cts_divisor
            )));
        }
        for (tag, signs) in &self.polarity.per_tag {
            if signs.iter().any(|s| !s.is_finite()) {
                return Err(TelemetryError::Config(format!("polarity for {} has a non-finite sign", tag)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DecodeOptions::default();
        assert!(!options.skip_bad_fix);
        assert_eq!(options.axis_tags.len(), 5);
        assert!(options.axis_tags.contains(&FourCC::new(b"MAGN")));
        assert!(options.ignored_tags.is_none());
    }

    #[test]
    fn test_from_json_partial() {
        let options = DecodeOptions::from_json(
            r#"{"cts_divisor": 1000, "axis_tags": ["ACCL", "GYRO"], "ignored_tags": []}"#,
        )
        .unwrap();
        assert_eq!(options.cts_divisor, 1000.0);
        assert_eq!(options.axis_tags, vec![FourCC::new(b"ACCL"), FourCC::new(b"GYRO")]);
        assert_eq!(options.ignored_tags, Some(vec![]));
    }

    #[test]
    fn test_invalid_options() {
        assert!(matches!(
            DecodeOptions::from_json(r#"{"cts_divisor": 0}"#),
            Err(TelemetryError::Config(_))
        ));
        assert!(matches!(
            DecodeOptions::from_json(r#"{"axis_tags": ["TOO_LONG"]}"#),
            Err(TelemetryError::Json(_))
        ));
        assert!(DecodeOptions::from_json(r#"{"unknown_key": 1}"#).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"skip_bad_fix": true}"#).unwrap();
        assert!(DecodeOptions::from_file(&path).unwrap().skip_bad_fix);
        assert!(matches!(
            DecodeOptions::from_file(dir.path().join("missing.json")),
            Err(TelemetryError::Io(_))
        ));
    }
}
