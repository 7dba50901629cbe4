// src/registry/value.rs
use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use smallvec::SmallVec;

/// Three-axis vector (ACCL, GYRO, GRAV, MAGN)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Quaternion (CORI, IORI)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wxyz {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One field of a heterogeneous struct record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }
}

/// Ordered named fields; serializes as a JSON object in field order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructRecord {
    fields: Vec<(String, FieldValue)>,
}

impl StructRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record with every named field set to zero
    pub fn zeroed(names: &[&str]) -> Self {
        let mut record = Self::new();
        for name in names {
            record.push(*name, FieldValue::Number(0.0));
        }
        record
    }

    pub fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Numeric value of a field; text fields and missing names give None
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_f64)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }
}

impl Serialize for StructRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Typed result of decoding one leaf token
///
/// Numbers are unscaled; scale factors are applied by the composer.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Float(f64),
    Vector(SmallVec<[f64; 4]>),
    Xyz(Xyz),
    Wxyz(Wxyz),
    Text(String),
    Timestamp(NaiveDateTime),
    Struct(StructRecord),
    Raw(Vec<u8>),
    Absent,
}

impl DecodedValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, DecodedValue::Absent)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DecodedValue::Float(v) => Some(*v),
            DecodedValue::Vector(values) => values.first().copied(),
            _ => None,
        }
    }

    /// Flatten numeric variants into their components, in field order
    pub fn as_numbers(&self) -> Option<SmallVec<[f64; 4]>> {
        match self {
            DecodedValue::Float(v) => Some(smallvec::smallvec![*v]),
            DecodedValue::Vector(values) => Some(values.clone()),
            DecodedValue::Xyz(v) => Some(smallvec::smallvec![v.x, v.y, v.z]),
            DecodedValue::Wxyz(v) => Some(smallvec::smallvec![v.w, v.x, v.y, v.z]),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DecodedValue::Float(_) => "float",
            DecodedValue::Vector(_) => "vector",
            DecodedValue::Xyz(_) => "xyz",
            DecodedValue::Wxyz(_) => "wxyz",
            DecodedValue::Text(_) => "text",
            DecodedValue::Timestamp(_) => "timestamp",
            DecodedValue::Struct(_) => "struct",
            DecodedValue::Raw(_) => "raw",
            DecodedValue::Absent => "absent",
        }
    }
}
