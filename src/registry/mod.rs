// src/registry/mod.rs
//! Tag → decode strategy registry
//!
//! Every tag resolves to exactly one [`Strategy`]. The table is built once
//! by [`Registry::new`]; tags missing from it resolve to
//! [`Strategy::Unknown`], which decodes to [`DecodedValue::Absent`].

mod decode;
mod value;

pub use value::{DecodedValue, FieldValue, StructRecord, Wxyz, Xyz};

use crate::error::{TelemetryError, Result};
use crate::klv::Token;
use crate::types::FourCC;
use std::collections::HashMap;

/// Mixed-width records whose field layout comes from a `TYPE` string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructKind {
    /// `GPRI`: raw GPS from the Karma drone family
    RawGps,
    /// `SYST`: system clock pair from the same family
    SystemTime,
}

impl StructKind {
    pub fn default_layout(&self) -> &'static str {
        match self {
            StructKind::RawGps => "JlllSSSSBB",
            StructKind::SystemTime => "JJ",
        }
    }

    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            StructKind::RawGps => &[
                "tstamp", "lat", "lon", "alt", "speed", "speed3d", "unk1", "unk2", "unk3", "unk4",
            ],
            StructKind::SystemTime => &["seconds", "milliseconds"],
        }
    }
}

/// Closed set of payload decoding rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Keep the payload bytes as they are
    Raw,
    /// First element of the primitive type
    Scalar,
    /// Scalar when `repeat == 1`, otherwise absent
    SingleScalar,
    /// First element, read as a number
    Float,
    /// Every element of the payload; a single element decodes as a scalar
    Vector,
    /// Three components; item size must be 3 or 6 elements
    Xyz,
    /// Four components; item size must be 4 or 8 elements
    Wxyz,
    /// Null-padded ASCII text
    Text,
    /// `yymmddhhmmss.sss` UTC date
    Timestamp,
    /// Five-field GPS fix; empty payload is the zero fix
    GpsFix,
    /// Heterogeneous struct laid out by a companion `TYPE`
    Struct(StructKind),
    /// Fixed-width unit strings, one per item
    Units,
    /// Recognized but deliberately not decoded
    Ignore,
    /// Not in the registry
    Unknown,
}

/// Field names of a decoded `GPS5` fix
pub const GPS_FIX_FIELDS: [&str; 5] = ["lat", "lon", "alt", "speed", "speed3d"];

const RAW_TAGS: &[&[u8; 4]] = &[
    b"DEVC", b"EMPT", b"GPRO", b"GPSA", b"HD5.", b"STRM", b"TICK", b"ISOG", b"FACE", b"FCNM",
    b"ISOE", b"WBAL", b"WRGB", b"STMP", b"STPS", b"TIMO", b"UNIF", b"MTRX", b"ALLD", b"YAVG",
    b"SCEN", b"HUES", b"MFGI", b"FWVS", b"KBAT", b"ATTD", b"GLPI", b"VFRH", b"BPOS", b"ATTR",
    b"SIMU", b"ESCS", b"SCPR", b"LNED", b"CYTS", b"CSEN", b"WNDM", b"MWET", b"AALP",
];

const BINDINGS: &[(&[u8; 4], Strategy)] = &[
    (b"DVID", Strategy::Scalar),
    (b"TSMP", Strategy::Scalar),
    (b"GPSF", Strategy::Scalar),
    (b"GPSP", Strategy::Scalar),
    (b"TMPC", Strategy::Scalar),
    (b"VPTS", Strategy::SingleScalar),
    (b"SHUT", Strategy::Float),
    (b"SROT", Strategy::Float),
    (b"SCAL", Strategy::Vector),
    (b"DISP", Strategy::Vector),
    (b"STNM", Strategy::Text),
    (b"DVNM", Strategy::Text),
    (b"SIUN", Strategy::Text),
    (b"ORIN", Strategy::Text),
    (b"ORIO", Strategy::Text),
    (b"TYPE", Strategy::Text),
    (b"ACCL", Strategy::Xyz),
    (b"GYRO", Strategy::Xyz),
    (b"GRAV", Strategy::Xyz),
    (b"MAGN", Strategy::Xyz),
    (b"CORI", Strategy::Wxyz),
    (b"IORI", Strategy::Wxyz),
    (b"GPSU", Strategy::Timestamp),
    (b"GPS5", Strategy::GpsFix),
    (b"GPRI", Strategy::Struct(StructKind::RawGps)),
    (b"SYST", Strategy::Struct(StructKind::SystemTime)),
    (b"UNIT", Strategy::Units),
];

/// Tags skipped by default: they carry per-frame image statistics, drone
/// subsystem telemetry or audio flags that the composer never consumes
pub const DEFAULT_IGNORED: &[&[u8; 4]] = &[
    b"TIMO", b"HUES", b"SCEN", b"YAVG", b"ISOE", b"FACE", b"SHUT", b"WBAL", b"WRGB", b"UNIF",
    b"FCNM", b"MTRX", b"ORIN", b"ORIO", b"FWVS", b"KBAT", b"ATTD", b"GLPI", b"VFRH", b"BPOS",
    b"ATTR", b"SIMU", b"ESCS", b"SCPR", b"LNED", b"CYTS", b"CSEN", b"WNDM", b"MWET", b"AALP",
];

#[derive(Debug, Clone)]
pub struct Registry {
    strategies: HashMap<FourCC, Strategy>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Registry with the built-in bindings and the default ignore set
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for tag in RAW_TAGS {
            registry.bind(FourCC::new(tag), Strategy::Raw);
        }
        for (tag, strategy) in BINDINGS {
            registry.bind(FourCC::new(tag), *strategy);
        }
        registry.ignore(DEFAULT_IGNORED.iter().map(|tag| FourCC::new(tag)));
        registry
    }

    /// Registry with no bindings; every tag is unknown
    pub fn empty() -> Self {
        Registry { strategies: HashMap::new() }
    }

    pub fn bind(&mut self, tag: FourCC, strategy: Strategy) {
        self.strategies.insert(tag, strategy);
    }

    /// Mark tags as ignored, overriding any existing binding
    pub fn ignore<I: IntoIterator<Item = FourCC>>(&mut self, tags: I) {
        for tag in tags {
            self.strategies.insert(tag, Strategy::Ignore);
        }
    }

    /// Replace the ignore set: previously ignored tags fall back to their
    /// built-in binding (or unknown) before `tags` are applied
    pub fn set_ignored<I: IntoIterator<Item = FourCC>>(&mut self, tags: I) {
        let defaults = Self::builtin_bindings();
        let ignored: Vec<FourCC> = self
            .strategies
            .iter()
            .filter(|(_, s)| **s == Strategy::Ignore)
            .map(|(tag, _)| *tag)
            .collect();
        for tag in ignored {
            match defaults.get(&tag) {
                Some(strategy) => {
                    self.strategies.insert(tag, *strategy);
                }
                None => {
                    self.strategies.remove(&tag);
                }
            }
        }
        self.ignore(tags);
    }

    pub fn strategy(&self, tag: FourCC) -> Strategy {
        self.strategies.get(&tag).copied().unwrap_or(Strategy::Unknown)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Decode one leaf token
    ///
    /// `companion_type` is the most recent `TYPE` string of the enclosing
    /// container; only struct strategies read it.
    pub fn decode(&self, token: &Token<'_>, companion_type: Option<&str>) -> Result<DecodedValue> {
        if token.is_container() {
            return Err(TelemetryError::UnsupportedType(format!(
                "{} is a container and has no leaf value",
                token.tag()
            )));
        }
        decode::apply(self.strategy(token.tag()), token, companion_type)
    }

    fn builtin_bindings() -> HashMap<FourCC, Strategy> {
        let mut map: HashMap<FourCC, Strategy> = RAW_TAGS
            .iter()
            .map(|tag| (FourCC::new(tag), Strategy::Raw))
            .collect();
        for (tag, strategy) in BINDINGS {
            map.insert(FourCC::new(tag), *strategy);
        }
        map
    }
}
