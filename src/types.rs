// src/types.rs
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// GPMF element type code, as carried in byte 4 of every KLV header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    Nested,
    I8,
    U8,
    Char,
    F64,
    F32,
    FourCC,
    Guid,
    I64,
    U64,
    I32,
    U32,
    Q15_16,
    Q31_32,
    I16,
    U16,
    UtcDate,
    Complex,
    Unknown(u8),
}

impl TypeCode {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => TypeCode::Nested,
            b'b' => TypeCode::I8,
            // '#' is an old alias some firmwares emit for unsigned bytes
            b'B' | b'#' => TypeCode::U8,
            b'c' => TypeCode::Char,
            b'd' => TypeCode::F64,
            b'f' => TypeCode::F32,
            b'F' => TypeCode::FourCC,
            b'G' => TypeCode::Guid,
            b'j' => TypeCode::I64,
            b'J' => TypeCode::U64,
            b'l' => TypeCode::I32,
            b'L' => TypeCode::U32,
            b'q' => TypeCode::Q15_16,
            b'Q' => TypeCode::Q31_32,
            b's' => TypeCode::I16,
            b'S' => TypeCode::U16,
            b'U' => TypeCode::UtcDate,
            b'?' => TypeCode::Complex,
            other => TypeCode::Unknown(other),
        }
    }

    pub fn to_u8(&self) -> u8 {
        match self {
            TypeCode::Nested => 0,
            TypeCode::I8 => b'b',
            TypeCode::U8 => b'B',
            TypeCode::Char => b'c',
            TypeCode::F64 => b'd',
            TypeCode::F32 => b'f',
            TypeCode::FourCC => b'F',
            TypeCode::Guid => b'G',
            TypeCode::I64 => b'j',
            TypeCode::U64 => b'J',
            TypeCode::I32 => b'l',
            TypeCode::U32 => b'L',
            TypeCode::Q15_16 => b'q',
            TypeCode::Q31_32 => b'Q',
            TypeCode::I16 => b's',
            TypeCode::U16 => b'S',
            TypeCode::UtcDate => b'U',
            TypeCode::Complex => b'?',
            TypeCode::Unknown(code) => *code,
        }
    }

    /// Canonical size of one element in bytes, or None for codes whose layout
    /// is defined elsewhere (containers, complex structs, unknown codes)
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            TypeCode::I8 | TypeCode::U8 | TypeCode::Char => Some(1),
            TypeCode::I16 | TypeCode::U16 => Some(2),
            TypeCode::I32 | TypeCode::U32 | TypeCode::F32 | TypeCode::FourCC | TypeCode::Q15_16 => Some(4),
            TypeCode::I64 | TypeCode::U64 | TypeCode::F64 | TypeCode::Q31_32 => Some(8),
            TypeCode::Guid | TypeCode::UtcDate => Some(16),
            TypeCode::Nested | TypeCode::Complex | TypeCode::Unknown(_) => None,
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, TypeCode::Nested)
    }

    /// Check if elements of this type decode to a number
    pub fn is_numeric(&self) -> bool {
        matches!(self,
            TypeCode::I8 | TypeCode::U8 | TypeCode::I16 | TypeCode::U16 |
            TypeCode::I32 | TypeCode::U32 | TypeCode::I64 | TypeCode::U64 |
            TypeCode::F32 | TypeCode::F64 | TypeCode::Q15_16 | TypeCode::Q31_32
        )
    }

    /// Check if elements of this type are text
    pub fn is_text(&self) -> bool {
        matches!(self, TypeCode::Char | TypeCode::UtcDate | TypeCode::FourCC)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeCode::Nested => "nested",
            TypeCode::I8 => "i8",
            TypeCode::U8 => "u8",
            TypeCode::Char => "char",
            TypeCode::F64 => "f64",
            TypeCode::F32 => "f32",
            TypeCode::FourCC => "fourcc",
            TypeCode::Guid => "guid",
            TypeCode::I64 => "i64",
            TypeCode::U64 => "u64",
            TypeCode::I32 => "i32",
            TypeCode::U32 => "u32",
            TypeCode::Q15_16 => "q15.16",
            TypeCode::Q31_32 => "q31.32",
            TypeCode::I16 => "i16",
            TypeCode::U16 => "u16",
            TypeCode::UtcDate => "utc_date",
            TypeCode::Complex => "complex",
            TypeCode::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCode::Nested => write!(f, "\\0"),
            other => write!(f, "{}", other.to_u8() as char),
        }
    }
}

/// Four byte tag identifying a KLV record
///
/// Tags are not required to be printable; `Display` replaces anything outside
/// printable ASCII with `.`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const fn new(bytes: &[u8; 4]) -> Self {
        FourCC(*bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
        Some(FourCC(array))
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn is_printable(&self) -> bool {
        self.0.iter().all(|b| (0x20..0x7f).contains(b))
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if (0x20..0x7f).contains(&b) { b as char } else { '.' };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({})", self)
    }
}

impl std::str::FromStr for FourCC {
    type Err = crate::error::TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 {
            return Err(crate::error::TelemetryError::Config(format!(
                "tag {:?} must be exactly 4 bytes", s
            )));
        }
        Ok(FourCC([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FourCC {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
