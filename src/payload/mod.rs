// src/payload/mod.rs
//! Primitive payload decoding
//!
//! [`PayloadReader`] turns raw big-endian element bytes into numbers;
//! the text helpers in this module handle the null-padded ASCII fields the
//! format uses for names, units and dates.

mod reader;

pub use reader::PayloadReader;

/// Decode null-padded ASCII, replacing invalid bytes and stripping `\0`
/// padding from both ends
pub fn decode_packed_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_matches('\0').to_string()
}

/// Strict variant of [`decode_packed_string`] that rejects invalid UTF-8
pub fn decode_packed_string_strict(bytes: &[u8]) -> crate::Result<String> {
    std::str::from_utf8(bytes)
        .map(|s| s.trim_matches('\0').to_string())
        .map_err(|_| crate::TelemetryError::InvalidUtf8)
}
