// src/payload/reader.rs
use crate::error::{TelemetryError, Result};
use crate::types::TypeCode;
use byteorder::{BigEndian, ReadBytesExt};
use smallvec::SmallVec;
use std::io::{Cursor, Read};

/// Big-endian element reads driven by a [`TypeCode`]
///
/// All GPMF payloads are big-endian. Fixed-point codes are converted to
/// `f64`; every integer code widens losslessly except 64-bit values above
/// 2^53.
pub struct PayloadReader;

impl PayloadReader {
    /// Read a single numeric element
    ///
    /// # Example
    ///
    /// ```
    /// use gpmf_telemetry::payload::PayloadReader;
    /// use gpmf_telemetry::types::TypeCode;
    /// use std::io::Cursor;
    ///
    /// let mut cursor = Cursor::new(vec![0xff, 0xfe]);
    /// let value = PayloadReader::read_number(&mut cursor, TypeCode::I16).unwrap();
    /// assert_eq!(value, -2.0);
    /// ```
    pub fn read_number<R: Read>(reader: &mut R, type_code: TypeCode) -> Result<f64> {
        let value = match type_code {
            TypeCode::I8 => reader.read_i8()? as f64,
            TypeCode::U8 => reader.read_u8()? as f64,
            TypeCode::I16 => reader.read_i16::<BigEndian>()? as f64,
            TypeCode::U16 => reader.read_u16::<BigEndian>()? as f64,
            TypeCode::I32 => reader.read_i32::<BigEndian>()? as f64,
            TypeCode::U32 => reader.read_u32::<BigEndian>()? as f64,
            TypeCode::I64 => reader.read_i64::<BigEndian>()? as f64,
            TypeCode::U64 => reader.read_u64::<BigEndian>()? as f64,
            TypeCode::F32 => reader.read_f32::<BigEndian>()? as f64,
            TypeCode::F64 => reader.read_f64::<BigEndian>()?,
            TypeCode::Q15_16 => reader.read_i32::<BigEndian>()? as f64 / 65536.0,
            TypeCode::Q31_32 => reader.read_i64::<BigEndian>()? as f64 / 4294967296.0,
            other => return Err(TelemetryError::UnsupportedType(format!("{} is not numeric", other.name()))),
        };
        Ok(value)
    }

    /// Read `count` consecutive numeric elements from the start of `payload`
    ///
    /// Fails with [`TelemetryError::PayloadSize`] when the payload is too
    /// short; extra trailing bytes are ignored.
    pub fn read_numbers(payload: &[u8], type_code: TypeCode, count: usize) -> Result<SmallVec<[f64; 4]>> {
        let width = Self::element_width(type_code)?;
        let needed = width * count;
        if payload.len() < needed {
            return Err(TelemetryError::PayloadSize {
                expected: needed,
                found: payload.len(),
            });
        }

        let mut cursor = Cursor::new(&payload[..needed]);
        let mut values = SmallVec::with_capacity(count);
        for _ in 0..count {
            values.push(Self::read_number(&mut cursor, type_code)?);
        }
        Ok(values)
    }

    /// Width of one element, or an error for codes without a fixed width
    pub fn element_width(type_code: TypeCode) -> Result<usize> {
        type_code
            .fixed_size()
            .ok_or_else(|| TelemetryError::UnsupportedType(format!("{} has no fixed width", type_code.name())))
    }

    /// Read `len` raw bytes
    pub fn read_bytes<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; len];
        reader.read_exact(&mut bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_signed_big_endian() {
        let data = [0x00, 0x00, 0x00, 0x02, 0xff, 0xff, 0xff, 0xfe];
        let values = PayloadReader::read_numbers(&data, TypeCode::I32, 2).unwrap();
        assert_eq!(values.as_slice(), &[2.0, -2.0]);
    }

    #[test]
    fn test_read_unsigned() {
        let data = [0xff, 0xfe];
        let values = PayloadReader::read_numbers(&data, TypeCode::U16, 1).unwrap();
        assert_eq!(values[0], 65534.0);

        let values = PayloadReader::read_numbers(&[200], TypeCode::U8, 1).unwrap();
        assert_eq!(values[0], 200.0);
    }

    #[test]
    fn test_read_floats() {
        let mut data = 1.5f32.to_be_bytes().to_vec();
        data.extend_from_slice(&(-0.25f64).to_be_bytes());
        let mut cursor = Cursor::new(data);
        assert_eq!(PayloadReader::read_number(&mut cursor, TypeCode::F32).unwrap(), 1.5);
        assert_eq!(PayloadReader::read_number(&mut cursor, TypeCode::F64).unwrap(), -0.25);
    }

    #[test]
    fn test_read_fixed_point() {
        let data = (3 * 65536 + 32768i32).to_be_bytes();
        let values = PayloadReader::read_numbers(&data, TypeCode::Q15_16, 1).unwrap();
        assert!((values[0] - 3.5).abs() < 1e-12);

        let data = (-(1i64 << 32)).to_be_bytes();
        let values = PayloadReader::read_numbers(&data, TypeCode::Q31_32, 1).unwrap();
        assert_eq!(values[0], -1.0);
    }

    #[test]
    fn test_short_payload() {
        let err = PayloadReader::read_numbers(&[0, 1, 2], TypeCode::I16, 2).unwrap_err();
        assert!(matches!(err, TelemetryError::PayloadSize { expected: 4, found: 3 }));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let mut cursor = Cursor::new(vec![b'a']);
        assert!(PayloadReader::read_number(&mut cursor, TypeCode::Char).is_err());
        assert!(PayloadReader::read_numbers(&[0; 4], TypeCode::Complex, 1).is_err());
    }

    #[test]
    fn test_zero_count() {
        let values = PayloadReader::read_numbers(&[], TypeCode::I32, 0).unwrap();
        assert!(values.is_empty());
    }
}
