// src/klv/writer.rs
use bytes::{BufMut, Bytes, BytesMut};
use crate::error::{TelemetryError, Result};
use crate::klv::header::{padded_length, TokenHeader};
use crate::types::{FourCC, TypeCode};

/// A primitive that can be written as a big-endian KLV element
pub trait KlvElement: Copy {
    const TYPE: TypeCode;
    fn put(&self, buffer: &mut BytesMut);
}

macro_rules! klv_element {
    ($ty:ty, $code:expr, $put:ident) => {
        impl KlvElement for $ty {
            const TYPE: TypeCode = $code;
            fn put(&self, buffer: &mut BytesMut) {
                buffer.$put(*self);
            }
        }
    };
}

klv_element!(i8, TypeCode::I8, put_i8);
klv_element!(u8, TypeCode::U8, put_u8);
klv_element!(i16, TypeCode::I16, put_i16);
klv_element!(u16, TypeCode::U16, put_u16);
klv_element!(i32, TypeCode::I32, put_i32);
klv_element!(u32, TypeCode::U32, put_u32);
klv_element!(i64, TypeCode::I64, put_i64);
klv_element!(u64, TypeCode::U64, put_u64);
klv_element!(f32, TypeCode::F32, put_f32);
klv_element!(f64, TypeCode::F64, put_f64);

/// Builder for KLV byte streams
///
/// Emits big-endian headers and payloads padded to the 4-byte boundary the
/// format requires. Containers are written through a closure that fills a
/// nested writer.
///
/// # Example
///
/// ```
/// use gpmf_telemetry::klv::{TokenReader, TokenWriter};
///
/// let mut writer = TokenWriter::new();
/// writer.write_container(b"DEVC", |devc| {
///     devc.write_str(b"DVNM", "Camera")?;
///     devc.write_samples::<i16>(b"ACCL", 3, &[1, 2, 3, 4, 5, 6])
/// }).unwrap();
///
/// let bytes = writer.into_bytes();
/// let devc = TokenReader::new(&bytes).next().unwrap();
/// assert!(devc.is_container());
/// assert_eq!(devc.children().count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct TokenWriter {
    buffer: BytesMut,
    token_count: usize,
}

impl TokenWriter {
    /// Create a new writer with default capacity (1024 bytes)
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        TokenWriter {
            buffer: BytesMut::with_capacity(capacity),
            token_count: 0,
        }
    }

    /// Write a token with an explicit header
    ///
    /// `payload` must be exactly `item_size * repeat` bytes long; padding is
    /// appended here.
    pub fn write_raw(
        &mut self,
        tag: &[u8; 4],
        type_code: TypeCode,
        item_size: u8,
        repeat: u16,
        payload: &[u8],
    ) -> Result<()> {
        let header = TokenHeader::new(FourCC::new(tag), type_code, item_size, repeat);
        if header.payload_len() != payload.len() {
            return Err(TelemetryError::PayloadSize {
                expected: header.payload_len(),
                found: payload.len(),
            });
        }
        self.put_token(header, payload);
        Ok(())
    }

    /// Write a token whose header is taken as-is, even when it disagrees with
    /// the payload length. Useful for producing deliberately malformed input.
    pub fn write_unchecked(&mut self, header: TokenHeader, payload: &[u8]) {
        self.put_token(header, payload);
    }

    /// Write `values` as `values.len() / per_item` items of `per_item`
    /// elements each
    pub fn write_samples<T: KlvElement>(&mut self, tag: &[u8; 4], per_item: usize, values: &[T]) -> Result<()> {
        let width = T::TYPE.fixed_size().unwrap_or(1);
        if per_item == 0 || values.len() % per_item != 0 {
            return Err(TelemetryError::PayloadSize {
                expected: per_item,
                found: values.len(),
            });
        }
        let item_size = Self::checked_item_size(per_item * width)?;
        let repeat = Self::checked_repeat(values.len() / per_item)?;

        let mut payload = BytesMut::with_capacity(values.len() * width);
        for value in values {
            value.put(&mut payload);
        }
        self.write_raw(tag, T::TYPE, item_size, repeat, &payload)
    }

    /// Write one element per item
    pub fn write_values<T: KlvElement>(&mut self, tag: &[u8; 4], values: &[T]) -> Result<()> {
        self.write_samples(tag, 1, values)
    }

    pub fn write_i16(&mut self, tag: &[u8; 4], values: &[i16]) -> Result<()> {
        self.write_values(tag, values)
    }

    pub fn write_i32(&mut self, tag: &[u8; 4], values: &[i32]) -> Result<()> {
        self.write_values(tag, values)
    }

    pub fn write_u32(&mut self, tag: &[u8; 4], values: &[u32]) -> Result<()> {
        self.write_values(tag, values)
    }

    pub fn write_u64(&mut self, tag: &[u8; 4], values: &[u64]) -> Result<()> {
        self.write_values(tag, values)
    }

    pub fn write_f32(&mut self, tag: &[u8; 4], values: &[f32]) -> Result<()> {
        self.write_values(tag, values)
    }

    /// Write an ASCII string as a `c` array
    pub fn write_str(&mut self, tag: &[u8; 4], value: &str) -> Result<()> {
        let repeat = Self::checked_repeat(value.len())?;
        self.write_raw(tag, TypeCode::Char, 1, repeat, value.as_bytes())
    }

    /// Write a `yymmddhhmmss.sss` UTC date
    pub fn write_utc_date(&mut self, tag: &[u8; 4], value: &str) -> Result<()> {
        let item_size = Self::checked_item_size(value.len())?;
        self.write_raw(tag, TypeCode::UtcDate, item_size, 1, value.as_bytes())
    }

    /// Write a nested container, filled by `build`
    pub fn write_container<F>(&mut self, tag: &[u8; 4], build: F) -> Result<()>
    where
        F: FnOnce(&mut TokenWriter) -> Result<()>,
    {
        let mut nested = TokenWriter::new();
        build(&mut nested)?;
        let payload = nested.into_bytes();
        let repeat = Self::checked_repeat(payload.len())?;
        self.write_raw(tag, TypeCode::Nested, 1, repeat, &payload)
    }

    /// Append already-encoded bytes verbatim
    pub fn extend_raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn byte_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }

    fn put_token(&mut self, header: TokenHeader, payload: &[u8]) {
        self.buffer.extend_from_slice(&header.to_bytes());
        self.buffer.extend_from_slice(payload);
        let padding = padded_length(payload.len()) - payload.len();
        self.buffer.put_bytes(0, padding);
        self.token_count += 1;
    }

    fn checked_item_size(size: usize) -> Result<u8> {
        u8::try_from(size).map_err(|_| TelemetryError::PayloadSize {
            expected: u8::MAX as usize,
            found: size,
        })
    }

    fn checked_repeat(repeat: usize) -> Result<u16> {
        u16::try_from(repeat).map_err(|_| TelemetryError::PayloadSize {
            expected: u16::MAX as usize,
            found: repeat,
        })
    }
}
