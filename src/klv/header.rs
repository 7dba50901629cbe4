// src/klv/header.rs
use crate::types::{FourCC, TypeCode};
use byteorder::{BigEndian, ByteOrder};

/// Fixed 8-byte KLV header: tag, type, item size, big-endian repeat count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenHeader {
    pub tag: FourCC,
    pub type_code: TypeCode,
    pub item_size: u8,
    pub repeat: u16,
}

impl TokenHeader {
    pub const SIZE: usize = 8;
    pub const ALIGNMENT: usize = 4;

    pub fn new(tag: FourCC, type_code: TypeCode, item_size: u8, repeat: u16) -> Self {
        TokenHeader { tag, type_code, item_size, repeat }
    }

    /// Parse a header from the start of `bytes`, or None if fewer than
    /// eight bytes remain
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let bytes = bytes.get(..Self::SIZE)?;
        Some(TokenHeader {
            tag: FourCC([bytes[0], bytes[1], bytes[2], bytes[3]]),
            type_code: TypeCode::from_u8(bytes[4]),
            item_size: bytes[5],
            repeat: BigEndian::read_u16(&bytes[6..8]),
        })
    }

    pub fn to_bytes(&self) -> [u8; 8] {
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(self.tag.as_bytes());
        bytes[4] = self.type_code.to_u8();
        bytes[5] = self.item_size;
        BigEndian::write_u16(&mut bytes[6..8], self.repeat);
        bytes
    }

    /// Logical payload length, `item_size * repeat`
    pub fn payload_len(&self) -> usize {
        self.item_size as usize * self.repeat as usize
    }

    /// Payload length rounded up to the next 4-byte boundary
    pub fn padded_len(&self) -> usize {
        padded_length(self.payload_len())
    }

    /// Total bytes this token occupies in the stream
    pub fn total_len(&self) -> usize {
        Self::SIZE + self.padded_len()
    }
}

pub fn padded_length(len: usize) -> usize {
    (len + TokenHeader::ALIGNMENT - 1) / TokenHeader::ALIGNMENT * TokenHeader::ALIGNMENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        let bytes = [b'G', b'P', b'S', b'5', b'l', 20, 0x00, 0x12];
        let header = TokenHeader::parse(&bytes).unwrap();
        assert_eq!(header.tag, FourCC::new(b"GPS5"));
        assert_eq!(header.type_code, TypeCode::I32);
        assert_eq!(header.item_size, 20);
        assert_eq!(header.repeat, 18);
        assert_eq!(header.payload_len(), 360);
        assert_eq!(header.to_bytes(), bytes);
    }

    #[test]
    fn test_short_header() {
        assert!(TokenHeader::parse(&[b'G', b'P', b'S', b'5', b'l', 20, 0]).is_none());
    }

    #[test]
    fn test_padding() {
        assert_eq!(padded_length(0), 0);
        assert_eq!(padded_length(1), 4);
        assert_eq!(padded_length(4), 4);
        assert_eq!(padded_length(7), 8);
        assert_eq!(padded_length(20), 20);

        let header = TokenHeader::new(FourCC::new(b"STNM"), TypeCode::Char, 1, 7);
        assert_eq!(header.padded_len(), 8);
        assert_eq!(header.total_len(), 16);
    }
}
