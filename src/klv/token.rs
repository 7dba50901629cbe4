// src/klv/token.rs
use crate::klv::{TokenHeader, TokenReader};
use crate::types::{FourCC, TypeCode};

/// One KLV record borrowed from the input buffer
///
/// `payload` holds exactly `item_size * repeat` bytes; the alignment padding
/// that follows it on disk is never part of the slice.
#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
    pub header: TokenHeader,
    /// Absolute offset of the header within the top-level buffer
    pub offset: usize,
    pub payload: &'a [u8],
}

impl<'a> Token<'a> {
    pub fn tag(&self) -> FourCC {
        self.header.tag
    }

    pub fn type_code(&self) -> TypeCode {
        self.header.type_code
    }

    pub fn item_size(&self) -> usize {
        self.header.item_size as usize
    }

    pub fn repeat(&self) -> usize {
        self.header.repeat as usize
    }

    pub fn is_container(&self) -> bool {
        self.header.type_code.is_nested()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Offset of the token following this one at the same nesting level
    pub fn next_offset(&self) -> usize {
        self.offset + self.header.total_len()
    }

    /// Re-tokenize the payload of a container token
    pub fn children(&self) -> TokenReader<'a> {
        TokenReader::nested(self.payload, self.offset + TokenHeader::SIZE)
    }
}
