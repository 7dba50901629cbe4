// src/klv/reader.rs
use crate::klv::{Token, TokenHeader};
use tracing::debug;

/// Lazy tokenizer over a flat KLV buffer
///
/// Yields tokens until the buffer is exhausted. A header or logical payload
/// that runs past the end of the buffer ends the sequence cleanly and sets
/// [`TokenReader::is_truncated`]; trailing padding missing from the final
/// token is tolerated.
///
/// # Example
///
/// ```
/// use gpmf_telemetry::klv::{TokenReader, TokenWriter};
///
/// let mut writer = TokenWriter::new();
/// writer.write_str(b"STNM", "GPS").unwrap();
/// writer.write_u32(b"TSMP", &[42]).unwrap();
/// let bytes = writer.into_bytes();
///
/// let tags: Vec<String> = TokenReader::new(&bytes).map(|t| t.tag().to_string()).collect();
/// assert_eq!(tags, vec!["STNM", "TSMP"]);
/// ```
#[derive(Debug, Clone)]
pub struct TokenReader<'a> {
    data: &'a [u8],
    position: usize,
    base: usize,
    truncated: bool,
}

impl<'a> TokenReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::at(data, 0)
    }

    /// Start (or restart) reading at `offset` within `data`
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        TokenReader {
            data,
            position: offset,
            base: 0,
            truncated: false,
        }
    }

    /// Reader over a container payload whose first byte sits at absolute
    /// offset `base` in the enclosing buffer
    pub(crate) fn nested(data: &'a [u8], base: usize) -> Self {
        TokenReader {
            data,
            position: 0,
            base,
            truncated: false,
        }
    }

    /// Absolute offset of the next token to be read
    pub fn offset(&self) -> usize {
        self.base + self.position
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }
}

impl<'a> Iterator for TokenReader<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.data.len() {
            return None;
        }

        let rest = &self.data[self.position..];
        let Some(header) = TokenHeader::parse(rest) else {
            debug!(offset = self.offset(), remaining = rest.len(), "partial KLV header at end of buffer");
            self.truncated = true;
            self.position = self.data.len();
            return None;
        };

        let payload_end = TokenHeader::SIZE + header.payload_len();
        if payload_end > rest.len() {
            debug!(
                offset = self.offset(),
                tag = %header.tag,
                needed = header.payload_len(),
                available = rest.len() - TokenHeader::SIZE,
                "KLV payload runs past end of buffer"
            );
            self.truncated = true;
            self.position = self.data.len();
            return None;
        }

        let token = Token {
            header,
            offset: self.offset(),
            payload: &rest[TokenHeader::SIZE..payload_end],
        };

        self.position = (self.position + header.total_len()).min(self.data.len());
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FourCC, TypeCode};

    fn raw_token(tag: &[u8; 4], type_code: u8, item_size: u8, repeat: u16, payload: &[u8]) -> Vec<u8> {
        let mut out = TokenHeader::new(FourCC::new(tag), TypeCode::from_u8(type_code), item_size, repeat)
            .to_bytes()
            .to_vec();
        out.extend_from_slice(payload);
        while out.len() % 4 != 0 {
            out.push(0);
        }
        out
    }

    #[test]
    fn test_reads_sequence_with_padding() {
        let mut data = raw_token(b"STNM", b'c', 1, 3, b"GPS");
        data.extend(raw_token(b"TSMP", b'L', 4, 1, &[0, 0, 0, 9]));

        let tokens: Vec<_> = TokenReader::new(&data).collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].payload, b"GPS");
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[1].offset, 12);
        assert_eq!(tokens[1].payload, &[0, 0, 0, 9]);
    }

    #[test]
    fn test_zero_length_tokens_advance() {
        let mut data = raw_token(b"EMPT", b'L', 0, 5, &[]);
        data.extend(raw_token(b"GPS5", b'l', 20, 0, &[]));
        data.extend(raw_token(b"TSMP", b'L', 4, 1, &[0, 0, 0, 1]));

        let offsets: Vec<usize> = TokenReader::new(&data).map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 8, 16]);
    }

    #[test]
    fn test_partial_header_is_end_of_stream() {
        let mut data = raw_token(b"TSMP", b'L', 4, 1, &[0, 0, 0, 1]);
        data.extend_from_slice(&[b'G', b'P', b'S']);

        let mut reader = TokenReader::new(&data);
        assert!(reader.next().is_some());
        assert!(reader.next().is_none());
        assert!(reader.is_truncated());
    }

    #[test]
    fn test_payload_past_end_is_end_of_stream() {
        let mut data = raw_token(b"TSMP", b'L', 4, 1, &[0, 0, 0, 1]);
        let header = TokenHeader::new(FourCC::new(b"ACCL"), TypeCode::I16, 6, 100);
        data.extend_from_slice(&header.to_bytes());
        data.extend_from_slice(&[0; 12]);

        let mut reader = TokenReader::new(&data);
        assert_eq!(reader.by_ref().count(), 1);
        assert!(reader.is_truncated());
    }

    #[test]
    fn test_missing_final_padding_tolerated() {
        let mut data = raw_token(b"STNM", b'c', 1, 3, b"GPS");
        data.truncate(11);

        let tokens: Vec<_> = TokenReader::new(&data).collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].payload, b"GPS");
    }

    #[test]
    fn test_restart_at_offset() {
        let mut data = raw_token(b"STNM", b'c', 1, 3, b"GPS");
        data.extend(raw_token(b"TSMP", b'L', 4, 1, &[0, 0, 0, 9]));

        let token = TokenReader::at(&data, 12).next().unwrap();
        assert_eq!(token.tag(), FourCC::new(b"TSMP"));
    }

    #[test]
    fn test_container_children_offsets() {
        let child = raw_token(b"TSMP", b'L', 4, 1, &[0, 0, 0, 9]);
        let mut data = raw_token(b"DEVC", 0, 1, child.len() as u16, &child);
        data.extend(raw_token(b"STNM", b'c', 1, 1, b"X"));

        let tokens: Vec<_> = TokenReader::new(&data).collect();
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].is_container());

        let children: Vec<_> = tokens[0].children().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].offset, 8);
        assert_eq!(children[0].tag(), FourCC::new(b"TSMP"));
        assert_eq!(tokens[1].offset, tokens[0].next_offset());
    }
}
