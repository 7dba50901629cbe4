// src/decoder/stream.rs
use crate::config::DecodeOptions;
use crate::decoder::TypeContext;
use crate::klv::{Token, TokenReader};
use crate::registry::{DecodedValue, Registry, Strategy};
use crate::types::FourCC;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Containers nested deeper than this are skipped instead of walked
pub const MAX_NESTING_DEPTH: usize = 32;

/// One decoded leaf token, in source order
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub tag: FourCC,
    pub value: DecodedValue,
    /// Number of enclosing containers
    pub depth: usize,
    /// Absolute header offset in the decoded buffer
    pub offset: usize,
}

/// A token that was dropped because its payload failed to decode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedToken {
    pub tag: FourCC,
    pub offset: usize,
    pub reason: String,
}

/// Result of decoding one leaf token
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    Decoded(DecodedRecord),
    Ignored,
    Skipped(SkippedToken),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodeStats {
    /// Every token read, containers included
    pub tokens: usize,
    pub containers: usize,
    /// Leaf records produced with a value
    pub decoded: usize,
    /// Leaf records whose tag has no binding
    pub unknown: usize,
    pub ignored: usize,
    pub skipped: Vec<SkippedToken>,
    /// Set when any token sequence ended on a partial header or payload
    pub truncated: bool,
}

impl DecodeStats {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Flattened output of one decode pass
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub records: Vec<DecodedRecord>,
    pub stats: DecodeStats,
}

/// Drives the token reader and the registry over a whole buffer
///
/// # Example
///
/// ```
/// use gpmf_telemetry::decoder::StreamDecoder;
/// use gpmf_telemetry::klv::TokenWriter;
///
/// let mut writer = TokenWriter::new();
/// writer.write_container(b"DEVC", |devc| {
///     devc.write_str(b"STNM", "Accelerometer")?;
///     devc.write_i16(b"SCAL", &[418])
/// }).unwrap();
///
/// let decoded = StreamDecoder::new().decode(writer.as_bytes());
/// assert_eq!(decoded.records.len(), 2);
/// assert_eq!(decoded.records[0].depth, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StreamDecoder {
    registry: Registry,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::with_registry(Registry::new())
    }

    pub fn with_registry(registry: Registry) -> Self {
        StreamDecoder { registry }
    }

    /// Decoder whose ignore set comes from `options`
    pub fn from_options(options: &DecodeOptions) -> Self {
        let mut registry = Registry::new();
        if let Some(tags) = &options.ignored_tags {
            registry.set_ignored(tags.iter().copied());
        }
        Self::with_registry(registry)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Decode every token of `data`, flattening containers depth-first
    pub fn decode(&self, data: &[u8]) -> Decoded {
        let mut out = Decoded::default();
        let mut reader = TokenReader::new(data);
        self.walk(&mut reader, 0, &mut out);

        info!(
            tokens = out.stats.tokens,
            records = out.records.len(),
            skipped = out.stats.skipped.len(),
            truncated = out.stats.truncated,
            "decode pass complete"
        );
        out
    }

    /// Decode one leaf token against the companion context of its container
    pub fn decode_token(&self, token: &Token<'_>, depth: usize, context: &TypeContext) -> DecodeOutcome {
        let tag = token.tag();
        if self.registry.strategy(tag) == Strategy::Ignore {
            return DecodeOutcome::Ignored;
        }

        match self.registry.decode(token, context.type_string()) {
            Ok(value) => DecodeOutcome::Decoded(DecodedRecord {
                tag,
                value,
                depth,
                offset: token.offset,
            }),
            Err(e) => DecodeOutcome::Skipped(SkippedToken {
                tag,
                offset: token.offset,
                reason: e.to_string(),
            }),
        }
    }

    fn walk(&self, reader: &mut TokenReader<'_>, depth: usize, out: &mut Decoded) {
        let mut context = TypeContext::new();

        for token in reader.by_ref() {
            out.stats.tokens += 1;

            if token.is_container() {
                out.stats.containers += 1;
                if depth >= MAX_NESTING_DEPTH {
                    self.skip(
                        out,
                        SkippedToken {
                            tag: token.tag(),
                            offset: token.offset,
                            reason: format!("container nested deeper than {}", MAX_NESTING_DEPTH),
                        },
                    );
                    continue;
                }
                debug!(tag = %token.tag(), offset = token.offset, depth, "entering container");
                let mut children = token.children();
                self.walk(&mut children, depth + 1, out);
                continue;
            }

            match self.decode_token(&token, depth, &context) {
                DecodeOutcome::Decoded(record) => {
                    debug!(tag = %record.tag, offset = record.offset, kind = record.value.kind(), "decoded token");
                    context.observe(record.tag, &record.value);
                    if self.registry.strategy(record.tag) == Strategy::Unknown {
                        out.stats.unknown += 1;
                    } else {
                        out.stats.decoded += 1;
                    }
                    out.records.push(record);
                }
                DecodeOutcome::Ignored => out.stats.ignored += 1,
                DecodeOutcome::Skipped(skipped) => self.skip(out, skipped),
            }
        }

        if reader.is_truncated() {
            out.stats.truncated = true;
        }
    }

    fn skip(&self, out: &mut Decoded, skipped: SkippedToken) {
        warn!(tag = %skipped.tag, offset = skipped.offset, reason = %skipped.reason, "skipping token");
        out.stats.skipped.push(skipped);
    }
}
