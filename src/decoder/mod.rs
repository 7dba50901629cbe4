// src/decoder/mod.rs
//! Stream decoding: tokens in, flat decoded records out

mod context;
mod stream;

pub use context::TypeContext;
pub use stream::{
    DecodeOutcome, DecodeStats, Decoded, DecodedRecord, SkippedToken, StreamDecoder, MAX_NESTING_DEPTH,
};
