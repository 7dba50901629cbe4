// src/klv/mod.rs
//! KLV token layer
//!
//! - [`TokenReader`] splits a buffer into [`Token`]s without interpreting them
//! - [`TokenWriter`] builds KLV streams, mostly for tests and tooling

mod header;
mod reader;
mod token;
mod writer;

pub use header::{padded_length, TokenHeader};
pub use reader::TokenReader;
pub use token::Token;
pub use writer::{KlvElement, TokenWriter};
