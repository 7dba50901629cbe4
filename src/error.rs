// src/error.rs
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Truncated data at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated { offset: usize, needed: usize, available: usize },

    #[error("Invalid length for {tag} vector: item size {item_size} is not {expected}")]
    VectorSize { tag: String, item_size: usize, expected: String },

    #[error("Unsupported element type: {0}")]
    UnsupportedType(String),

    #[error("Payload size mismatch: expected {expected} bytes, found {found}")]
    PayloadSize { expected: usize, found: usize },

    #[error("Invalid timestamp text: {0:?}")]
    InvalidTimestamp(String),

    #[error("Invalid UTF-8 in string data")]
    InvalidUtf8,

    #[error("File is not an MP4 container")]
    NotMp4,

    #[error("Box not found: {0}")]
    BoxNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
