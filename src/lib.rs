// src/lib.rs
//! # gpmf-telemetry
//!
//! Decoder for the GPMF telemetry track that action cameras embed next to
//! their video: GPS fixes, accelerometer, gyroscope, gravity, magnetometer
//! and orientation data stored as nested tag-length-value (KLV) records.
//!
//! ## Features
//!
//! - **Tokenizer**: zero-copy KLV reader that survives truncated input
//! - **Typed payloads**: a closed registry of decode strategies per tag
//! - **Resilient**: a malformed record is skipped, never fatal to the pass
//! - **Composition**: scaled, polarity-corrected samples bucketed by capture time
//! - **Batch decoding**: independent buffers decoded on worker threads
//!
//! ## Pipeline
//!
//! ```text
//! bytes -> TokenReader -> Registry -> StreamDecoder -> Composer -> TelemetryReport
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gpmf_telemetry::*;
//!
//! fn main() -> Result<()> {
//!     let options = DecodeOptions { skip_bad_fix: true, ..DecodeOptions::default() };
//!     let report = decode_source(&DumpFile::new("GH010001.bin"), &options)?;
//!
//!     println!("{} GPS points", report.gps.points.len());
//!     println!("{} sensor samples at {:?} fps", report.streams.samples.len(), report.streams.fps);
//!     std::fs::write("GH010001.json", report.to_json()?)?;
//!     Ok(())
//! }
//! ```
//!
//! ### Walking tokens directly
//!
//! ```rust
//! use gpmf_telemetry::klv::{TokenReader, TokenWriter};
//!
//! let mut writer = TokenWriter::new();
//! writer.write_container(b"DEVC", |devc| devc.write_str(b"DVNM", "Camera")).unwrap();
//!
//! let devc = TokenReader::new(writer.as_bytes()).next().unwrap();
//! assert!(devc.is_container());
//! assert_eq!(devc.children().count(), 1);
//! ```

// Modules
pub mod error;
pub mod types;
pub mod klv;
pub mod payload;
pub mod registry;
pub mod decoder;
pub mod composer;
pub mod config;
pub mod container;
pub mod source;
pub mod report;
pub mod batch;

// Re-export commonly used types at the crate root for convenience
pub use error::{TelemetryError, Result};

pub use types::{FourCC, TypeCode};

pub use klv::{Token, TokenHeader, TokenReader, TokenWriter};

pub use registry::{DecodedValue, FieldValue, Registry, Strategy, StructKind, StructRecord, Wxyz, Xyz};

pub use decoder::{DecodeOutcome, DecodeStats, Decoded, DecodedRecord, SkippedToken, StreamDecoder};

pub use composer::{
    AxisVector,
    Composer,
    Composition,
    GpsPoint,
    GpsStats,
    PolarityTable,
    ScaleContext,
    SensorSample,
    Stream,
};

pub use config::DecodeOptions;

pub use source::{DumpFile, MetadataSource, RawMetadata};

#[cfg(feature = "mmap")]
pub use source::MappedDump;

pub use report::{decode_buffer, decode_metadata, decode_source, GpsReport, TelemetryReport};

// Prelude module for glob imports
pub mod prelude {
    //! Convenient imports for common use cases.
    //!
    //! ```rust
    //! use gpmf_telemetry::prelude::*;
    //! ```

    pub use crate::error::{TelemetryError, Result};
    pub use crate::config::DecodeOptions;
    pub use crate::report::{decode_buffer, decode_source, TelemetryReport};
    pub use crate::source::{DumpFile, MetadataSource};
    pub use crate::types::FourCC;
}

/// The library version
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
