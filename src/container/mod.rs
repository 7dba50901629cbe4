// src/container/mod.rs
//! Minimal MP4 helpers: box walk, highlight markers and camera serial
//!
//! This is not a general MP4 parser; it reads only what the report needs
//! from an in-memory container.

pub(crate) mod boxes;
mod highlights;
mod serial;

pub use boxes::{find_box, find_boxes, Mp4Box};
pub use highlights::highlights;
pub use serial::{camera_serial, SERIAL_SEARCH_WINDOW};
