// src/container/boxes.rs
use crate::types::FourCC;
use byteorder::{BigEndian, ByteOrder};
use tracing::debug;

/// One size-prefixed box found by [`find_boxes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mp4Box {
    pub kind: FourCC,
    /// Offset of the box header
    pub start: usize,
    /// Offset one past the last byte of the box
    pub end: usize,
    /// Offset of the first byte after the header
    pub body: usize,
}

impl Mp4Box {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Walk the boxes laid end to end in `data[start..end]`
///
/// Handles 32-bit sizes, the 64-bit extended size (`size == 1`) and the
/// to-end-of-parent size (`size == 0`). A box whose declared size overruns
/// the range is clamped to it and ends the walk.
pub fn find_boxes(data: &[u8], start: usize, end: usize) -> Vec<Mp4Box> {
    let end = end.min(data.len());
    let mut boxes = Vec::new();
    let mut offset = start;

    while offset + 8 <= end {
        let size32 = BigEndian::read_u32(&data[offset..offset + 4]) as u64;
        let Some(kind) = FourCC::from_slice(&data[offset + 4..offset + 8]) else {
            break;
        };

        let (size, header) = match size32 {
            0 => ((end - offset) as u64, 8),
            1 => {
                if offset + 16 > end {
                    break;
                }
                (BigEndian::read_u64(&data[offset + 8..offset + 16]), 16)
            }
            n => (n, 8),
        };

        if size < header as u64 {
            debug!(offset, kind = %kind, size, "box size smaller than its header");
            break;
        }

        let box_end = offset.saturating_add(usize::try_from(size).unwrap_or(usize::MAX));
        let clamped = box_end > end;
        boxes.push(Mp4Box {
            kind,
            start: offset,
            end: box_end.min(end),
            body: (offset + header).min(end),
        });
        if clamped {
            debug!(offset, kind = %kind, size, "box overruns its parent");
            break;
        }
        offset = box_end;
    }
    boxes
}

/// First box of `kind` in a list
pub fn find_box(boxes: &[Mp4Box], kind: &[u8; 4]) -> Option<Mp4Box> {
    let kind = FourCC::new(kind);
    boxes.iter().find(|b| b.kind == kind).copied()
}
