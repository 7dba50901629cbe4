// src/container/highlights.rs
use crate::container::boxes::{find_box, find_boxes};
use crate::error::{TelemetryError, Result};
use byteorder::{BigEndian, ByteOrder};
use tracing::debug;

const WORD: usize = 4;
/// Distance from a marker value back to the `MANL` that follows it
const MARKER_OFFSET: usize = 16;

/// Highlight markers (HiLight tags) stored in `moov/udta/GPMF`, in
/// milliseconds from the start of the recording
///
/// Fails with [`TelemetryError::NotMp4`] when the data does not start with
/// an `ftyp` box and [`TelemetryError::BoxNotFound`] when one of the boxes
/// on the path is missing.
pub fn highlights(data: &[u8]) -> Result<Vec<u64>> {
    let top = find_boxes(data, 0, data.len());
    match top.first() {
        Some(first) if first.kind.as_bytes() == b"ftyp" => {}
        _ => return Err(TelemetryError::NotMp4),
    }

    let moov = find_box(&top, b"moov").ok_or_else(|| TelemetryError::BoxNotFound("moov".into()))?;
    let udta = find_box(&find_boxes(data, moov.body, moov.end), b"udta")
        .ok_or_else(|| TelemetryError::BoxNotFound("moov/udta".into()))?;
    let gpmf = find_box(&find_boxes(data, udta.body, udta.end), b"GPMF")
        .ok_or_else(|| TelemetryError::BoxNotFound("moov/udta/GPMF".into()))?;

    let markers = scan_markers(data, gpmf.body, gpmf.end);
    debug!(count = markers.len(), "highlight markers");
    Ok(markers)
}

/// Scan `data[start..end]` word by word for the `Highligh` block, then
/// `HLMT`, then read the marker preceding every `MANL`
fn scan_markers(data: &[u8], start: usize, end: usize) -> Vec<u64> {
    let mut in_highlights = false;
    let mut in_hlmt = false;
    let mut markers = Vec::new();
    let mut pos = start;

    while pos + WORD <= end {
        let mut word = &data[pos..pos + WORD];
        pos += WORD;

        if word == b"High" && !in_highlights {
            if pos + WORD > end {
                break;
            }
            word = &data[pos..pos + WORD];
            pos += WORD;
            if word == b"ligh" {
                in_highlights = true;
            }
        }

        if word == b"HLMT" && in_highlights && !in_hlmt {
            in_hlmt = true;
        }

        if word == b"MANL" && in_highlights && in_hlmt {
            let manl = pos - WORD;
            if let Some(at) = manl.checked_sub(MARKER_OFFSET) {
                let marker = BigEndian::read_u32(&data[at..at + WORD]);
                if marker != 0 {
                    markers.push(marker as u64);
                }
            }
        }
    }
    markers
}
