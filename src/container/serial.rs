// src/container/serial.rs

/// Bytes of the container searched for the serial
pub const SERIAL_SEARCH_WINDOW: usize = 200;

const MARKER: &[u8] = b"GoPro";

/// Camera serial: the first run of ASCII digits followed by one arbitrary
/// byte and `GoPro`, within the first [`SERIAL_SEARCH_WINDOW`] bytes
pub fn camera_serial(data: &[u8]) -> Option<String> {
    let window = &data[..data.len().min(SERIAL_SEARCH_WINDOW)];

    let mut search = 0;
    while let Some(found) = find(&window[search..], MARKER) {
        let marker = search + found;
        search = marker + 1;

        // one separator byte, then at least one digit before it
        if marker < 2 || window[marker - 1] == b'\n' {
            continue;
        }
        let digits_end = marker - 1;
        let digits_start = window[..digits_end]
            .iter()
            .rposition(|b| !b.is_ascii_digit())
            .map_or(0, |p| p + 1);
        if digits_start < digits_end {
            return Some(String::from_utf8_lossy(&window[digits_start..digits_end]).into_owned());
        }
    }
    None
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
