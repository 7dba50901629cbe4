// tests/container_tests.rs
use gpmf_telemetry::container::{camera_serial, find_box, find_boxes, highlights};
use gpmf_telemetry::*;

fn mp4_box(kind: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = ((body.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(kind);
    out.extend_from_slice(body);
    out
}

fn camera_file(markers: &[u32]) -> Vec<u8> {
    let mut gpmf = b"CASN".to_vec();
    gpmf.extend_from_slice(b"HighlighHLMT");
    for ms in markers {
        gpmf.extend_from_slice(&ms.to_be_bytes());
        gpmf.extend_from_slice(&[0; 12]);
        gpmf.extend_from_slice(b"MANL");
    }

    let mut ftyp = b"mp41".to_vec();
    ftyp.extend_from_slice(b"C3441325092871 GoPro MAX ");
    ftyp.resize(32, 0);

    let mut moov = mp4_box(b"mvhd", &[0; 12]);
    moov.extend(mp4_box(b"udta", &mp4_box(b"GPMF", &gpmf)));

    let mut data = mp4_box(b"ftyp", &ftyp);
    data.extend(mp4_box(b"moov", &moov));
    data.extend(mp4_box(b"mdat", &[0; 64]));
    data
}

#[test]
fn test_top_level_walk() {
    let data = camera_file(&[]);
    let kinds: Vec<String> = find_boxes(&data, 0, data.len()).iter().map(|b| b.kind.to_string()).collect();
    assert_eq!(kinds, vec!["ftyp", "moov", "mdat"]);
    let mdat = find_box(&find_boxes(&data, 0, data.len()), b"mdat").unwrap();
    assert_eq!(mdat.end, data.len());
}

#[test]
fn test_highlights_and_serial() {
    let data = camera_file(&[2500, 61000]);
    assert_eq!(highlights(&data).unwrap(), vec![2500, 61000]);
    assert_eq!(camera_serial(&data).as_deref(), Some("3441325092871"));
}

#[test]
fn test_report_with_container() {
    let report = TelemetryReport::default().with_container(&camera_file(&[1000]));
    assert_eq!(report.anchors, vec![1000]);
    assert_eq!(report.camera.as_deref(), Some("3441325092871"));
}

#[test]
fn test_non_mp4_is_rejected() {
    let data = mp4_box(b"moov", &[]);
    assert!(matches!(highlights(&data), Err(TelemetryError::NotMp4)));
}

#[test]
fn test_missing_udta() {
    let mut data = mp4_box(b"ftyp", b"mp41");
    data.extend(mp4_box(b"moov", &mp4_box(b"mvhd", &[0; 4])));
    match highlights(&data) {
        Err(TelemetryError::BoxNotFound(path)) => assert_eq!(path, "moov/udta"),
        other => panic!("Expected BoxNotFound, got {:?}", other),
    }
}
