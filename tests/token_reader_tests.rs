// tests/token_reader_tests.rs
use gpmf_telemetry::klv::padded_length;
use gpmf_telemetry::*;

fn header(tag: &[u8; 4], type_code: u8, item_size: u8, repeat: u16) -> [u8; 8] {
    TokenHeader::new(FourCC::new(tag), TypeCode::from_u8(type_code), item_size, repeat).to_bytes()
}

#[test]
fn test_offsets_follow_padding() {
    let mut writer = TokenWriter::new();
    writer.write_str(b"STNM", "GPS").unwrap(); // 3 bytes -> padded 4
    writer.write_i16(b"SCAL", &[1, 2, 3]).unwrap(); // 6 bytes -> padded 8
    writer.write_u32(b"TSMP", &[9]).unwrap(); // 4 bytes
    let bytes = writer.into_bytes();

    let tokens: Vec<Token> = TokenReader::new(&bytes).collect();
    assert_eq!(tokens.len(), 3);
    for pair in tokens.windows(2) {
        let len = pair[0].item_size() * pair[0].repeat();
        assert_eq!(pair[1].offset, pair[0].offset + 8 + padded_length(len));
    }
    assert_eq!(tokens.iter().map(|t| t.offset).collect::<Vec<_>>(), vec![0, 12, 28]);
}

#[test]
fn test_zero_length_tokens_advance() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&header(b"EMPT", b'L', 0, 12));
    bytes.extend_from_slice(&header(b"GPS5", b'l', 20, 0));
    bytes.extend_from_slice(&header(b"TSMP", b'L', 4, 1));
    bytes.extend_from_slice(&7u32.to_be_bytes());

    let mut reader = TokenReader::new(&bytes);
    let first = reader.next().unwrap();
    assert!(first.is_empty());
    assert_eq!(reader.offset(), 8);
    let second = reader.next().unwrap();
    assert!(second.is_empty());
    assert_eq!(second.offset, 8);
    let third = reader.next().unwrap();
    assert_eq!(third.payload, &7u32.to_be_bytes());
    assert!(reader.next().is_none());
    assert!(!reader.is_truncated());
}

#[test]
fn test_restart_at_offset() {
    let mut writer = TokenWriter::new();
    writer.write_u32(b"DVID", &[1]).unwrap();
    writer.write_u32(b"TSMP", &[2]).unwrap();
    let bytes = writer.into_bytes();

    let first_pass: Vec<Token> = TokenReader::new(&bytes).collect();
    let restarted: Vec<Token> = TokenReader::at(&bytes, first_pass[1].offset).collect();
    assert_eq!(restarted.len(), 1);
    assert_eq!(restarted[0].tag(), FourCC::new(b"TSMP"));
    assert_eq!(restarted[0].offset, 12);
}

#[test]
fn test_trailing_garbage_ends_cleanly() {
    let mut writer = TokenWriter::new();
    writer.write_u32(b"TSMP", &[2]).unwrap();
    writer.extend_raw(&[0x41, 0x43, 0x43]);
    let bytes = writer.into_bytes();

    let mut reader = TokenReader::new(&bytes);
    assert_eq!(reader.by_ref().count(), 1);
    assert!(reader.is_truncated());
}

#[test]
fn test_unpadded_final_token() {
    let mut bytes = header(b"STNM", b'c', 1, 5).to_vec();
    bytes.extend_from_slice(b"GYROS");

    let tokens: Vec<Token> = TokenReader::new(&bytes).collect();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].payload, b"GYROS");
}

#[test]
fn test_nested_containers() {
    let mut writer = TokenWriter::new();
    writer
        .write_container(b"DEVC", |devc| {
            devc.write_u32(b"DVID", &[1])?;
            devc.write_container(b"STRM", |strm| strm.write_str(b"STNM", "GPS"))
        })
        .unwrap();
    let bytes = writer.into_bytes();

    let devc = TokenReader::new(&bytes).next().unwrap();
    assert!(devc.is_container());
    let children: Vec<Token> = devc.children().collect();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].offset, 8);
    let strm = children[1];
    assert!(strm.is_container());
    let grandchild = strm.children().next().unwrap();
    assert_eq!(grandchild.offset, strm.offset + 8);
    assert_eq!(grandchild.tag(), FourCC::new(b"STNM"));
}

#[test]
fn test_unknown_type_code_still_tokenized() {
    let mut bytes = header(b"WHAT", b'z', 2, 2).to_vec();
    bytes.extend_from_slice(&[1, 2, 3, 4]);
    let token = TokenReader::new(&bytes).next().unwrap();
    assert_eq!(token.type_code(), TypeCode::Unknown(b'z'));
    assert_eq!(token.payload.len(), 4);
}
