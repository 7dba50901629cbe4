// src/registry/decode.rs
use crate::error::{TelemetryError, Result};
use crate::klv::Token;
use crate::payload::{decode_packed_string, PayloadReader};
use crate::registry::value::{DecodedValue, FieldValue, StructRecord, Wxyz, Xyz};
use crate::registry::{Strategy, StructKind, GPS_FIX_FIELDS};
use crate::types::TypeCode;
use chrono::NaiveDateTime;
use std::io::Cursor;

pub(super) fn apply(strategy: Strategy, token: &Token<'_>, companion_type: Option<&str>) -> Result<DecodedValue> {
    match strategy {
        Strategy::Raw => Ok(DecodedValue::Raw(token.payload.to_vec())),
        Strategy::Scalar => scalar(token),
        Strategy::SingleScalar => {
            if token.repeat() == 1 {
                scalar(token)
            } else {
                Ok(DecodedValue::Absent)
            }
        }
        Strategy::Float => float(token),
        Strategy::Vector => vector(token),
        Strategy::Xyz => xyz(token),
        Strategy::Wxyz => wxyz(token),
        Strategy::Text => Ok(DecodedValue::Text(decode_packed_string(token.payload))),
        Strategy::Timestamp => timestamp(token),
        Strategy::GpsFix => gps_fix(token),
        Strategy::Struct(kind) => structure(kind, token, companion_type),
        Strategy::Units => units(token),
        Strategy::Ignore | Strategy::Unknown => Ok(DecodedValue::Absent),
    }
}

fn scalar(token: &Token<'_>) -> Result<DecodedValue> {
    if token.is_empty() {
        return Ok(DecodedValue::Absent);
    }
    let type_code = token.type_code();
    if type_code.is_numeric() {
        let values = PayloadReader::read_numbers(token.payload, type_code, 1)?;
        return Ok(DecodedValue::Float(values[0]));
    }
    match type_code {
        TypeCode::Char => Ok(DecodedValue::Text(decode_packed_string(&token.payload[..1]))),
        TypeCode::FourCC => {
            let bytes = token.payload.get(..4).ok_or(TelemetryError::PayloadSize {
                expected: 4,
                found: token.payload.len(),
            })?;
            Ok(DecodedValue::Text(decode_packed_string(bytes)))
        }
        TypeCode::UtcDate => timestamp(token),
        other => Err(TelemetryError::UnsupportedType(format!(
            "{} cannot be read as a scalar for {}",
            other.name(),
            token.tag()
        ))),
    }
}

fn float(token: &Token<'_>) -> Result<DecodedValue> {
    if token.is_empty() {
        return Ok(DecodedValue::Absent);
    }
    let values = PayloadReader::read_numbers(token.payload, token.type_code(), 1)?;
    Ok(DecodedValue::Float(values[0]))
}

fn vector(token: &Token<'_>) -> Result<DecodedValue> {
    if token.is_empty() {
        return Ok(DecodedValue::Absent);
    }
    let width = PayloadReader::element_width(token.type_code())?;
    let count = token.payload.len() / width;
    let values = PayloadReader::read_numbers(token.payload, token.type_code(), count)?;
    if values.len() == 1 {
        Ok(DecodedValue::Float(values[0]))
    } else {
        Ok(DecodedValue::Vector(values))
    }
}

/// Check a fixed-vector item size: `components` elements per item, or the
/// doubled encoding some firmwares write
fn check_vector_size(token: &Token<'_>, components: usize) -> Result<usize> {
    let width = PayloadReader::element_width(token.type_code())?;
    let single = components * width;
    if token.item_size() != single && token.item_size() != 2 * single {
        return Err(TelemetryError::VectorSize {
            tag: token.tag().to_string(),
            item_size: token.item_size(),
            expected: format!("{} or {}", single, 2 * single),
        });
    }
    Ok(width)
}

fn xyz(token: &Token<'_>) -> Result<DecodedValue> {
    if token.is_empty() {
        return Ok(DecodedValue::Absent);
    }
    check_vector_size(token, 3)?;
    let v = PayloadReader::read_numbers(token.payload, token.type_code(), 3)?;
    Ok(DecodedValue::Xyz(Xyz { x: v[0], y: v[1], z: v[2] }))
}

fn wxyz(token: &Token<'_>) -> Result<DecodedValue> {
    if token.is_empty() {
        return Ok(DecodedValue::Absent);
    }
    check_vector_size(token, 4)?;
    let v = PayloadReader::read_numbers(token.payload, token.type_code(), 4)?;
    Ok(DecodedValue::Wxyz(Wxyz { w: v[0], x: v[1], y: v[2], z: v[3] }))
}

/// Parse `yymmddhhmmss.sss`
pub(crate) fn parse_utc_date(text: &str) -> Result<NaiveDateTime> {
    let bytes = text.as_bytes();
    let well_formed = bytes.len() >= 14
        && bytes[..12].iter().all(u8::is_ascii_digit)
        && bytes[12] == b'.'
        && bytes[13..].iter().all(u8::is_ascii_digit);
    if !well_formed {
        return Err(TelemetryError::InvalidTimestamp(text.to_string()));
    }
    NaiveDateTime::parse_from_str(text, "%y%m%d%H%M%S%.f")
        .map_err(|_| TelemetryError::InvalidTimestamp(text.to_string()))
}

fn timestamp(token: &Token<'_>) -> Result<DecodedValue> {
    if token.is_empty() {
        return Ok(DecodedValue::Absent);
    }
    let text = decode_packed_string(token.payload);
    Ok(DecodedValue::Timestamp(parse_utc_date(&text)?))
}

fn gps_fix(token: &Token<'_>) -> Result<DecodedValue> {
    if token.is_empty() {
        return Ok(DecodedValue::Struct(StructRecord::zeroed(&GPS_FIX_FIELDS)));
    }
    let values = PayloadReader::read_numbers(token.payload, token.type_code(), GPS_FIX_FIELDS.len())?;
    let mut record = StructRecord::new();
    for (name, value) in GPS_FIX_FIELDS.iter().zip(values) {
        record.push(*name, FieldValue::Number(value));
    }
    Ok(DecodedValue::Struct(record))
}

/// Per-field element types of a struct layout
///
/// A companion `TYPE` string wins only when it describes the same number of
/// fields as the record's name table.
fn struct_layout(kind: StructKind, companion_type: Option<&str>) -> Result<Vec<TypeCode>> {
    let layout = match companion_type {
        Some(text) if text.len() == kind.field_names().len() => text,
        _ => kind.default_layout(),
    };
    layout
        .bytes()
        .map(|code| {
            let type_code = TypeCode::from_u8(code);
            match type_code.fixed_size() {
                Some(_) => Ok(type_code),
                None => Err(TelemetryError::UnsupportedType(format!(
                    "struct field type {:?} in layout {:?}",
                    code as char, layout
                ))),
            }
        })
        .collect()
}

fn structure(kind: StructKind, token: &Token<'_>, companion_type: Option<&str>) -> Result<DecodedValue> {
    let names = kind.field_names();
    if token.is_empty() {
        return Ok(DecodedValue::Struct(StructRecord::zeroed(names)));
    }

    let layout = struct_layout(kind, companion_type)?;
    let stride: usize = layout.iter().filter_map(TypeCode::fixed_size).sum();
    if token.payload.len() < stride {
        return Err(TelemetryError::PayloadSize {
            expected: stride,
            found: token.payload.len(),
        });
    }

    let mut cursor = Cursor::new(&token.payload[..stride]);
    let mut record = StructRecord::new();
    for (name, type_code) in names.iter().zip(layout) {
        let value = if type_code.is_numeric() {
            FieldValue::Number(PayloadReader::read_number(&mut cursor, type_code)?)
        } else {
            let width = PayloadReader::element_width(type_code)?;
            let bytes = PayloadReader::read_bytes(&mut cursor, width)?;
            FieldValue::Text(decode_packed_string(&bytes))
        };
        record.push(*name, value);
    }
    Ok(DecodedValue::Struct(record))
}

/// Unit strings: `repeat` fields of `item_size` bytes each. Five fields are
/// the GPS unit block and reuse the GPS field names.
fn units(token: &Token<'_>) -> Result<DecodedValue> {
    if token.is_empty() || token.item_size() == 0 {
        return Ok(DecodedValue::Absent);
    }
    let fields: Vec<String> = token
        .payload
        .chunks(token.item_size())
        .map(decode_packed_string)
        .collect();

    let mut record = StructRecord::new();
    if fields.len() == GPS_FIX_FIELDS.len() {
        for (name, unit) in GPS_FIX_FIELDS.iter().zip(fields) {
            record.push(*name, FieldValue::Text(unit));
        }
    } else {
        for (i, unit) in fields.into_iter().enumerate() {
            record.push(format!("unit{}", i), FieldValue::Text(unit));
        }
    }
    Ok(DecodedValue::Struct(record))
}
