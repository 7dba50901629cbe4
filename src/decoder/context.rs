// src/decoder/context.rs
use crate::registry::{DecodedValue, StructRecord};
use crate::types::FourCC;

const TYPE_TAG: FourCC = FourCC::new(b"TYPE");
const UNIT_TAG: FourCC = FourCC::new(b"UNIT");

/// Companion descriptors seen so far inside one container
///
/// A fresh context is created for every container, so a `TYPE` string never
/// leaks into a sibling or parent container.
#[derive(Debug, Clone, Default)]
pub struct TypeContext {
    type_string: Option<String>,
    units: Option<StructRecord>,
}

impl TypeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent `TYPE` layout string
    pub fn type_string(&self) -> Option<&str> {
        self.type_string.as_deref()
    }

    /// Most recent `UNIT` block
    pub fn units(&self) -> Option<&StructRecord> {
        self.units.as_ref()
    }

    /// Record a decoded companion value; other tags are ignored
    pub fn observe(&mut self, tag: FourCC, value: &DecodedValue) {
        match value {
            DecodedValue::Text(text) if tag == TYPE_TAG => {
                self.type_string = Some(text.clone());
            }
            DecodedValue::Struct(record) if tag == UNIT_TAG => {
                self.units = Some(record.clone());
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FieldValue;

    #[test]
    fn test_observe_type_and_units() {
        let mut ctx = TypeContext::new();
        assert!(ctx.type_string().is_none());

        ctx.observe(TYPE_TAG, &DecodedValue::Text("JlllSSSSBB".into()));
        assert_eq!(ctx.type_string(), Some("JlllSSSSBB"));

        let mut units = StructRecord::new();
        units.push("unit0", FieldValue::Text("s".into()));
        ctx.observe(UNIT_TAG, &DecodedValue::Struct(units));
        assert_eq!(ctx.units().map(StructRecord::len), Some(1));
    }

    #[test]
    fn test_unrelated_tags_ignored() {
        let mut ctx = TypeContext::new();
        ctx.observe(FourCC::new(b"STNM"), &DecodedValue::Text("GPS".into()));
        ctx.observe(TYPE_TAG, &DecodedValue::Float(1.0));
        assert!(ctx.type_string().is_none());
    }
}
