// src/composer/polarity.rs
use crate::types::FourCC;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-axis sign corrections applied to sensor vectors
///
/// The defaults map the camera's native axes onto a right-handed output
/// frame: three-component vectors flip Y and Z, quaternions flip only the
/// last component. A per-tag entry replaces the default for that tag;
/// positions it does not cover keep their sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarityTable {
    pub vector3: [f64; 3],
    pub vector4: [f64; 4],
    pub per_tag: BTreeMap<FourCC, Vec<f64>>,
}

impl Default for PolarityTable {
    fn default() -> Self {
        PolarityTable {
            vector3: [1.0, -1.0, -1.0],
            vector4: [1.0, 1.0, 1.0, -1.0],
            per_tag: BTreeMap::new(),
        }
    }
}

impl PolarityTable {
    /// Table that leaves every component unchanged
    pub fn identity() -> Self {
        PolarityTable {
            vector3: [1.0; 3],
            vector4: [1.0; 4],
            per_tag: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, tag: FourCC, signs: Vec<f64>) {
        self.per_tag.insert(tag, signs);
    }

    /// Sign for component `index` of a `components`-long vector from `tag`
    pub fn sign(&self, tag: FourCC, components: usize, index: usize) -> f64 {
        if let Some(signs) = self.per_tag.get(&tag) {
            return signs.get(index).copied().unwrap_or(1.0);
        }
        let defaults: &[f64] = match components {
            3 => &self.vector3,
            4 => &self.vector4,
            _ => &[],
        };
        defaults.get(index).copied().unwrap_or(1.0)
    }

    pub fn apply(&self, tag: FourCC, values: &mut [f64]) {
        let components = values.len();
        for (i, value) in values.iter_mut().enumerate() {
            *value *= self.sign(tag, components, i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_signs() {
        let table = PolarityTable::default();
        let mut xyz = [2.0, 4.0, 6.0];
        table.apply(FourCC::new(b"ACCL"), &mut xyz);
        assert_eq!(xyz, [2.0, -4.0, -6.0]);

        let mut wxyz = [1.0, 2.0, 3.0, 4.0];
        table.apply(FourCC::new(b"CORI"), &mut wxyz);
        assert_eq!(wxyz, [1.0, 2.0, 3.0, -4.0]);
    }

    #[test]
    fn test_per_tag_override() {
        let mut table = PolarityTable::default();
        table.set(FourCC::new(b"GYRO"), vec![-1.0]);

        let mut gyro = [1.0, 1.0, 1.0];
        table.apply(FourCC::new(b"GYRO"), &mut gyro);
        assert_eq!(gyro, [-1.0, 1.0, 1.0]);

        let mut accl = [1.0, 1.0, 1.0];
        table.apply(FourCC::new(b"ACCL"), &mut accl);
        assert_eq!(accl, [1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_json_shape() {
        let table: PolarityTable = serde_json::from_str(r#"{"per_tag": {"MAGN": [1, 1, -1]}}"#).unwrap();
        assert_eq!(table.vector3, [1.0, -1.0, -1.0]);
        assert_eq!(table.sign(FourCC::new(b"MAGN"), 3, 1), 1.0);
        assert_eq!(table.sign(FourCC::new(b"MAGN"), 3, 2), -1.0);
    }
}
