// src/composer/scale.rs
use crate::registry::DecodedValue;
use smallvec::SmallVec;

/// Divisors from the most recent `SCAL` record
///
/// Lookup is by position. A single divisor applies to every position, a
/// position past the end divides by 1.0 and a zero divisor is read as 1.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleContext {
    divisors: SmallVec<[f64; 4]>,
}

impl ScaleContext {
    pub fn new<I: IntoIterator<Item = f64>>(divisors: I) -> Self {
        ScaleContext { divisors: divisors.into_iter().collect() }
    }

    /// Scale context carried by a decoded `SCAL` value, if it is numeric
    pub fn from_value(value: &DecodedValue) -> Option<Self> {
        value.as_numbers().map(|divisors| ScaleContext { divisors })
    }

    pub fn divisors(&self) -> &[f64] {
        &self.divisors
    }

    pub fn divisor(&self, index: usize) -> f64 {
        let raw = match self.divisors.as_slice() {
            [single] => *single,
            all => all.get(index).copied().unwrap_or(1.0),
        };
        if raw == 0.0 {
            1.0
        } else {
            raw
        }
    }

    pub fn scale(&self, index: usize, value: f64) -> f64 {
        value / self.divisor(index)
    }

    pub fn apply(&self, values: &mut [f64]) {
        for (i, value) in values.iter_mut().enumerate() {
            *value = self.scale(i, *value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let scale = ScaleContext::default();
        let mut values = [3.0, 4.0];
        scale.apply(&mut values);
        assert_eq!(values, [3.0, 4.0]);
    }

    #[test]
    fn test_broadcast_single_divisor() {
        let scale = ScaleContext::new([2.0]);
        let mut values = [2.0, 4.0, 6.0];
        scale.apply(&mut values);
        assert_eq!(values, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_positional_and_zero_divisors() {
        let scale = ScaleContext::new([10.0, 0.0]);
        assert_eq!(scale.scale(0, 50.0), 5.0);
        assert_eq!(scale.scale(1, 50.0), 50.0);
        assert_eq!(scale.scale(7, 50.0), 50.0);
    }

    #[test]
    fn test_from_value() {
        let value = DecodedValue::Vector(smallvec::smallvec![1e7, 1e7, 1000.0]);
        let scale = ScaleContext::from_value(&value).unwrap();
        assert_eq!(scale.divisors(), &[1e7, 1e7, 1000.0]);
        assert!(ScaleContext::from_value(&DecodedValue::Text("x".into())).is_none());
    }
}
