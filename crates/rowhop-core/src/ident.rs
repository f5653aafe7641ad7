use serde_json::Value as Json;
use std::fmt;

///
/// RecordId
///
/// Positive numeric identifier of one record within a collection.
///
/// Construction goes through a single normalization: anything that is not a
/// positive integer (including integral JSON floats, which some transports
/// emit for ids) is treated as absent rather than coerced.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RecordId(i64);

/// Largest float (2^53) that still maps exactly onto an integer identifier.
const F64_EXACT_MAX: f64 = 9_007_199_254_740_992.0;

impl RecordId {
    #[must_use]
    pub const fn new(raw: i64) -> Option<Self> {
        if raw > 0 { Some(Self(raw)) } else { None }
    }

    /// Parse a raw field value as a positive integer identifier.
    #[must_use]
    pub fn from_json(value: &Json) -> Option<Self> {
        let Json::Number(number) = value else {
            return None;
        };
        if let Some(raw) = number.as_i64() {
            return Self::new(raw);
        }
        number.as_f64().and_then(Self::from_integral_f64)
    }

    #[expect(clippy::cast_possible_truncation)]
    fn from_integral_f64(raw: f64) -> Option<Self> {
        if raw.fract() == 0.0 && raw >= 1.0 && raw <= F64_EXACT_MAX {
            Self::new(raw as i64)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
