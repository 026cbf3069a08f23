/// TabFrame Element Implementation
///
/// An Element is a single typed cell. Every Element belongs to exactly one of
/// four logical types and every assignment is coerced into that type, so
/// writing "abc" into an Int cell never fails: it stores the Int missing value.
///
/// # Missing values
///
/// Each type reserves one sentinel meaning "no value":
/// - String: the literal text `"NaN"`
/// - Int: `i64::MIN`
/// - Float: IEEE NaN
/// - Bool: none, every coercion yields `true` or `false`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TableError;

/// Missing-value sentinel for Int elements.
pub const INT_NAN: i64 = i64::MIN;

/// Missing-value sentinel for String elements.
pub const STRING_NAN: &str = "NaN";

/// Text inputs that a String element stores as the missing sentinel.
const STRING_NAN_TOKENS: [&str; 5] = ["", "NaN", "nan", "null", "Null"];

/// Text inputs that coerce to `false`; anything else is `true`.
const FALSY_TOKENS: [&str; 4] = ["false", "0", "F", "f"];

/// Logical column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Int,
    #[serde(rename = "float64")]
    Float,
    Bool,
}

impl DataType {
    /// Returns true for Int and Float.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Int => "int",
            DataType::Float => "float64",
            DataType::Bool => "bool",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = TableError;

    /// Accepts: "string", "int", "float64" (or "float"), "bool"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "str" => Ok(DataType::String),
            "int" => Ok(DataType::Int),
            "float64" | "float" => Ok(DataType::Float),
            "bool" => Ok(DataType::Bool),
            _ => Err(TableError::UnknownType(s.to_string())),
        }
    }
}

/// A single typed cell value.
///
/// Serializes as a plain scalar (`"a"`, `3`, `2.5`, `true`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Element {
    /// Coerce `value` into a new element of type `dtype`.
    ///
    /// This never fails; input that cannot be represented becomes the
    /// type's missing value.
    ///
    /// ```
    /// use tabframe::{DataType, Element};
    ///
    /// assert_eq!(Element::new(DataType::Int, "42").as_int(), 42);
    /// assert!(Element::new(DataType::Int, "forty-two").is_nan());
    /// assert_eq!(Element::new(DataType::Bool, "F").as_bool(), false);
    /// assert_eq!(Element::new(DataType::String, 3).as_text(), "3");
    /// ```
    pub fn new(dtype: DataType, value: impl Into<Element>) -> Self {
        coerce(dtype, value.into())
    }

    /// The missing value for `dtype` (`false` for Bool).
    pub fn missing(dtype: DataType) -> Self {
        match dtype {
            DataType::String => Element::String(STRING_NAN.to_string()),
            DataType::Int => Element::Int(INT_NAN),
            DataType::Float => Element::Float(f64::NAN),
            DataType::Bool => Element::Bool(false),
        }
    }

    pub fn dtype(&self) -> DataType {
        match self {
            Element::String(_) => DataType::String,
            Element::Int(_) => DataType::Int,
            Element::Float(_) => DataType::Float,
            Element::Bool(_) => DataType::Bool,
        }
    }

    /// Replace the stored value, coercing `value` into this element's type.
    pub fn set(&mut self, value: impl Into<Element>) {
        *self = coerce(self.dtype(), value.into());
    }

    /// Re-coerce from another element's projection matching this type:
    /// String from `as_text`, Int from `as_int`, Float from `as_float`,
    /// Bool from `as_bool`.
    pub fn update(&mut self, other: &Element) {
        match self.dtype() {
            DataType::String => self.set(other.as_text()),
            DataType::Int => self.set(other.as_int()),
            DataType::Float => self.set(other.as_float()),
            DataType::Bool => self.set(other.as_bool()),
        }
    }

    /// Convert this element into `dtype` through the matching projection.
    pub fn cast(&self, dtype: DataType) -> Element {
        let mut target = Element::missing(dtype);
        target.update(self);
        target
    }

    /// True if this element holds its type's missing sentinel.
    pub fn is_nan(&self) -> bool {
        match self {
            Element::String(s) => s == STRING_NAN,
            Element::Int(i) => *i == INT_NAN,
            Element::Float(f) => f.is_nan(),
            Element::Bool(_) => false,
        }
    }

    // ==================== Projections ====================

    /// Text view. Missing numbers render as `"NaN"`.
    pub fn as_text(&self) -> String {
        match self {
            Element::String(s) => s.clone(),
            Element::Int(i) => {
                if *i == INT_NAN {
                    STRING_NAN.to_string()
                } else {
                    i.to_string()
                }
            }
            Element::Float(f) => format_float(*f),
            Element::Bool(b) => b.to_string(),
        }
    }

    /// Integer view. Unparsable text yields `INT_NAN` and a warning.
    pub fn as_int(&self) -> i64 {
        match self {
            Element::String(s) => {
                if s == STRING_NAN {
                    return INT_NAN;
                }
                s.parse::<i64>().unwrap_or_else(|_| {
                    log::warn!("'{}' cannot be converted to int, using missing value", s);
                    INT_NAN
                })
            }
            Element::Int(i) => *i,
            Element::Float(f) => float_to_int(*f),
            Element::Bool(b) => i64::from(*b),
        }
    }

    /// Float view. Missing values of any type yield NaN.
    pub fn as_float(&self) -> f64 {
        match self {
            Element::String(s) => {
                if s == STRING_NAN {
                    return f64::NAN;
                }
                s.parse::<f64>().unwrap_or(f64::NAN)
            }
            Element::Int(i) => {
                if *i == INT_NAN {
                    f64::NAN
                } else {
                    *i as f64
                }
            }
            Element::Float(f) => *f,
            Element::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Boolean view. Text is lower-cased before the falsy-token test;
    /// numbers are true only when strictly positive.
    pub fn as_bool(&self) -> bool {
        match self {
            Element::String(s) => !FALSY_TOKENS.contains(&s.to_lowercase().as_str()),
            Element::Int(i) => *i > 0,
            Element::Float(f) => *f > 0.0 && !f.is_nan(),
            Element::Bool(b) => *b,
        }
    }
}

/// Coerce an arbitrary element into `dtype` using assignment rules.
fn coerce(dtype: DataType, value: Element) -> Element {
    match dtype {
        DataType::String => Element::String(match value {
            Element::String(s) => {
                if STRING_NAN_TOKENS.contains(&s.as_str()) {
                    STRING_NAN.to_string()
                } else {
                    s
                }
            }
            Element::Int(i) if i == INT_NAN => STRING_NAN.to_string(),
            Element::Int(i) => i.to_string(),
            Element::Float(f) if f.is_nan() => STRING_NAN.to_string(),
            Element::Float(f) => format!("{:.6}", f),
            Element::Bool(b) => b.to_string(),
        }),
        DataType::Int => Element::Int(match value {
            Element::String(s) => s.parse::<i64>().unwrap_or_else(|_| {
                log::debug!("'{}' is not an int, storing missing value", s);
                INT_NAN
            }),
            Element::Int(i) => i,
            Element::Float(f) => float_to_int(f),
            Element::Bool(b) => i64::from(b),
        }),
        DataType::Float => Element::Float(match value {
            Element::String(s) => s.parse::<f64>().unwrap_or_else(|_| {
                log::debug!("'{}' is not a float, storing missing value", s);
                f64::NAN
            }),
            Element::Int(i) if i == INT_NAN => f64::NAN,
            Element::Int(i) => i as f64,
            Element::Float(f) => f,
            Element::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
        }),
        DataType::Bool => Element::Bool(match value {
            Element::String(s) => !FALSY_TOKENS.contains(&s.as_str()),
            Element::Int(i) => i != 0,
            Element::Float(f) => f != 0.0,
            Element::Bool(b) => b,
        }),
    }
}

/// Truncate toward zero; NaN and out-of-range values become `INT_NAN`.
fn float_to_int(f: f64) -> i64 {
    if f.is_nan() || f < i64::MIN as f64 || f >= i64::MAX as f64 {
        INT_NAN
    } else {
        f.trunc() as i64
    }
}

/// Shortest decimal text that round-trips, never in exponent form.
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        STRING_NAN.to_string()
    } else {
        f.to_string()
    }
}

/// Missing values compare equal to each other.
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Element::String(a), Element::String(b)) => a == b,
            (Element::Int(a), Element::Int(b)) => a == b,
            (Element::Float(a), Element::Float(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (Element::Bool(a), Element::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::String(value.to_string())
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::String(value)
    }
}

impl From<&String> for Element {
    fn from(value: &String) -> Self {
        Element::String(value.clone())
    }
}

impl From<i64> for Element {
    fn from(value: i64) -> Self {
        Element::Int(value)
    }
}

impl From<i32> for Element {
    fn from(value: i32) -> Self {
        Element::Int(i64::from(value))
    }
}

impl From<usize> for Element {
    fn from(value: usize) -> Self {
        Element::Int(i64::try_from(value).unwrap_or(INT_NAN))
    }
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Element::Float(value)
    }
}

impl From<f32> for Element {
    fn from(value: f32) -> Self {
        Element::Float(f64::from(value))
    }
}

impl From<bool> for Element {
    fn from(value: bool) -> Self {
        Element::Bool(value)
    }
}

impl From<&Element> for Element {
    fn from(value: &Element) -> Self {
        value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_coercion() {
        assert_eq!(Element::new(DataType::String, "abc").as_text(), "abc");
        for token in ["", "NaN", "nan", "null", "Null"] {
            assert!(Element::new(DataType::String, token).is_nan(), "{token}");
        }
        assert_eq!(Element::new(DataType::String, 12).as_text(), "12");
        assert_eq!(Element::new(DataType::String, 1.5).as_text(), "1.500000");
        assert_eq!(Element::new(DataType::String, true).as_text(), "true");
        assert!(Element::new(DataType::String, INT_NAN).is_nan());
        assert!(Element::new(DataType::String, f64::NAN).is_nan());
    }

    #[test]
    fn test_int_coercion() {
        assert_eq!(Element::new(DataType::Int, "-17").as_int(), -17);
        assert_eq!(Element::new(DataType::Int, 3.9).as_int(), 3);
        assert_eq!(Element::new(DataType::Int, -3.9).as_int(), -3);
        assert_eq!(Element::new(DataType::Int, true).as_int(), 1);
        assert!(Element::new(DataType::Int, "1.5").is_nan());
        assert!(Element::new(DataType::Int, "test").is_nan());
        assert!(Element::new(DataType::Int, f64::NAN).is_nan());
        assert!(Element::new(DataType::Int, 1e30).is_nan());
    }

    #[test]
    fn test_float_coercion() {
        assert_eq!(Element::new(DataType::Float, "2.25").as_float(), 2.25);
        assert_eq!(Element::new(DataType::Float, 4).as_float(), 4.0);
        assert_eq!(Element::new(DataType::Float, false).as_float(), 0.0);
        assert!(Element::new(DataType::Float, "x").is_nan());
        assert!(Element::new(DataType::Float, INT_NAN).is_nan());
    }

    #[test]
    fn test_bool_coercion() {
        for token in ["false", "0", "F", "f"] {
            assert!(!Element::new(DataType::Bool, token).as_bool(), "{token}");
        }
        for token in ["true", "yes", "", "NaN", "FALSE"] {
            assert!(Element::new(DataType::Bool, token).as_bool(), "{token}");
        }
        assert!(!Element::new(DataType::Bool, 0).as_bool());
        assert!(Element::new(DataType::Bool, -2).as_bool());
        assert!(!Element::new(DataType::Bool, 0.0).as_bool());
        // Bool has no missing sentinel
        assert!(!Element::new(DataType::Bool, "garbage").is_nan());
    }

    #[test]
    fn test_projections() {
        let s = Element::String("12".to_string());
        assert_eq!(s.as_int(), 12);
        assert_eq!(s.as_float(), 12.0);
        assert!(s.as_bool());
        assert!(!Element::String("FALSE".to_string()).as_bool());

        let i = Element::Int(INT_NAN);
        assert_eq!(i.as_text(), "NaN");
        assert!(i.as_float().is_nan());
        assert!(!i.as_bool());

        let f = Element::Float(-0.5);
        assert_eq!(f.as_text(), "-0.5");
        assert_eq!(f.as_int(), 0);
        assert!(!f.as_bool());
        assert_eq!(Element::Float(20.0).as_text(), "20");

        let b = Element::Bool(true);
        assert_eq!(b.as_text(), "true");
        assert_eq!(b.as_int(), 1);
        assert_eq!(b.as_float(), 1.0);
    }

    #[test]
    fn test_unparsable_int_view_is_missing() {
        let _ = env_logger::builder().is_test(true).try_init();
        assert_eq!(Element::String("test".to_string()).as_int(), INT_NAN);
        assert_eq!(Element::String("NaN".to_string()).as_int(), INT_NAN);
    }

    #[test]
    fn test_set_keeps_type() {
        let mut e = Element::Int(1);
        e.set("99");
        assert_eq!(e, Element::Int(99));
        e.set("oops");
        assert!(e.is_nan());
        assert_eq!(e.dtype(), DataType::Int);

        let mut s = Element::String("a".to_string());
        s.set(2.5);
        assert_eq!(s.as_text(), "2.500000");
    }

    #[test]
    fn test_update_uses_projection() {
        let mut s = Element::missing(DataType::String);
        s.update(&Element::Float(2.5));
        assert_eq!(s.as_text(), "2.5");

        let mut b = Element::missing(DataType::Bool);
        b.update(&Element::Int(-1));
        assert!(!b.as_bool());

        let mut i = Element::missing(DataType::Int);
        i.update(&Element::String("7".to_string()));
        assert_eq!(i.as_int(), 7);
    }

    #[test]
    fn test_missing_equality() {
        assert_eq!(Element::Float(f64::NAN), Element::Float(f64::NAN));
        assert_ne!(Element::Int(1), Element::Float(1.0));
    }

    #[test]
    fn test_data_type_parse() {
        assert_eq!("float64".parse::<DataType>(), Ok(DataType::Float));
        assert_eq!("INT".parse::<DataType>(), Ok(DataType::Int));
        assert_eq!(
            "date".parse::<DataType>(),
            Err(TableError::UnknownType("date".to_string()))
        );
        assert_eq!(DataType::Float.to_string(), "float64");
    }
}
