//! Runtime value types for field comparison.
//!
//! The [`Value`] enum is what a record accessor hands back for a field, and
//! [`FieldType`] is its tag. Filter semantics are chosen per tag.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use rust_decimal::Decimal;

use crate::locale::Casing;

/// The runtime type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Text, compared case-insensitively.
    String,
    /// Boolean.
    Bool,
    /// Date and time of day, without an offset.
    DateTime,
    /// 32-bit signed integer.
    Int,
    /// Exact decimal.
    Decimal,
    /// 64-bit floating point.
    Float,
    /// Present on the record but neither filterable nor meaningfully sortable.
    Opaque,
}

impl FieldType {
    /// Returns the display name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Bool => "bool",
            FieldType::DateTime => "datetime",
            FieldType::Int => "int",
            FieldType::Decimal => "decimal",
            FieldType::Float => "float",
            FieldType::Opaque => "opaque",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Runtime value of a field, borrowed from the source record.
///
/// # Example
///
/// ```
/// use aranel_grid::{FieldType, Value};
///
/// let name = String::from("Desk Chair");
/// let value = Value::String(&name);
/// assert_eq!(value.field_type(), FieldType::String);
/// assert_eq!(value.as_str(), Some("Desk Chair"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Boolean value.
    Bool(bool),
    /// Date/time value.
    DateTime(NaiveDateTime),
    /// 32-bit integer value.
    Int(i32),
    /// Decimal value.
    Decimal(Decimal),
    /// Floating point value.
    Float(f64),
    /// A field of a type the engine does not interpret.
    Opaque,
}

impl<'a> Value<'a> {
    /// Returns the tag of this value.
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::String(_) => FieldType::String,
            Value::Bool(_) => FieldType::Bool,
            Value::DateTime(_) => FieldType::DateTime,
            Value::Int(_) => FieldType::Int,
            Value::Decimal(_) => FieldType::Decimal,
            Value::Float(_) => FieldType::Float,
            Value::Opaque => FieldType::Opaque,
        }
    }

    /// Returns `true` if this is an `Opaque` value.
    pub fn is_opaque(&self) -> bool {
        matches!(self, Value::Opaque)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(*s),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the date/time value, if present.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Extracts the integer value, if present.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the decimal value, if present.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Extracts the float value, if present.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::String(_) => 0,
            Value::Bool(_) => 1,
            Value::DateTime(_) => 2,
            Value::Int(_) => 3,
            Value::Decimal(_) => 4,
            Value::Float(_) => 5,
            Value::Opaque => 6,
        }
    }
}

/// Natural ordering of two values, total over all inputs.
///
/// Text compares by its invariant lower-cased form with an ordinal tiebreak,
/// dates chronologically, numbers numerically and `false < true`. Floats use
/// IEEE total ordering so NaN has a fixed place. Opaque values are all equal.
/// Values of different types (only possible with a hand-written accessor that
/// is inconsistent) order by type.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    compare_values_with(a, b, Casing::Invariant)
}

/// Like [`compare_values`], folding text with the given casing rules.
///
/// ```
/// use std::cmp::Ordering;
/// use aranel_grid::{compare_values_with, Casing, Value};
///
/// let (a, b) = (Value::String("Ifak"), Value::String("ilgaz"));
/// assert_eq!(compare_values_with(&a, &b, Casing::Invariant), Ordering::Less);
/// assert_eq!(compare_values_with(&a, &b, Casing::Turkic), Ordering::Greater);
/// ```
pub fn compare_values_with(a: &Value<'_>, b: &Value<'_>, casing: Casing) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => casing.compare(a, b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Decimal(a), Value::Decimal(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
        (Value::Opaque, Value::Opaque) => Ordering::Equal,
        _ => a.rank().cmp(&b.rank()),
    }
}

/// Conversion of a record's date type into the engine's [`NaiveDateTime`].
///
/// The `#[derive(GridRecord)]` macro calls this for `DateTime` fields.
/// Zoned values are taken at their local wall time, dates at midnight.
pub trait GridDateTime {
    /// Converts this value to a naive date/time for comparison.
    fn grid_datetime(&self) -> NaiveDateTime;
}

impl GridDateTime for NaiveDateTime {
    fn grid_datetime(&self) -> NaiveDateTime {
        *self
    }
}

impl GridDateTime for NaiveDate {
    fn grid_datetime(&self) -> NaiveDateTime {
        self.and_time(NaiveTime::MIN)
    }
}

impl<Tz: TimeZone> GridDateTime for DateTime<Tz> {
    fn grid_datetime(&self) -> NaiveDateTime {
        self.naive_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn value_tags() {
        assert_eq!(Value::String("x").field_type(), FieldType::String);
        assert_eq!(Value::Bool(true).field_type(), FieldType::Bool);
        assert_eq!(Value::DateTime(dt(2024, 1, 1, 0)).field_type(), FieldType::DateTime);
        assert_eq!(Value::Int(1).field_type(), FieldType::Int);
        assert_eq!(Value::Decimal(Decimal::ONE).field_type(), FieldType::Decimal);
        assert_eq!(Value::Float(1.0).field_type(), FieldType::Float);
        assert!(Value::Opaque.is_opaque());
    }

    #[test]
    fn value_extractors() {
        assert_eq!(Value::String("hello").as_str(), Some("hello"));
        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Decimal(Decimal::new(125, 1)).as_decimal(), Some(Decimal::new(125, 1)));
        assert_eq!(Value::Float(2.5).as_float(), Some(2.5));
        assert_eq!(Value::Bool(false).as_bool(), Some(false));

        // Wrong type returns None
        assert_eq!(Value::String("1").as_int(), None);
        assert_eq!(Value::Int(1).as_str(), None);
    }

    #[test]
    fn compare_same_types() {
        let apple = Value::String("apple");
        assert_eq!(compare_values(&apple, &Value::String("banana")), Ordering::Less);
        assert_eq!(compare_values(&Value::Int(10), &Value::Int(2)), Ordering::Greater);
        assert_eq!(compare_values(&Value::Bool(false), &Value::Bool(true)), Ordering::Less);
        assert_eq!(
            compare_values(
                &Value::DateTime(dt(2024, 1, 1, 0)),
                &Value::DateTime(dt(2024, 1, 1, 5))
            ),
            Ordering::Less
        );
        assert_eq!(
            compare_values(
                &Value::Decimal(Decimal::new(100, 2)),
                &Value::Decimal(Decimal::ONE)
            ),
            Ordering::Equal
        );
    }

    #[test]
    fn compare_text_ignores_case_then_falls_back_to_ordinal() {
        let text = |a, b| compare_values(&Value::String(a), &Value::String(b));
        assert_eq!(text("Zebra", "apple"), Ordering::Greater);
        assert_eq!(text("apple", "Banana"), Ordering::Less);
        assert_eq!(text("Banana", "cherry"), Ordering::Less);
        assert_eq!(text("Apple", "apple"), Ordering::Less);
        assert_eq!(text("apple", "apple"), Ordering::Equal);
    }

    #[test]
    fn compare_text_with_turkic_casing() {
        let (a, b) = (Value::String("Ifak"), Value::String("ilgaz"));
        assert_eq!(compare_values_with(&a, &b, Casing::Invariant), Ordering::Less);
        assert_eq!(compare_values_with(&a, &b, Casing::Turkic), Ordering::Greater);
    }

    #[test]
    fn compare_nan_is_total() {
        let nan = Value::Float(f64::NAN);
        let one = Value::Float(1.0);
        assert_eq!(compare_values(&one, &nan), Ordering::Less);
        assert_eq!(compare_values(&nan, &nan), Ordering::Equal);
    }

    #[test]
    fn compare_opaque_is_equal() {
        assert_eq!(compare_values(&Value::Opaque, &Value::Opaque), Ordering::Equal);
    }

    #[test]
    fn grid_datetime_conversions() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(date.grid_datetime(), dt(2024, 3, 15, 0));

        let utc = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        assert_eq!(utc.grid_datetime(), dt(2024, 3, 15, 9));

        let istanbul = FixedOffset::east_opt(3 * 3600).unwrap();
        let local = istanbul.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        assert_eq!(local.grid_datetime(), dt(2024, 3, 15, 9));
    }
}
