//! Single-field filter predicates.
//!
//! A [`Clause`] is one column filter made concrete: a resolved field
//! accessor, a match mode, and a typed comparison value. [`build_clause`]
//! turns the raw strings of a request into a clause, or into nothing when the
//! value does not parse for the field's type.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;

use crate::error::Result;
use crate::locale::{Casing, Locale};
use crate::op::MatchMode;
use crate::record::{resolve, Accessor, GridRecord};
use crate::value::{FieldType, Value};

/// Settings used to interpret raw filter strings.
#[derive(Debug, Clone, Copy)]
pub struct ParseSettings<'a> {
    /// Culture for numbers, dates and casing.
    pub locale: &'a Locale,
    /// Shift applied to date values written in UTC.
    pub utc_adjustment: Duration,
}

/// A typed filter value, parsed once per request.
///
/// Text is stored already lower-cased.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Lower-cased text.
    Text(String),
    /// Boolean.
    Bool(bool),
    /// Date/time, already adjusted for UTC input.
    DateTime(NaiveDateTime),
    /// 32-bit integer.
    Int(i32),
    /// Decimal.
    Decimal(Decimal),
    /// Floating point.
    Float(f64),
}

impl FilterValue {
    /// Parses `raw` for a field of type `field_type`.
    ///
    /// Returns `None` when the value does not parse, and always for opaque
    /// fields.
    pub fn parse(field_type: FieldType, raw: &str, settings: ParseSettings<'_>) -> Option<Self> {
        let locale = settings.locale;
        match field_type {
            FieldType::String => Some(FilterValue::Text(locale.lowercase(raw))),
            FieldType::Bool => locale.parse_bool(raw).map(FilterValue::Bool),
            FieldType::DateTime => {
                let parsed = locale.parse_datetime(raw)?;
                let value = if parsed.utc {
                    parsed.value.checked_add_signed(settings.utc_adjustment)?
                } else {
                    parsed.value
                };
                Some(FilterValue::DateTime(value))
            }
            FieldType::Int => locale.parse_int(raw).map(FilterValue::Int),
            FieldType::Decimal => locale.parse_decimal(raw).map(FilterValue::Decimal),
            FieldType::Float => locale.parse_float(raw).map(FilterValue::Float),
            FieldType::Opaque => None,
        }
    }
}

/// A single filter predicate over records of type `T`.
pub struct Clause<T> {
    path: String,
    mode: MatchMode,
    value: FilterValue,
    accessor: Accessor<T>,
    casing: Casing,
}

impl<T: 'static> Clause<T> {
    /// Returns the field path this clause reads.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the match mode.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Returns the parsed comparison value.
    pub fn value(&self) -> &FilterValue {
        &self.value
    }

    /// Evaluates this clause against a record.
    pub fn matches(&self, record: &T) -> bool {
        match (&self.value, self.accessor.get(record)) {
            (FilterValue::Text(needle), Value::String(s)) => {
                self.match_text(&self.casing.lowercase(s), needle)
            }
            (FilterValue::Bool(expected), Value::Bool(b)) => {
                self.mode == MatchMode::Equals && b == *expected
            }
            (FilterValue::DateTime(filter), Value::DateTime(field)) => {
                self.match_datetime(field, *filter)
            }
            (FilterValue::Int(filter), Value::Int(field)) => {
                self.mode.eval_ordering(field.cmp(filter))
            }
            (FilterValue::Decimal(filter), Value::Decimal(field)) => {
                self.mode.eval_ordering(field.cmp(filter))
            }
            (FilterValue::Float(filter), Value::Float(field)) => match field.partial_cmp(filter) {
                Some(ordering) => self.mode.eval_ordering(ordering),
                // NaN is unordered: it equals nothing, so only notEquals holds.
                None => self.mode == MatchMode::NotEquals,
            },
            // Type mismatch - doesn't match
            _ => false,
        }
    }

    fn match_text(&self, field: &str, needle: &str) -> bool {
        match self.mode {
            MatchMode::Contains => field.contains(needle),
            MatchMode::StartsWith => field.starts_with(needle),
            MatchMode::EndsWith => field.ends_with(needle),
            MatchMode::Equals => field == needle,
            _ => false,
        }
    }

    fn match_datetime(&self, field: NaiveDateTime, filter: NaiveDateTime) -> bool {
        match self.mode {
            // Equality is by calendar date; the time of day is ignored.
            MatchMode::Equals | MatchMode::NotEquals => {
                self.mode.eval_ordering(field.date().cmp(&filter.date()))
            }
            _ => self.mode.eval_ordering(field.cmp(&filter)),
        }
    }
}

impl<T> fmt::Debug for Clause<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clause")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("value", &self.value)
            .finish()
    }
}

/// Builds a clause for an already resolved field.
///
/// Returns `None`, without error, when:
/// - the filter value is missing, empty or whitespace,
/// - the mode is not legal for the field type,
/// - the value does not parse as the field type.
pub fn build_clause_for<T: 'static>(
    accessor: Accessor<T>,
    path: &str,
    filter: Option<&str>,
    mode: MatchMode,
    settings: ParseSettings<'_>,
) -> Option<Clause<T>> {
    let raw = filter.filter(|raw| !raw.trim().is_empty())?;
    let field_type = accessor.field_type();

    if !mode.supports(field_type) {
        tracing::debug!(
            path,
            %mode,
            %field_type,
            "filter dropped: match mode not valid for field type"
        );
        return None;
    }

    let Some(value) = FilterValue::parse(field_type, raw, settings) else {
        tracing::debug!(
            path,
            value = raw,
            %field_type,
            locale = settings.locale.tag(),
            "filter dropped: value does not parse"
        );
        return None;
    };

    Some(Clause {
        path: path.to_string(),
        mode,
        value,
        accessor,
        casing: settings.locale.casing_rules(),
    })
}

/// Resolves `path` on `T` and builds a clause for it.
///
/// An unresolvable path is always an error, even when the filter value would
/// have been dropped.
pub fn build_clause<T: GridRecord>(
    path: &str,
    filter: Option<&str>,
    mode: MatchMode,
    settings: ParseSettings<'_>,
) -> Result<Option<Clause<T>>> {
    let accessor = resolve::<T>(path)?;
    Ok(build_clause_for(accessor, path, filter, mode, settings))
}
