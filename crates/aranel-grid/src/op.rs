//! Match modes and filter combinators.
//!
//! [`MatchMode`] is the comparison a column filter asks for; which modes are
//! legal depends on the field's [`FieldType`]. [`Operator`] decides how a
//! filter joins the ones composed before it.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::FieldType;

/// Comparison requested by a filter.
///
/// Legal modes per field type:
///
/// | Type | Modes |
/// |------|-------|
/// | string | `contains`, `startsWith`, `endsWith`, `equals` |
/// | bool | `equals` |
/// | datetime, int, decimal, float | `equals`, `notEquals`, `gt`, `gte`, `lt`, `lte` |
///
/// Any mode string the engine does not know deserializes to
/// [`MatchMode::Unsupported`], which never produces a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchMode {
    /// Substring match.
    Contains,
    /// Prefix match.
    StartsWith,
    /// Suffix match.
    EndsWith,
    /// Equality.
    Equals,
    /// Inequality.
    NotEquals,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Unknown or missing mode.
    #[default]
    #[serde(other)]
    Unsupported,
}

impl MatchMode {
    /// Returns `true` if this mode may be used on a field of the given type.
    pub fn supports(self, field_type: FieldType) -> bool {
        match field_type {
            FieldType::String => matches!(
                self,
                MatchMode::Contains
                    | MatchMode::StartsWith
                    | MatchMode::EndsWith
                    | MatchMode::Equals
            ),
            FieldType::Bool => self == MatchMode::Equals,
            FieldType::DateTime | FieldType::Int | FieldType::Decimal | FieldType::Float => {
                self.is_ordering()
            }
            FieldType::Opaque => false,
        }
    }

    /// Returns `true` for the modes decided by an [`Ordering`].
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            MatchMode::Equals
                | MatchMode::NotEquals
                | MatchMode::Gt
                | MatchMode::Gte
                | MatchMode::Lt
                | MatchMode::Lte
        )
    }

    /// Evaluates an ordering-based mode given `field.cmp(filter)`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            MatchMode::Equals => ordering == Ordering::Equal,
            MatchMode::NotEquals => ordering != Ordering::Equal,
            MatchMode::Gt => ordering == Ordering::Greater,
            MatchMode::Gte => ordering != Ordering::Less,
            MatchMode::Lt => ordering == Ordering::Less,
            MatchMode::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the wire name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Contains => "contains",
            MatchMode::StartsWith => "startsWith",
            MatchMode::EndsWith => "endsWith",
            MatchMode::Equals => "equals",
            MatchMode::NotEquals => "notEquals",
            MatchMode::Gt => "gt",
            MatchMode::Gte => "gte",
            MatchMode::Lt => "lt",
            MatchMode::Lte => "lte",
            MatchMode::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a column filter joins the predicate composed before it.
///
/// Only the exact string `"or"` selects [`Operator::Or`]; anything else,
/// including a missing operator, means AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Disjunction.
    Or,
    /// Conjunction.
    #[default]
    #[serde(other)]
    And,
}

impl Operator {
    /// Returns the wire name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_per_type() {
        // String modes
        assert!(MatchMode::Contains.supports(FieldType::String));
        assert!(MatchMode::StartsWith.supports(FieldType::String));
        assert!(MatchMode::EndsWith.supports(FieldType::String));
        assert!(MatchMode::Equals.supports(FieldType::String));
        assert!(!MatchMode::NotEquals.supports(FieldType::String));
        assert!(!MatchMode::Gt.supports(FieldType::String));

        // Bool only takes equals
        assert!(MatchMode::Equals.supports(FieldType::Bool));
        assert!(!MatchMode::NotEquals.supports(FieldType::Bool));
        assert!(!MatchMode::Contains.supports(FieldType::Bool));

        // Ordered types
        for ty in [FieldType::DateTime, FieldType::Int, FieldType::Decimal, FieldType::Float] {
            assert!(MatchMode::Equals.supports(ty));
            assert!(MatchMode::NotEquals.supports(ty));
            assert!(MatchMode::Gte.supports(ty));
            assert!(MatchMode::Lt.supports(ty));
            assert!(!MatchMode::Contains.supports(ty));
        }

        assert!(!MatchMode::Equals.supports(FieldType::Opaque));
        assert!(!MatchMode::Unsupported.supports(FieldType::String));
    }

    #[test]
    fn eval_ordering() {
        assert!(MatchMode::Equals.eval_ordering(Ordering::Equal));
        assert!(!MatchMode::Equals.eval_ordering(Ordering::Less));

        assert!(MatchMode::NotEquals.eval_ordering(Ordering::Greater));
        assert!(!MatchMode::NotEquals.eval_ordering(Ordering::Equal));

        assert!(MatchMode::Gt.eval_ordering(Ordering::Greater));
        assert!(!MatchMode::Gt.eval_ordering(Ordering::Equal));

        assert!(MatchMode::Gte.eval_ordering(Ordering::Equal));
        assert!(!MatchMode::Gte.eval_ordering(Ordering::Less));

        assert!(MatchMode::Lt.eval_ordering(Ordering::Less));
        assert!(!MatchMode::Lt.eval_ordering(Ordering::Equal));

        assert!(MatchMode::Lte.eval_ordering(Ordering::Equal));
        assert!(!MatchMode::Lte.eval_ordering(Ordering::Greater));

        // Non-ordering modes never match an ordering
        assert!(!MatchMode::Contains.eval_ordering(Ordering::Equal));
    }

    #[test]
    fn wire_names() {
        let mode: MatchMode = serde_json::from_str("\"startsWith\"").unwrap();
        assert_eq!(mode, MatchMode::StartsWith);
        let mode: MatchMode = serde_json::from_str("\"notEquals\"").unwrap();
        assert_eq!(mode, MatchMode::NotEquals);
        assert_eq!(serde_json::to_string(&MatchMode::Gte).unwrap(), "\"gte\"");
        assert_eq!(MatchMode::EndsWith.to_string(), "endsWith");
    }

    #[test]
    fn unknown_mode_is_unsupported() {
        let mode: MatchMode = serde_json::from_str("\"between\"").unwrap();
        assert_eq!(mode, MatchMode::Unsupported);
        let mode: MatchMode = serde_json::from_str("\"\"").unwrap();
        assert_eq!(mode, MatchMode::Unsupported);
    }

    #[test]
    fn operator_defaults_to_and() {
        let op: Operator = serde_json::from_str("\"or\"").unwrap();
        assert_eq!(op, Operator::Or);
        let op: Operator = serde_json::from_str("\"and\"").unwrap();
        assert_eq!(op, Operator::And);
        let op: Operator = serde_json::from_str("\"OR\"").unwrap();
        assert_eq!(op, Operator::And);
        let op: Operator = serde_json::from_str("\"xor\"").unwrap();
        assert_eq!(op, Operator::And);
        assert_eq!(Operator::default(), Operator::And);
    }
}
