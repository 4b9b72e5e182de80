//! Predicate composition.
//!
//! A [`Predicate`] is a tree of [`Clause`] leaves joined by explicit AND/OR
//! nodes. [`column_predicate`] folds a request's column filters into one such
//! tree, [`global_predicate`] ORs a search term across several columns, and
//! [`compose`] joins the two.

use std::fmt;

use indexmap::IndexMap;

use crate::clause::{build_clause, Clause, ParseSettings};
use crate::error::Result;
use crate::op::{MatchMode, Operator};
use crate::options::ColumnFilters;
use crate::record::{resolve, GridRecord};

/// A boolean expression over records of type `T`.
///
/// Combining with [`Predicate::Always`] simplifies away: `Always AND p` is
/// `p`, and `Always OR p` is `Always`.
pub enum Predicate<T> {
    /// Matches every record.
    Always,
    /// A single field comparison.
    Clause(Clause<T>),
    /// Both sides must match.
    And(Box<Predicate<T>>, Box<Predicate<T>>),
    /// Either side must match.
    Or(Box<Predicate<T>>, Box<Predicate<T>>),
}

impl<T> Default for Predicate<T> {
    fn default() -> Self {
        Predicate::Always
    }
}

impl<T: 'static> Predicate<T> {
    /// Joins `self` and `other` with AND.
    pub fn and(self, other: Predicate<T>) -> Predicate<T> {
        match (self, other) {
            (Predicate::Always, p) | (p, Predicate::Always) => p,
            (a, b) => Predicate::And(Box::new(a), Box::new(b)),
        }
    }

    /// Joins `self` and `other` with OR.
    pub fn or(self, other: Predicate<T>) -> Predicate<T> {
        match (self, other) {
            (Predicate::Always, _) | (_, Predicate::Always) => Predicate::Always,
            (a, b) => Predicate::Or(Box::new(a), Box::new(b)),
        }
    }

    /// Joins `self` and `other` with the given operator.
    pub fn join(self, operator: Operator, other: Predicate<T>) -> Predicate<T> {
        match operator {
            Operator::And => self.and(other),
            Operator::Or => self.or(other),
        }
    }

    /// Returns `true` if this predicate matches every record.
    pub fn is_always(&self) -> bool {
        matches!(self, Predicate::Always)
    }

    /// Number of clause leaves in the tree.
    pub fn clause_count(&self) -> usize {
        match self {
            Predicate::Always => 0,
            Predicate::Clause(_) => 1,
            Predicate::And(a, b) | Predicate::Or(a, b) => a.clause_count() + b.clause_count(),
        }
    }

    /// Evaluates this predicate against a record.
    pub fn matches(&self, record: &T) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Clause(clause) => clause.matches(record),
            Predicate::And(a, b) => a.matches(record) && b.matches(record),
            Predicate::Or(a, b) => a.matches(record) || b.matches(record),
        }
    }
}

impl<T> From<Clause<T>> for Predicate<T> {
    fn from(clause: Clause<T>) -> Self {
        Predicate::Clause(clause)
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Always => write!(f, "Always"),
            Predicate::Clause(clause) => fmt::Debug::fmt(clause, f),
            Predicate::And(a, b) => f.debug_tuple("And").field(a).field(b).finish(),
            Predicate::Or(a, b) => f.debug_tuple("Or").field(a).field(b).finish(),
        }
    }
}

/// Folds column filters into one predicate.
///
/// Constraints are visited in request order. The first one that builds a
/// clause seeds the fold; each later one joins the accumulated predicate with
/// its own operator, strictly left to right. Constraints that build no clause
/// are skipped without affecting the fold.
///
/// Every key is resolved, even when its filter value is empty.
pub fn column_predicate<T: GridRecord>(
    filters: &IndexMap<String, ColumnFilters>,
    settings: ParseSettings<'_>,
) -> Result<Predicate<T>> {
    let mut running: Option<Predicate<T>> = None;

    for (path, constraints) in filters {
        resolve::<T>(path)?;
        for constraint in constraints.iter() {
            let filter = constraint.filter.as_deref();
            let Some(clause) = build_clause::<T>(path, filter, constraint.match_mode, settings)?
            else {
                continue;
            };
            running = Some(match running {
                None => clause.into(),
                Some(acc) => acc.join(constraint.operator, clause.into()),
            });
        }
    }

    Ok(Predicate::Always.and(running.unwrap_or_default()))
}

/// ORs a `contains` clause for `term` across `columns`.
///
/// Columns are always resolved. A blank term, an empty column list, or a list
/// where no column accepts `contains` yields [`Predicate::Always`].
pub fn global_predicate<T: GridRecord>(
    term: Option<&str>,
    columns: &[String],
    settings: ParseSettings<'_>,
) -> Result<Predicate<T>> {
    let mut any: Option<Predicate<T>> = None;

    for column in columns {
        let clause = build_clause::<T>(column, term, MatchMode::Contains, settings)?;
        if let Some(clause) = clause {
            any = Some(match any {
                None => clause.into(),
                Some(acc) => acc.or(clause.into()),
            });
        }
    }

    Ok(any.unwrap_or_default())
}

/// Joins the column and global predicates onto an always-true base.
pub fn compose<T: 'static>(column: Predicate<T>, global: Predicate<T>) -> Predicate<T> {
    Predicate::Always.and(column).and(global)
}
