//! Sorting by a dynamically named field.
//!
//! Provides [`Dir`] for sort direction and [`OrderBy`], a resolved sort key
//! that reorders a slice of records in place.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use crate::error::Result;
use crate::locale::Casing;
use crate::record::{resolve, Accessor, GridRecord};
use crate::value::compare_values_with;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    Asc,
    /// Descending order (largest first).
    #[default]
    Desc,
}

impl Dir {
    /// Reads a request's direction string.
    ///
    /// `"asc"` in any case is ascending. Everything else, including a missing
    /// direction, is descending.
    pub fn parse_lenient(direction: Option<&str>) -> Self {
        match direction {
            Some(d) if d.eq_ignore_ascii_case("asc") => Dir::Asc,
            _ => Dir::Desc,
        }
    }

    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the wire name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sort key resolved against a record type.
///
/// Text keys order case-insensitively under the key's [`Casing`], with an
/// ordinal tiebreak between strings that differ only in case.
pub struct OrderBy<T> {
    path: String,
    dir: Dir,
    accessor: Accessor<T>,
    casing: Casing,
}

impl<T: GridRecord> OrderBy<T> {
    /// Resolves `path` on `T`.
    pub fn new(path: &str, dir: Dir) -> Result<Self> {
        Ok(OrderBy {
            path: path.to_string(),
            dir,
            accessor: resolve::<T>(path)?,
            casing: Casing::Invariant,
        })
    }

    /// Sets the casing rules used to order text keys.
    pub fn casing(mut self, casing: Casing) -> Self {
        self.casing = casing;
        self
    }

    /// Builds the sort key from a request's `sortColumn` and `sortDirection`.
    ///
    /// Returns `Ok(None)` when no column is named.
    pub fn from_request(column: Option<&str>, direction: Option<&str>) -> Result<Option<Self>> {
        match column {
            Some(path) if !path.trim().is_empty() => {
                OrderBy::new(path, Dir::parse_lenient(direction)).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Returns the field path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the direction.
    pub fn dir(&self) -> Dir {
        self.dir
    }

    /// Compares two records by this key.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let (a, b) = (self.accessor.get(a), self.accessor.get(b));
        self.dir.apply(compare_values_with(&a, &b, self.casing))
    }

    /// Sorts `records` in place. Records with equal keys keep their order.
    pub fn apply<R: Borrow<T>>(&self, records: &mut [R]) {
        records.sort_by(|a, b| self.compare(a.borrow(), b.borrow()));
    }
}

impl<T> fmt::Debug for OrderBy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBy")
            .field("path", &self.path)
            .field("dir", &self.dir)
            .field("casing", &self.casing)
            .finish()
    }
}
