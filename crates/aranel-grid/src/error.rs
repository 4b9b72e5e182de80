//! Error types for the grid engine.
//!
//! Only configuration defects are errors. A filter value that does not parse
//! for its field is dropped rather than reported (see [`crate::ColumnFilter`]).

use std::fmt;

use thiserror::Error;

/// Errors raised while planning or running a load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A field path in the load options does not resolve against the record type.
    ///
    /// This is a caller or configuration defect and is never swallowed.
    #[error("field path '{path}' does not resolve on {record}: no field '{segment}'")]
    Schema {
        /// The full dotted path as given in the options.
        path: String,
        /// The segment that failed to resolve.
        segment: String,
        /// The record type the segment was looked up on.
        record: String,
    },
}

impl GridError {
    /// Returns `true` for [`GridError::Schema`].
    pub fn is_schema(&self) -> bool {
        matches!(self, GridError::Schema { .. })
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Failure of a load over a fallible record source.
///
/// Source errors are handed back unchanged; the engine never retries.
#[derive(Debug)]
pub enum LoadError<E> {
    /// The options did not fit the record type.
    Grid(GridError),
    /// The record source failed while being enumerated.
    Source(E),
}

impl<E> LoadError<E> {
    /// Returns the source error, if that is what failed.
    pub fn into_source(self) -> Option<E> {
        match self {
            LoadError::Source(err) => Some(err),
            LoadError::Grid(_) => None,
        }
    }
}

impl<E> From<GridError> for LoadError<E> {
    fn from(err: GridError) -> Self {
        LoadError::Grid(err)
    }
}

impl<E: fmt::Display> fmt::Display for LoadError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Grid(err) => fmt::Display::fmt(err, f),
            LoadError::Source(err) => write!(f, "record source failed: {}", err),
        }
    }
}

impl<E> std::error::Error for LoadError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Grid(err) => Some(err),
            LoadError::Source(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_message_names_path_and_segment() {
        let err = GridError::Schema {
            path: "Supplier.Nope".to_string(),
            segment: "Nope".to_string(),
            record: "Supplier".to_string(),
        };
        assert!(err.is_schema());
        assert_eq!(
            err.to_string(),
            "field path 'Supplier.Nope' does not resolve on Supplier: no field 'Nope'"
        );
    }

    #[test]
    fn load_error_keeps_source_unchanged() {
        let err: LoadError<std::io::Error> =
            LoadError::Source(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));
        assert_eq!(err.to_string(), "record source failed: disk gone");

        let source = err.into_source().unwrap();
        assert_eq!(source.kind(), std::io::ErrorKind::Other);
    }
}
