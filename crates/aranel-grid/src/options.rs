//! Request and response contracts.
//!
//! [`LoadOptions`] is the descriptor a grid sends with every load, and
//! [`LoadResult`] is the page handed back. Both use camelCase JSON keys.
//! Fields that a client may send as `null` fall back to their defaults.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::op::{MatchMode, Operator};

/// Page number that disables paging and returns every matching record.
pub const ALL_PAGES: i32 = -1;

/// Page size used when a request does not name one.
pub const DEFAULT_PAGE_SIZE: i32 = 5;

/// One constraint on a column.
///
/// A missing or blank `filter`, a value that does not parse as the column's
/// type, or a mode the column's type does not support all leave the
/// constraint out of the predicate rather than failing the request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnFilter {
    /// Raw filter value as typed by the user.
    pub filter: Option<String>,
    /// Requested comparison.
    #[serde(deserialize_with = "null_as_default")]
    pub match_mode: MatchMode,
    /// How this constraint joins the ones before it.
    #[serde(deserialize_with = "null_as_default")]
    pub operator: Operator,
}

impl ColumnFilter {
    /// Creates an AND-joined constraint.
    pub fn new(match_mode: MatchMode, filter: impl Into<String>) -> Self {
        ColumnFilter {
            filter: Some(filter.into()),
            match_mode,
            operator: Operator::And,
        }
    }

    /// Sets the join operator.
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    /// Makes this constraint OR-joined.
    pub fn or(self) -> Self {
        self.with_operator(Operator::Or)
    }
}

/// The constraints attached to one column: a single object or an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnFilters {
    /// Several constraints, applied in order.
    Many(Vec<ColumnFilter>),
    /// One constraint.
    One(ColumnFilter),
}

impl ColumnFilters {
    /// Iterates the constraints in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ColumnFilter> {
        match self {
            ColumnFilters::Many(filters) => filters.iter(),
            ColumnFilters::One(filter) => std::slice::from_ref(filter).iter(),
        }
    }

    /// Number of constraints.
    pub fn len(&self) -> usize {
        self.iter().len()
    }

    /// Returns `true` for an empty array.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, filter: ColumnFilter) {
        match self {
            ColumnFilters::Many(filters) => filters.push(filter),
            ColumnFilters::One(first) => {
                let first = std::mem::take(first);
                *self = ColumnFilters::Many(vec![first, filter]);
            }
        }
    }
}

impl From<ColumnFilter> for ColumnFilters {
    fn from(filter: ColumnFilter) -> Self {
        ColumnFilters::One(filter)
    }
}

impl From<Vec<ColumnFilter>> for ColumnFilters {
    fn from(filters: Vec<ColumnFilter>) -> Self {
        ColumnFilters::Many(filters)
    }
}

/// A load request.
///
/// Usually deserialized from a grid's request body, but can be built in code:
///
/// ```
/// use aranel_grid::{LoadOptions, MatchMode};
///
/// let options = LoadOptions::new()
///     .page(2, 20)
///     .filter("Price", MatchMode::Gte, "100")
///     .or_filter("Category", MatchMode::Equals, "Books")
///     .global("lap", ["Name", "Category"])
///     .sort_desc("ReleaseDate");
///
/// assert_eq!(options.page_number, 2);
/// assert_eq!(options.column_filters.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadOptions {
    /// 1-based page number, or [`ALL_PAGES`].
    pub page_number: i32,
    /// Records per page. Ignored when paging is disabled.
    pub page_size: i32,
    /// Search term matched against every global filter column.
    #[serde(deserialize_with = "null_as_default")]
    pub global_filter: String,
    /// Columns the global filter searches.
    #[serde(deserialize_with = "null_as_default")]
    pub global_filter_columns: Vec<String>,
    /// Field path to sort by.
    pub sort_column: Option<String>,
    /// `"asc"` for ascending; anything else sorts descending.
    pub sort_direction: Option<String>,
    /// Per-column constraints keyed by field path, in request order.
    #[serde(deserialize_with = "null_as_default")]
    pub column_filters: IndexMap<String, ColumnFilters>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            global_filter: String::new(),
            global_filter_columns: Vec::new(),
            sort_column: None,
            sort_direction: None,
            column_filters: IndexMap::new(),
        }
    }
}

impl LoadOptions {
    /// Creates options for the first page with no filters or sort.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page window.
    pub fn page(mut self, number: i32, size: i32) -> Self {
        self.page_number = number;
        self.page_size = size;
        self
    }

    /// Disables paging.
    pub fn all_pages(mut self) -> Self {
        self.page_number = ALL_PAGES;
        self
    }

    /// Returns `true` if paging is disabled.
    pub fn is_all_pages(&self) -> bool {
        self.page_number == ALL_PAGES
    }

    /// Adds an AND-joined constraint on `path`.
    pub fn filter(
        self,
        path: impl Into<String>,
        mode: MatchMode,
        value: impl Into<String>,
    ) -> Self {
        self.constrain(path, ColumnFilter::new(mode, value))
    }

    /// Adds an OR-joined constraint on `path`.
    pub fn or_filter(
        self,
        path: impl Into<String>,
        mode: MatchMode,
        value: impl Into<String>,
    ) -> Self {
        self.constrain(path, ColumnFilter::new(mode, value).or())
    }

    /// Adds a constraint on `path`, after any already on it.
    pub fn constrain(mut self, path: impl Into<String>, filter: ColumnFilter) -> Self {
        match self.column_filters.entry(path.into()) {
            indexmap::map::Entry::Occupied(mut entry) => entry.get_mut().push(filter),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(ColumnFilters::One(filter));
            }
        }
        self
    }

    /// Sets the global search term and the columns it searches.
    pub fn global<I, S>(mut self, term: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global_filter = term.into();
        self.global_filter_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sorts ascending by `path`.
    pub fn sort_asc(self, path: impl Into<String>) -> Self {
        self.sort_by(path, "asc")
    }

    /// Sorts descending by `path`.
    pub fn sort_desc(self, path: impl Into<String>) -> Self {
        self.sort_by(path, "desc")
    }

    /// Sorts by `path` with a raw direction string.
    pub fn sort_by(mut self, path: impl Into<String>, direction: impl Into<String>) -> Self {
        self.sort_column = Some(path.into());
        self.sort_direction = Some(direction.into());
        self
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResult<T> {
    /// Number of records that passed the filters.
    pub total_items: usize,
    /// Number of pages at the requested size.
    pub total_pages: usize,
    /// Records on this page.
    pub items: Vec<T>,
}

impl<T> LoadResult<T> {
    /// Transforms the items, keeping the counts.
    pub fn map<U, F>(self, f: F) -> LoadResult<U>
    where
        F: FnMut(T) -> U,
    {
        LoadResult {
            total_items: self.total_items,
            total_pages: self.total_pages,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

impl<T: Clone> LoadResult<&T> {
    /// Clones borrowed items into an owned result.
    pub fn cloned(self) -> LoadResult<T> {
        self.map(T::clone)
    }
}

/// Deserializes `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
