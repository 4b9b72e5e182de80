//! Aranel Grid - dynamic filter, sort and paging engine for typed records.
//!
//! A data grid sends a [`LoadOptions`] descriptor with every load: column
//! filters, a global search term, a sort column and a page window. This crate
//! turns that descriptor into one page of records from any collection whose
//! type implements [`GridRecord`], without per-field code in the caller.
//!
//! - Dotted field paths (`Supplier.Country`) resolve against nested records
//! - Comparison semantics follow each field's runtime type
//! - Column filters fold left to right with AND/OR; the global term is ORed
//!   across its columns
//! - Stable sort by any field, ascending or descending
//! - Paging with a `-1` sentinel that returns everything
//! - Culture-aware parsing of numbers, dates and case through [`Locale`]
//!
//! # Quick Start
//!
//! ```rust
//! use aranel_grid::{GridRecord, LoadOptions, Loader, MatchMode};
//! use rust_decimal::Decimal;
//!
//! #[derive(GridRecord)]
//! #[grid(rename_all = "PascalCase")]
//! struct Product {
//!     name: String,
//!     category: String,
//!     price: Decimal,
//! }
//!
//! let product = |name: &str, category: &str, cents| Product {
//!     name: name.into(),
//!     category: category.into(),
//!     price: Decimal::new(cents, 2),
//! };
//! let products = vec![
//!     product("Laptop Stand", "Office", 4999),
//!     product("Desk Chair", "Office", 18900),
//!     product("Lap Desk", "Home", 2950),
//! ];
//!
//! let options = LoadOptions::new()
//!     .filter("Price", MatchMode::Lt, "100")
//!     .global("lap", ["Name", "Category"])
//!     .sort_asc("Price");
//!
//! let page = Loader::new().load(&options, &products).unwrap();
//! assert_eq!(page.total_items, 2);
//! assert_eq!(page.items[0].name, "Lap Desk");
//! ```
//!
//! # Pipeline
//!
//! ```text
//! column filters → global filter → sort → page window
//! ```
//!
//! Every path in the descriptor is resolved before any record is read. An
//! unknown path is a [`GridError::Schema`]; a filter value that does not parse
//! for its field is dropped instead.
//!
//! # Field Types and Match Modes
//!
//! | Type | Modes |
//! |------|-------|
//! | String | `contains`, `startsWith`, `endsWith`, `equals` (case-insensitive) |
//! | Bool | `equals` |
//! | DateTime | `equals`, `notEquals` (by date), `gt`, `gte`, `lt`, `lte` |
//! | Int, Decimal, Float | `equals`, `notEquals`, `gt`, `gte`, `lt`, `lte` |
//! | Opaque | none |

mod clause;
mod error;
mod loader;
mod locale;
mod op;
mod options;
mod ordering;
mod pager;
mod predicate;
mod record;
mod value;

// Re-export public API
pub use clause::{build_clause, build_clause_for, Clause, FilterValue, ParseSettings};
pub use error::{GridError, LoadError, Result};
pub use loader::{load, Loader, DEFAULT_UTC_ADJUSTMENT_HOURS};
pub use locale::{Casing, Locale, ParsedDateTime};
pub use op::{MatchMode, Operator};
pub use options::{
    ColumnFilter, ColumnFilters, LoadOptions, LoadResult, ALL_PAGES, DEFAULT_PAGE_SIZE,
};
pub use ordering::{Dir, OrderBy};
pub use pager::paginate;
pub use predicate::{column_predicate, compose, global_predicate, Predicate};
pub use record::{resolve, Accessor, Field, GridRecord, NestedField};
pub use value::{compare_values, compare_values_with, FieldType, GridDateTime, Value};

// Re-export derive macro when feature is enabled
#[cfg(feature = "derive")]
pub use aranel_grid_macros::GridRecord;
