//! Proc macros for Aranel Grid.
//!
//! # Derive Macros
//!
//! - [`GridRecord`] - Generate the field accessor registry the load engine
//!   uses to resolve filter and sort paths
//!
//! For working examples, see `aranel-grid/tests/derive.rs`.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `GridRecord` trait for a struct with named fields.
///
/// Every field not marked `skip` becomes queryable under its name. The
/// runtime type is inferred from the Rust type when not given:
///
/// | Rust type | Grid type |
/// |-----------|-----------|
/// | `String`, `&str` | `String` |
/// | `bool` | `Bool` |
/// | `i8`, `i16`, `i32`, `u8`, `u16` | `Int` |
/// | `Decimal` | `Decimal` |
/// | `f32`, `f64` | `Float` |
/// | `NaiveDateTime`, `NaiveDate`, `DateTime<Tz>` | `DateTime` |
/// | anything else | `Opaque` |
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `String`, `Bool`, `DateTime`, `Int`, `Decimal`, `Float`, `Opaque` | Override the inferred type |
/// | `ty = "..."` | Same, as a string |
/// | `nested` | The field is a `GridRecord`; dotted paths continue into it |
/// | `skip` | Exclude this field |
/// | `rename = "..."` | Use a custom query name |
///
/// # Record Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `rename_all = "..."` | `PascalCase`, `camelCase` or `snake_case` query names |
/// | `name = "..."` | Record name shown in schema errors |
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Product::RELEASE_DATE`)
/// 2. Implementation of `GridRecord`
///
/// # Example
///
/// ```ignore
/// use aranel_grid::{GridRecord, LoadOptions, Loader, MatchMode};
///
/// #[derive(GridRecord)]
/// #[grid(rename_all = "PascalCase")]
/// struct Supplier {
///     country: String,
/// }
///
/// #[derive(GridRecord)]
/// #[grid(rename_all = "PascalCase")]
/// struct Product {
///     name: String,
///     #[grid(nested)]
///     supplier: Supplier,
///     #[grid(skip)]
///     internal_sku: u64,
/// }
///
/// let options = LoadOptions::new()
///     .filter("Supplier.Country", MatchMode::Equals, "turkey")
///     .sort_asc(Product::NAME);
/// let page = Loader::new().load(&options, &products)?;
/// ```
#[proc_macro_derive(GridRecord, attributes(grid))]
pub fn grid_record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::grid_record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
