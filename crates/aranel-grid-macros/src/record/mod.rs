//! Implementation of the `#[derive(GridRecord)]` macro.
//!
//! Generates the field accessor registry and field name constants from
//! struct annotations.

mod attrs;
mod derive;

pub use derive::grid_record_derive_impl;
