//! Implementation of the `#[derive(GridRecord)]` macro.
//!
//! This macro generates an implementation of the `GridRecord` trait and
//! field name constants for building load options without string typos.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result, Type};

use super::attrs::{parse_field_attrs, parse_record_attrs, unraw, GridType};

/// Main implementation of the GridRecord derive macro.
pub fn grid_record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "GridRecord can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "GridRecord can only be derived for structs",
            ))
        }
    };

    let record_attrs = parse_record_attrs(&input.attrs)?;
    let record_name = record_attrs.name.unwrap_or_else(|| unraw(struct_name));

    let mut field_arms: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let query_name = match (attrs.rename, record_attrs.rename_all) {
            (Some(rename), _) => rename,
            (None, Some(rule)) => rule.apply(&unraw(field_name)),
            (None, None) => unraw(field_name),
        };

        if seen.contains(&query_name) {
            return Err(Error::new(
                field.span(),
                format!("duplicate grid field name '{}'", query_name),
            ));
        }
        seen.push(query_name.clone());

        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));
        field_constants.push(quote! {
            /// Field name constant for load options.
            pub const #const_name: &'static str = #query_name;
        });

        let field_expr = if attrs.nested {
            let ty = &field.ty;
            quote! {
                ::aranel_grid::Field::nested::<#ty, _>(|record: &Self| &record.#field_name)
            }
        } else {
            let grid_type = attrs.grid_type.unwrap_or_else(|| infer_grid_type(&field.ty));
            value_field(grid_type, field_name)
        };

        field_arms.push(quote! {
            #query_name => ::core::option::Option::Some(#field_expr),
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::aranel_grid::GridRecord for #struct_name #ty_generics #where_clause {
            const RECORD_NAME: &'static str = #record_name;

            fn field(name: &str) -> ::core::option::Option<::aranel_grid::Field<Self>> {
                match name {
                    #(#field_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };

    Ok(expanded)
}

/// Builds the `Field::value` expression for a leaf field.
fn value_field(grid_type: GridType, field_name: &syn::Ident) -> TokenStream {
    let (tag, value) = match grid_type {
        GridType::String => (
            quote! { String },
            quote! {
                ::aranel_grid::Value::String(
                    ::core::convert::AsRef::<str>::as_ref(&record.#field_name)
                )
            },
        ),
        GridType::Bool => (
            quote! { Bool },
            quote! { ::aranel_grid::Value::Bool(record.#field_name) },
        ),
        GridType::DateTime => (
            quote! { DateTime },
            quote! {
                ::aranel_grid::Value::DateTime(
                    ::aranel_grid::GridDateTime::grid_datetime(&record.#field_name)
                )
            },
        ),
        GridType::Int => (
            quote! { Int },
            quote! {
                ::aranel_grid::Value::Int(::core::convert::Into::<i32>::into(record.#field_name))
            },
        ),
        GridType::Decimal => (
            quote! { Decimal },
            quote! {
                ::aranel_grid::Value::Decimal(::core::convert::Into::into(record.#field_name))
            },
        ),
        GridType::Float => (
            quote! { Float },
            quote! {
                ::aranel_grid::Value::Float(::core::convert::Into::<f64>::into(record.#field_name))
            },
        ),
        GridType::Opaque => {
            return quote! {
                ::aranel_grid::Field::value(
                    ::aranel_grid::FieldType::Opaque,
                    |_: &Self| ::aranel_grid::Value::Opaque,
                )
            };
        }
    };

    quote! {
        ::aranel_grid::Field::value(
            ::aranel_grid::FieldType::#tag,
            |record: &Self| #value,
        )
    }
}

/// Picks a runtime type from the field's Rust type.
///
/// Only the last path segment is inspected, so type aliases and unfamiliar
/// types fall back to `Opaque`; use `#[grid(...)]` to say otherwise.
fn infer_grid_type(ty: &Type) -> GridType {
    let ty = match ty {
        Type::Reference(reference) => &*reference.elem,
        other => other,
    };
    let Type::Path(path) = ty else {
        return GridType::Opaque;
    };
    let Some(last) = path.path.segments.last() else {
        return GridType::Opaque;
    };

    match last.ident.to_string().as_str() {
        "String" | "str" => GridType::String,
        "bool" => GridType::Bool,
        "i8" | "i16" | "i32" | "u8" | "u16" => GridType::Int,
        "Decimal" => GridType::Decimal,
        "f32" | "f64" => GridType::Float,
        "NaiveDateTime" | "NaiveDate" | "DateTime" => GridType::DateTime,
        _ => GridType::Opaque,
    }
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' || c == '.' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.extend(c.to_uppercase());
            prev_was_lower = c.is_alphanumeric();
        }
    }

    result
}
