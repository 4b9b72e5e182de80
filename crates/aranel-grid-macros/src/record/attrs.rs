//! Attribute parsing for the GridRecord derive macro.
//!
//! Field attributes take the form `#[grid(...)]` on a field; record
//! attributes take the same form on the struct itself.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Ident, Lit, LitStr, Meta, Result, Token,
};

/// The runtime type a field is exposed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridType {
    /// `#[grid(String)]`
    String,
    /// `#[grid(Bool)]`
    Bool,
    /// `#[grid(DateTime)]`
    DateTime,
    /// `#[grid(Int)]`
    Int,
    /// `#[grid(Decimal)]`
    Decimal,
    /// `#[grid(Float)]`
    Float,
    /// `#[grid(Opaque)]`
    Opaque,
}

const EXPECTED_TYPES: &str = "String, Bool, DateTime, Int, Decimal, Float, Opaque";

impl GridType {
    /// Parses a type name, accepting the capitalized and lowercase spellings.
    pub fn parse_name(name: &str, span: Span) -> Result<Self> {
        match name {
            "String" | "string" => Ok(GridType::String),
            "Bool" | "bool" | "boolean" => Ok(GridType::Bool),
            "DateTime" | "datetime" | "date" => Ok(GridType::DateTime),
            "Int" | "int" | "i32" => Ok(GridType::Int),
            "Decimal" | "decimal" => Ok(GridType::Decimal),
            "Float" | "float" | "f64" => Ok(GridType::Float),
            "Opaque" | "opaque" => Ok(GridType::Opaque),
            other => Err(Error::new(
                span,
                format!("unknown grid type: '{}'. Expected one of: {}", other, EXPECTED_TYPES),
            )),
        }
    }
}

/// Field-level attributes from `#[grid(...)]`.
#[derive(Debug, Clone, Default)]
pub struct FieldAttr {
    /// Explicit runtime type; inferred from the Rust type when absent.
    pub grid_type: Option<GridType>,
    /// The field is itself a `GridRecord` reached by dotted paths.
    pub nested: bool,
    /// Leave this field out of the registry.
    pub skip: bool,
    /// Query name (default: the field name after `rename_all`).
    pub rename: Option<String>,
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                // grid(skip), grid(nested), grid(Decimal), ...
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if p.is_ident("nested") {
                        attr.nested = true;
                    } else if let Some(ident) = p.get_ident() {
                        let name = ident.to_string();
                        attr.grid_type = Some(GridType::parse_name(&name, ident.span())?);
                    } else {
                        return Err(Error::new(
                            p.span(),
                            format!("expected grid type ({}), nested, or skip", EXPECTED_TYPES),
                        ));
                    }
                }

                // rename = "Name" or ty = "decimal"
                Meta::NameValue(nv) => {
                    if nv.path.is_ident("rename") {
                        attr.rename = Some(string_value(&nv.value, "rename")?.value());
                    } else if nv.path.is_ident("ty") {
                        let s = string_value(&nv.value, "ty")?;
                        attr.grid_type = Some(GridType::parse_name(&s.value(), s.span())?);
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename or ty",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown grid attribute. Expected a type, nested, skip, rename = \"...\", or ty = \"...\"",
                    ));
                }
            }
        }

        if attr.nested && attr.grid_type.is_some() {
            return Err(Error::new(
                input.span(),
                "a nested field cannot also declare a grid type",
            ));
        }

        Ok(attr)
    }
}

/// Case convention applied to field names by `rename_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    /// `release_date` becomes `ReleaseDate`.
    PascalCase,
    /// `release_date` becomes `releaseDate`.
    CamelCase,
    /// Field names are used as written.
    SnakeCase,
}

impl RenameRule {
    fn parse_name(s: &LitStr) -> Result<Self> {
        match s.value().as_str() {
            "PascalCase" => Ok(RenameRule::PascalCase),
            "camelCase" => Ok(RenameRule::CamelCase),
            "snake_case" => Ok(RenameRule::SnakeCase),
            other => Err(Error::new(
                s.span(),
                format!(
                    "unknown rename rule: '{}'. Expected one of: PascalCase, camelCase, snake_case",
                    other
                ),
            )),
        }
    }

    /// Applies this rule to a snake_case field name.
    pub fn apply(self, field: &str) -> String {
        match self {
            RenameRule::SnakeCase => field.to_string(),
            RenameRule::PascalCase | RenameRule::CamelCase => {
                let mut out = String::with_capacity(field.len());
                let mut upper = self == RenameRule::PascalCase;
                for c in field.trim_start_matches("r#").chars() {
                    if c == '_' {
                        upper = !out.is_empty() || self == RenameRule::PascalCase;
                    } else if upper {
                        out.extend(c.to_uppercase());
                        upper = false;
                    } else {
                        out.push(c);
                    }
                }
                out
            }
        }
    }
}

/// Struct-level attributes from `#[grid(...)]`.
#[derive(Debug, Clone, Default)]
pub struct RecordAttr {
    /// Case convention for query names.
    pub rename_all: Option<RenameRule>,
    /// Record name used in error messages (default: the struct name).
    pub name: Option<String>,
}

impl Parse for RecordAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = RecordAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            let Meta::NameValue(nv) = &meta else {
                return Err(Error::new(
                    meta.span(),
                    "unknown record attribute. Expected: rename_all = \"...\" or name = \"...\"",
                ));
            };
            if nv.path.is_ident("rename_all") {
                let rule = string_value(&nv.value, "rename_all")?;
                attr.rename_all = Some(RenameRule::parse_name(rule)?);
            } else if nv.path.is_ident("name") {
                attr.name = Some(string_value(&nv.value, "name")?.value());
            } else {
                return Err(Error::new(
                    nv.path.span(),
                    "unknown attribute. Expected: rename_all or name",
                ));
            }
        }

        Ok(attr)
    }
}

fn string_value<'a>(value: &'a Expr, key: &str) -> Result<&'a LitStr> {
    match value {
        Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => Ok(s),
        other => Err(Error::new(
            other.span(),
            format!("{} must be a string literal", key),
        )),
    }
}

fn find_grid_attr(attrs: &[Attribute]) -> Option<&Attribute> {
    attrs.iter().find(|attr| attr.path().is_ident("grid"))
}

/// Extract `#[grid(...)]` from a field's attributes.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    match find_grid_attr(attrs) {
        Some(attr) => attr.parse_args::<FieldAttr>(),
        None => Ok(FieldAttr::default()),
    }
}

/// Extract `#[grid(...)]` from a struct's attributes.
pub fn parse_record_attrs(attrs: &[Attribute]) -> Result<RecordAttr> {
    match find_grid_attr(attrs) {
        Some(attr) => attr.parse_args::<RecordAttr>(),
        None => Ok(RecordAttr::default()),
    }
}

/// Returns the identifier's text without a raw-identifier prefix.
pub fn unraw(ident: &Ident) -> String {
    ident.to_string().trim_start_matches("r#").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_field(tokens: &str) -> Result<FieldAttr> {
        syn::parse_str::<FieldAttr>(tokens)
    }

    fn parse_record(tokens: &str) -> Result<RecordAttr> {
        syn::parse_str::<RecordAttr>(tokens)
    }

    #[test]
    fn test_grid_types() {
        assert_eq!(parse_field("String").unwrap().grid_type, Some(GridType::String));
        assert_eq!(parse_field("Bool").unwrap().grid_type, Some(GridType::Bool));
        assert_eq!(parse_field("DateTime").unwrap().grid_type, Some(GridType::DateTime));
        assert_eq!(parse_field("Int").unwrap().grid_type, Some(GridType::Int));
        assert_eq!(parse_field("Decimal").unwrap().grid_type, Some(GridType::Decimal));
        assert_eq!(parse_field("Float").unwrap().grid_type, Some(GridType::Float));
        assert_eq!(parse_field("Opaque").unwrap().grid_type, Some(GridType::Opaque));
    }

    #[test]
    fn test_grid_type_lowercase() {
        assert_eq!(parse_field("decimal").unwrap().grid_type, Some(GridType::Decimal));
        assert_eq!(parse_field("boolean").unwrap().grid_type, Some(GridType::Bool));
    }

    #[test]
    fn test_grid_ty_string() {
        let attr = parse_field(r#"ty = "datetime""#).unwrap();
        assert_eq!(attr.grid_type, Some(GridType::DateTime));
    }

    #[test]
    fn test_grid_skip_and_nested() {
        let attr = parse_field("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.grid_type, None);

        let attr = parse_field("nested").unwrap();
        assert!(attr.nested);
    }

    #[test]
    fn test_grid_rename() {
        let attr = parse_field(r#"Decimal, rename = "UnitPrice""#).unwrap();
        assert_eq!(attr.grid_type, Some(GridType::Decimal));
        assert_eq!(attr.rename, Some("UnitPrice".to_string()));
    }

    #[test]
    fn test_grid_nested_with_type_rejected() {
        let err = parse_field("nested, Int").unwrap_err();
        assert!(err.to_string().contains("nested field"));
    }

    #[test]
    fn test_grid_invalid_type() {
        let err = parse_field("Money").unwrap_err();
        assert!(err.to_string().contains("unknown grid type"));

        let err = parse_field(r#"rename = 5"#).unwrap_err();
        assert!(err.to_string().contains("string literal"));
    }

    #[test]
    fn test_record_attrs() {
        let attr = parse_record(r#"rename_all = "PascalCase", name = "Product""#).unwrap();
        assert_eq!(attr.rename_all, Some(RenameRule::PascalCase));
        assert_eq!(attr.name, Some("Product".to_string()));

        assert!(parse_record(r#"rename_all = "kebab-case""#).is_err());
        assert!(parse_record("skip").is_err());
    }

    #[test]
    fn test_rename_rules() {
        assert_eq!(RenameRule::PascalCase.apply("release_date"), "ReleaseDate");
        assert_eq!(RenameRule::PascalCase.apply("id"), "Id");
        assert_eq!(RenameRule::CamelCase.apply("release_date"), "releaseDate");
        assert_eq!(RenameRule::CamelCase.apply("in_stock"), "inStock");
        assert_eq!(RenameRule::SnakeCase.apply("in_stock"), "in_stock");
    }
}
