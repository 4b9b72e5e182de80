//! Field accessor registry for record types.
//!
//! A record type implements [`GridRecord`] by naming its fields: each name
//! maps either to a typed leaf [`Accessor`] or to a nested record. Dotted
//! paths such as `Supplier.Country` resolve by chaining those accessors into
//! one `Accessor` over the root type, once per request and before any record
//! is read.

use std::fmt;
use std::sync::Arc;

use crate::error::{GridError, Result};
use crate::value::{FieldType, Value};

type Getter<T> = Arc<dyn for<'a> Fn(&'a T) -> Value<'a> + Send + Sync>;
type Projection<P, T> = Arc<dyn for<'a> Fn(&'a P) -> &'a T + Send + Sync>;

/// A typed reader for one (possibly nested) field of `T`.
pub struct Accessor<T> {
    field_type: FieldType,
    get: Getter<T>,
}

impl<T: 'static> Accessor<T> {
    /// Creates an accessor from its field type and reader function.
    ///
    /// The reader must return values of `field_type` (or `Value::Opaque` for
    /// opaque fields).
    pub fn new<F>(field_type: FieldType, get: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        Accessor {
            field_type,
            get: Arc::new(get),
        }
    }

    /// Returns the runtime type of the field.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Reads the field from a record.
    pub fn get<'a>(&self, record: &'a T) -> Value<'a> {
        (self.get)(record)
    }

    /// Lifts this accessor onto a parent type that contains `T`.
    fn through<P: 'static>(self, project: Projection<P, T>) -> Accessor<P> {
        let get = self.get;
        Accessor::new(self.field_type, move |record: &P| get(project(record)))
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        Accessor {
            field_type: self.field_type,
            get: Arc::clone(&self.get),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("field_type", &self.field_type)
            .finish_non_exhaustive()
    }
}

/// One named entry of a record's registry.
pub enum Field<T> {
    /// A value the engine reads directly.
    Value(Accessor<T>),
    /// A nested record; further path segments resolve against it.
    Nested(NestedField<T>),
}

impl<T: 'static> Field<T> {
    /// A leaf field.
    pub fn value<F>(field_type: FieldType, get: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        Field::Value(Accessor::new(field_type, get))
    }

    /// A nested record field, reached through `project`.
    pub fn nested<U, F>(project: F) -> Self
    where
        U: GridRecord,
        F: for<'a> Fn(&'a T) -> &'a U + Send + Sync + 'static,
    {
        let project: Projection<T, U> = Arc::new(project);
        Field::Nested(NestedField {
            record: U::RECORD_NAME,
            resolve: Box::new(move |rest: &[&str]| {
                resolve_segments::<U>(rest).map(|inner| inner.through(Arc::clone(&project)))
            }),
        })
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Value(accessor) => f.debug_tuple("Value").field(accessor).finish(),
            Field::Nested(nested) => f.debug_tuple("Nested").field(&nested.record).finish(),
        }
    }
}

type NestedResolver<T> =
    Box<dyn Fn(&[&str]) -> std::result::Result<Accessor<T>, Unresolved> + Send + Sync>;

/// A nested record entry; see [`Field::nested`].
pub struct NestedField<T> {
    record: &'static str,
    resolve: NestedResolver<T>,
}

impl<T> NestedField<T> {
    /// Name of the nested record type.
    pub fn record_name(&self) -> &'static str {
        self.record
    }
}

/// Where a path stopped resolving.
#[derive(Debug)]
struct Unresolved {
    segment: String,
    record: String,
}

/// Trait for record types the engine can filter and sort.
///
/// This trait is normally derived with `#[derive(GridRecord)]`, but can also
/// be implemented by hand.
///
/// # Manual Implementation
///
/// ```
/// use aranel_grid::{Field, FieldType, GridRecord, Value};
///
/// struct Product {
///     name: String,
///     stock: i32,
/// }
///
/// impl GridRecord for Product {
///     const RECORD_NAME: &'static str = "Product";
///
///     fn field(name: &str) -> Option<Field<Self>> {
///         match name {
///             "Name" => Some(Field::value(FieldType::String, |p: &Self| Value::String(&p.name))),
///             "Stock" => Some(Field::value(FieldType::Int, |p: &Self| Value::Int(p.stock))),
///             _ => None,
///         }
///     }
/// }
///
/// let desk = Product { name: "Desk".into(), stock: 3 };
/// assert_eq!(desk.grid_value("Stock").unwrap(), Value::Int(3));
/// assert!(desk.grid_value("Colour").is_err());
/// ```
pub trait GridRecord: Sized + 'static {
    /// Type name used in error messages.
    const RECORD_NAME: &'static str;

    /// Looks up one field by its query name.
    ///
    /// Returns `None` if the record has no such field.
    fn field(name: &str) -> Option<Field<Self>>;

    /// Reads a (possibly dotted) field path from this record.
    fn grid_value(&self, path: &str) -> Result<Value<'_>> {
        Ok(resolve::<Self>(path)?.get(self))
    }
}

/// Resolves a dotted field path against `T`.
///
/// Fails with [`GridError::Schema`] if a segment is missing, if a leaf value
/// is followed by further segments, or if the path ends on a nested record.
pub fn resolve<T: GridRecord>(path: &str) -> Result<Accessor<T>> {
    let segments: Vec<&str> = path.split('.').collect();
    resolve_segments::<T>(&segments).map_err(|unresolved| GridError::Schema {
        path: path.to_string(),
        segment: unresolved.segment,
        record: unresolved.record,
    })
}

fn resolve_segments<T: GridRecord>(
    segments: &[&str],
) -> std::result::Result<Accessor<T>, Unresolved> {
    let Some((head, rest)) = segments.split_first() else {
        return Err(Unresolved {
            segment: String::new(),
            record: T::RECORD_NAME.to_string(),
        });
    };

    match T::field(head) {
        Some(Field::Value(accessor)) if rest.is_empty() => Ok(accessor),
        Some(Field::Value(_)) => Err(Unresolved {
            segment: rest[0].to_string(),
            record: format!("{}.{}", T::RECORD_NAME, head),
        }),
        Some(Field::Nested(nested)) if !rest.is_empty() => (nested.resolve)(rest),
        Some(Field::Nested(nested)) => Err(Unresolved {
            segment: head.to_string(),
            record: format!("{} (nested record {})", T::RECORD_NAME, nested.record),
        }),
        None => Err(Unresolved {
            segment: head.to_string(),
            record: T::RECORD_NAME.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Address {
        city: String,
    }

    impl GridRecord for Address {
        const RECORD_NAME: &'static str = "Address";

        fn field(name: &str) -> Option<Field<Self>> {
            match name {
                "City" => Some(Field::value(FieldType::String, |a: &Self| Value::String(&a.city))),
                _ => None,
            }
        }
    }

    struct Customer {
        name: String,
        visits: i32,
        address: Address,
    }

    impl GridRecord for Customer {
        const RECORD_NAME: &'static str = "Customer";

        fn field(name: &str) -> Option<Field<Self>> {
            match name {
                "Name" => Some(Field::value(FieldType::String, |c: &Self| Value::String(&c.name))),
                "Visits" => Some(Field::value(FieldType::Int, |c: &Self| Value::Int(c.visits))),
                "Address" => Some(Field::nested::<Address, _>(|c: &Self| &c.address)),
                _ => None,
            }
        }
    }

    fn customer() -> Customer {
        Customer {
            name: "Ayşe".to_string(),
            visits: 4,
            address: Address {
                city: "Izmir".to_string(),
            },
        }
    }

    #[test]
    fn resolves_top_level_fields() {
        let accessor = resolve::<Customer>("Visits").unwrap();
        assert_eq!(accessor.field_type(), FieldType::Int);
        assert_eq!(accessor.get(&customer()), Value::Int(4));
    }

    #[test]
    fn resolves_nested_paths() {
        let record = customer();
        let accessor = resolve::<Customer>("Address.City").unwrap();
        assert_eq!(accessor.field_type(), FieldType::String);
        assert_eq!(accessor.get(&record), Value::String("Izmir"));
        assert_eq!(record.grid_value("Name").unwrap(), Value::String("Ayşe"));
    }

    #[test]
    fn missing_segment_is_schema_error() {
        let err = resolve::<Customer>("Nonexistent.Field").unwrap_err();
        assert_eq!(
            err,
            GridError::Schema {
                path: "Nonexistent.Field".to_string(),
                segment: "Nonexistent".to_string(),
                record: "Customer".to_string(),
            }
        );

        let err = resolve::<Customer>("Address.Street").unwrap_err();
        assert!(matches!(err, GridError::Schema { ref segment, ref record, .. }
            if segment == "Street" && record == "Address"));
    }

    #[test]
    fn path_through_leaf_is_schema_error() {
        let err = resolve::<Customer>("Name.Length").unwrap_err();
        assert!(matches!(err, GridError::Schema { ref segment, .. } if segment == "Length"));
    }

    #[test]
    fn path_ending_on_record_is_schema_error() {
        assert!(resolve::<Customer>("Address").unwrap_err().is_schema());
    }

    #[test]
    fn empty_path_is_schema_error() {
        assert!(resolve::<Customer>("").unwrap_err().is_schema());
        assert!(resolve::<Customer>("Address.").unwrap_err().is_schema());
    }

    #[test]
    fn paths_are_case_sensitive() {
        assert!(resolve::<Customer>("name").is_err());
    }

    #[test]
    fn accessors_are_cheap_to_clone() {
        let accessor = resolve::<Customer>("Address.City").unwrap();
        let copy = accessor.clone();
        assert_eq!(copy.get(&customer()), accessor.get(&customer()));
        assert!(format!("{:?}", copy).contains("String"));
    }
}
