//! Mapping ⇄ entity conversion, validation and documentation.
//!
//! Entity types implement [`Schema`] by pointing at their [`SchemaTable`],
//! exposing field values by name and building themselves from a [`Fields`]
//! reader. The free functions here do the rest generically over the table.
//! Scalars and containers cross the wire through [`FromValue`]/[`ToValue`];
//! entity types get those impls from [`schema_value!`](crate::schema_value)
//! so they nest inside other entities and containers.

use crate::{SchemaError, SchemaTable, Section, Segment, Value};
use std::collections::{BTreeMap, BTreeSet};

/// An entity type described by a static schema table.
///
/// ```ignore
/// static TABLE: LazyLock<SchemaTable> = LazyLock::new(|| {
///     SchemaTable::new("Tag", "A label.", vec![
///         FieldSpec::new("name", "tag name").validate(Validator::NON_EMPTY),
///     ])
/// });
///
/// impl Schema for Tag {
///     fn schema() -> &'static SchemaTable { &TABLE }
///     fn get(&self, field: &str) -> Option<Value> {
///         match field {
///             "name" => Some(self.name.to_value()),
///             _ => None,
///         }
///     }
///     fn construct(fields: &Fields<'_>) -> Result<Self, SchemaError> {
///         Ok(Tag { name: fields.read("name")? })
///     }
/// }
/// ```
pub trait Schema: Sized {
    /// The type's field table.
    fn schema() -> &'static SchemaTable;

    /// Current value of a field, by wire name.
    fn get(&self, field: &str) -> Option<Value>;

    /// Build the entity from a field reader. Validation happens afterwards.
    fn construct(fields: &Fields<'_>) -> Result<Self, SchemaError>;
}

/// Typed read of a wire value.
pub trait FromValue: Sized {
    /// Coerce the value into `Self`, failing on a shape mismatch.
    fn from_value(value: &Value) -> Result<Self, SchemaError>;
}

/// Typed write of a wire value.
pub trait ToValue {
    /// Render `self` as a wire value.
    fn to_value(&self) -> Value;
}

/// Field-by-field reader over one wire mapping, driven by a schema table.
pub struct Fields<'a> {
    table: &'static SchemaTable,
    map: &'a BTreeMap<String, Value>,
}

impl<'a> Fields<'a> {
    /// Wrap a mapping for the given table.
    pub fn new(table: &'static SchemaTable, map: &'a BTreeMap<String, Value>) -> Self {
        Self { table, map }
    }

    /// Read a field by its wire name.
    ///
    /// Absent and null values take the field's default. Wire-excluded fields
    /// always take their default. Any failure is annotated with the field.
    pub fn read<T: FromValue>(&self, name: &str) -> Result<T, SchemaError> {
        let spec = self.table.field(name).ok_or_else(|| {
            SchemaError::unsupported(format!("{} has no field {name}", self.table.name))
        })?;
        let raw = if spec.wire {
            self.map.get(spec.name).filter(|v| !v.is_null())
        } else {
            None
        };
        let result = match (raw, spec.default) {
            (Some(value), _) => T::from_value(value),
            (None, Some(default)) => T::from_value(&default()),
            (None, None) => Err(SchemaError::missing()),
        };
        result.map_err(|e| e.in_field(self.table.name, spec.name))
    }
}

/// Run every field validator of `entity`.
pub fn validate<T: Schema>(entity: &T) -> Result<(), SchemaError> {
    let table = T::schema();
    for spec in &table.fields {
        let Some(validator) = spec.validator else {
            continue;
        };
        let value = entity.get(spec.name).unwrap_or_default();
        if !validator.check(&value) {
            return Err(SchemaError::invalid(value.to_string()).in_field(table.name, spec.name));
        }
    }
    Ok(())
}

/// Build and validate an entity from a wire mapping.
pub fn from_mapping<T: Schema>(value: &Value) -> Result<T, SchemaError> {
    let map = value
        .as_map()
        .ok_or_else(|| SchemaError::mismatch("mapping", value))?;
    let entity = T::construct(&Fields::new(T::schema(), map))?;
    validate(&entity)?;
    Ok(entity)
}

/// Render the wire-included fields of an entity as a mapping.
pub fn to_mapping<T: Schema>(entity: &T) -> Value {
    let entries = T::schema()
        .fields
        .iter()
        .filter(|spec| spec.wire)
        .filter_map(|spec| entity.get(spec.name).map(|v| (spec.name, v)));
    Value::map(entries)
}

/// Documentation tree for an entity type: one child per doc-included field.
pub fn describe<T: Schema>() -> Section {
    let table = T::schema();
    let children = table
        .fields
        .iter()
        .filter(|spec| spec.doc)
        .map(|spec| Section::new(spec.name, spec.description))
        .collect();
    Section::new(table.name, table.doc).with_children(children)
}

/// Implement [`FromValue`] and [`ToValue`] for [`Schema`] types so they can
/// appear as nested fields or container elements.
#[macro_export]
macro_rules! schema_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FromValue for $ty {
                fn from_value(value: &$crate::Value) -> ::std::result::Result<Self, $crate::SchemaError> {
                    $crate::from_mapping(value)
                }
            }

            impl $crate::ToValue for $ty {
                fn to_value(&self) -> $crate::Value {
                    $crate::to_mapping(self)
                }
            }
        )+
    };
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        Ok(value.clone())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(SchemaError::mismatch("bool", other)),
        }
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        match value {
            Value::Str(s) => Ok(s.clone()),
            other => Err(SchemaError::mismatch("string", other)),
        }
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        match value {
            Value::Float(x) => Ok(*x),
            Value::Int(i) => Ok(*i as f64),
            other => Err(SchemaError::mismatch("float", other)),
        }
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

macro_rules! int_value {
    ($($ty:ty),+) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self, SchemaError> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(*i).map_err(|_| {
                            SchemaError::invalid(format!(
                                "{i} out of range for {}",
                                stringify!($ty)
                            ))
                        }),
                        other => Err(SchemaError::mismatch("int", other)),
                    }
                }
            }

            impl ToValue for $ty {
                // Past i64::MAX the value becomes a float, which integer
                // fields refuse to read back.
                fn to_value(&self) -> Value {
                    match i64::try_from(*self) {
                        Ok(i) => Value::Int(i),
                        Err(_) => Value::Float(*self as f64),
                    }
                }
            }
        )+
    };
}

int_value!(i64, i32, u32, u64, usize);

fn elements<T: FromValue>(value: &Value) -> impl Iterator<Item = Result<T, SchemaError>> + '_ {
    value.as_seq().unwrap_or_default().iter().enumerate().map(|(i, item)| {
        T::from_value(item).map_err(|e| e.within(Segment::Index(i)))
    })
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        if value.as_seq().is_none() {
            return Err(SchemaError::mismatch("sequence", value));
        }
        elements(value).collect()
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        if value.as_seq().is_none() {
            return Err(SchemaError::mismatch("sequence", value));
        }
        elements(value).collect()
    }
}

impl<T: ToValue> ToValue for BTreeSet<T> {
    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(ToValue::to_value).collect())
    }
}

impl<A: FromValue, B: FromValue> FromValue for (A, B) {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        match value.as_seq() {
            Some([a, b]) => Ok((
                A::from_value(a).map_err(|e| e.within(Segment::Index(0)))?,
                B::from_value(b).map_err(|e| e.within(Segment::Index(1)))?,
            )),
            Some(items) => Err(SchemaError::unsupported(format!(
                "pair needs 2 items, got {}",
                items.len()
            ))),
            None => Err(SchemaError::mismatch("sequence", value)),
        }
    }
}

impl<A: ToValue, B: ToValue> ToValue for (A, B) {
    fn to_value(&self) -> Value {
        Value::Seq(vec![self.0.to_value(), self.1.to_value()])
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map(ToValue::to_value).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchemaErrorKind;

    #[test]
    fn scalars_reject_wrong_shape() {
        let err = i64::from_value(&Value::from("1")).unwrap_err();
        assert!(matches!(err.kind(), SchemaErrorKind::TypeMismatch { expected: "int", .. }));
        assert!(String::from_value(&Value::from(1)).is_err());
        assert!(bool::from_value(&Value::Null).is_err());
    }

    #[test]
    fn unsigned_rejects_negative() {
        let err = u64::from_value(&Value::from(-1)).unwrap_err();
        assert!(matches!(err.kind(), SchemaErrorKind::Invalid(_)));
        assert_eq!(u64::from_value(&Value::from(7)).unwrap(), 7);
    }

    #[test]
    fn oversized_unsigned_does_not_clamp() {
        let v = u64::MAX.to_value();
        assert_eq!(v, Value::Float(u64::MAX as f64));
        let err = u64::from_value(&v).unwrap_err();
        assert!(matches!(err.kind(), SchemaErrorKind::TypeMismatch { expected: "int", .. }));
        assert_eq!((i64::MAX as u64).to_value(), Value::Int(i64::MAX));
    }

    #[test]
    fn float_accepts_int() {
        assert_eq!(f64::from_value(&Value::from(2)).unwrap(), 2.0);
    }

    #[test]
    fn sequence_errors_carry_index() {
        let v = Value::Seq(vec![Value::from("a"), Value::from(2)]);
        let err = Vec::<String>::from_value(&v).unwrap_err();
        assert_eq!(err.trail(), &[Segment::Index(1)]);
    }

    #[test]
    fn set_dedups_and_sorts() {
        let v = Value::Seq(vec![Value::from("b"), Value::from("a"), Value::from("b")]);
        let set = BTreeSet::<String>::from_value(&v).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn pair_needs_two_items() {
        let ok = <(String, i64)>::from_value(&Value::Seq(vec![Value::from("x"), Value::from(1)]));
        assert_eq!(ok.unwrap(), ("x".to_string(), 1));
        let err = <(String, i64)>::from_value(&Value::Seq(vec![Value::from("x")])).unwrap_err();
        assert!(matches!(err.kind(), SchemaErrorKind::Unsupported(_)));
    }

    #[test]
    fn option_maps_null() {
        assert_eq!(Option::<i64>::from_value(&Value::Null).unwrap(), None);
        assert_eq!(Option::<i64>::from_value(&Value::from(3)).unwrap(), Some(3));
        assert_eq!(None::<i64>.to_value(), Value::Null);
    }
}
