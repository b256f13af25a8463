//! Recursive resolution: turn a record's raw data into resolved field values.
//!
//! For every declared field:
//!
//! 1. **Present in the data**: the raw value is resolved against the field's
//!    descriptor. A record descriptor re-enters the whole load pipeline for the
//!    nested type (normalize, collect, resolve, validate, build) with the
//!    nested table as its data. Sequences and mappings of records resolve
//!    element-wise (mapping keys untouched). An optional resolves through its
//!    inner type, a union through the variants that hold records. Anything
//!    else is left as is for the validator.
//! 2. **Absent, but a static default is declared**: the default is resolved
//!    the same way and used.
//! 3. **Absent, optional descriptor**: null.
//! 4. **Absent, required**: [`ConfigError::MissingKey`].
//!
//! Values are only turned into records when their shape allows it: a record
//! descriptor needs a table, a sequence needs an array. A value of the wrong
//! shape passes through raw and the validator reports it with the field name.
//!
//! Recursion depth is bounded by the data: every nested load works on a
//! strictly smaller sub-table, so even a self-referential record type ends
//! with a `MissingKey` once the data runs out.

use std::collections::BTreeMap;

use tracing::trace;

use crate::build::LoadOptions;
use crate::convert::Resolved;
use crate::descriptor::TypeDescriptor;
use crate::error::ConfigError;
use crate::schema::{FieldSet, Schema};
use crate::value::{Table, Value};

/// Resolve every field in `fields` from `data`.
///
/// `data` is expected to be normalized already. It is never modified.
pub fn resolve(
    schema: &Schema,
    data: &Table,
    fields: &FieldSet,
    options: &LoadOptions,
) -> Result<BTreeMap<String, Resolved>, ConfigError> {
    let mut resolved = BTreeMap::new();

    for (name, ty) in fields.iter() {
        let value = match data.get(name) {
            Some(raw) => resolve_value(ty, raw, options)?,
            None => match schema.default_for(name) {
                Some(default) => {
                    trace!(record = schema.name(), field = name, "using declared default");
                    resolve_value(ty, &default, options)?
                }
                None if ty.is_optional() => {
                    trace!(record = schema.name(), field = name, "optional field left null");
                    Resolved::null()
                }
                None => {
                    return Err(ConfigError::MissingKey {
                        key: name.to_string(),
                        record: schema.name().to_string(),
                        expected: ty.clone(),
                    });
                }
            },
        };
        resolved.insert(name.to_string(), value);
    }

    Ok(resolved)
}

/// Resolve one raw value against its declared descriptor.
pub fn resolve_value(
    ty: &TypeDescriptor,
    raw: &Value,
    options: &LoadOptions,
) -> Result<Resolved, ConfigError> {
    if !ty.contains_record() {
        return Ok(Resolved::Raw(raw.clone()));
    }

    match (ty, raw) {
        (TypeDescriptor::Record(record), Value::Table(table)) => record.load(table, options),
        (TypeDescriptor::Sequence(item), Value::Array(items)) => items
            .iter()
            .map(|element| resolve_value(item, element, options))
            .collect::<Result<Vec<_>, _>>()
            .map(Resolved::Sequence),
        (TypeDescriptor::Mapping(_, value_ty), Value::Table(entries)) => entries
            .iter()
            .map(|(key, element)| {
                resolve_value(value_ty, element, options).map(|v| (key.clone(), v))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Resolved::Mapping),
        (TypeDescriptor::Optional(inner), _) => resolve_value(inner, raw, options),
        (TypeDescriptor::Union(variants), _) => resolve_union(variants, raw, options),
        _ => Ok(Resolved::Raw(raw.clone())),
    }
}

/// Can `raw` be resolved as `ty` at all?
fn fits(ty: &TypeDescriptor, raw: &Value) -> bool {
    match ty {
        TypeDescriptor::Record(_) | TypeDescriptor::Mapping(..) => matches!(raw, Value::Table(_)),
        TypeDescriptor::Sequence(_) => matches!(raw, Value::Array(_)),
        TypeDescriptor::Union(_) | TypeDescriptor::Optional(_) => true,
        TypeDescriptor::Primitive(_) | TypeDescriptor::LibrarySupported(_) => false,
    }
}

/// Resolve a value through the record-holding variants of a union.
///
/// Only variants whose shape fits the value are tried, in declaration order,
/// and the first that resolves wins. A single candidate's error is final;
/// with several, the first candidate's error is reported when none resolve.
/// Without candidates the value stays raw.
fn resolve_union(
    variants: &[TypeDescriptor],
    raw: &Value,
    options: &LoadOptions,
) -> Result<Resolved, ConfigError> {
    let candidates: Vec<&TypeDescriptor> = variants
        .iter()
        .filter(|variant| variant.contains_record() && fits(variant, raw))
        .collect();

    let mut first_error = None;
    for variant in &candidates {
        match resolve_value(variant, raw, options) {
            Ok(resolved) => return Ok(resolved),
            Err(err) if candidates.len() == 1 => return Err(err),
            Err(err) => {
                trace!(variant = %variant, error = %err, "union variant did not resolve");
                first_error.get_or_insert(err);
            }
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(Resolved::Raw(raw.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{Inner, Item, Point, data};
    use crate::schema::{FieldDecl, collect};
    use crate::convert::{FromResolved, Typed};
    use crate::descriptor::Primitive;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn opts() -> LoadOptions {
        LoadOptions::default()
    }

    fn resolve_all(schema: &Schema, data: &Table) -> Result<BTreeMap<String, Resolved>, ConfigError> {
        let fields = collect(schema, &BTreeSet::new());
        resolve(schema, data, &fields, &opts())
    }

    fn int() -> TypeDescriptor {
        TypeDescriptor::Primitive(Primitive::Integer)
    }

    #[test]
    fn present_scalar_is_left_raw() {
        let schema = Schema::new("S").field(FieldDecl::new("count", int()));
        let out = resolve_all(&schema, &data(json!({"count": 3}))).unwrap();
        assert!(matches!(out["count"], Resolved::Raw(Value::Integer(3))));
    }

    #[test]
    fn default_fills_missing_field() {
        let schema = Schema::new("S")
            .field(FieldDecl::new("count", int()).with_default(|| Value::from(0)));
        let out = resolve_all(&schema, &data(json!({}))).unwrap();
        assert!(matches!(out["count"], Resolved::Raw(Value::Integer(0))));
    }

    #[test]
    fn optional_fills_null() {
        let schema = Schema::new("S").field(FieldDecl::new("key", TypeDescriptor::optional(int())));
        let out = resolve_all(&schema, &data(json!({}))).unwrap();
        assert!(matches!(out["key"], Resolved::Raw(Value::Null)));
    }

    #[test]
    fn missing_required_field_fails() {
        let schema = Schema::new("Person").field(FieldDecl::new(
            "name",
            TypeDescriptor::Primitive(Primitive::String),
        ));
        let err = resolve_all(&schema, &data(json!({}))).unwrap_err();
        match err {
            ConfigError::MissingKey { key, record, expected } => {
                assert_eq!(key, "name");
                assert_eq!(record, "Person");
                assert_eq!(expected.to_string(), "string");
            }
            other => panic!("Expected MissingKey, got: {other:?}"),
        }
    }

    #[test]
    fn nested_record_is_instantiated() {
        let raw = Value::from(json!({"value": "x"}));
        let resolved = resolve_value(&Inner::descriptor(), &raw, &opts()).unwrap();
        let inner = Inner::from_resolved(resolved).unwrap();
        assert_eq!(inner.value, "x");
    }

    #[test]
    fn sequence_of_records_keeps_order() {
        let raw = Value::from(json!([{"id": 1}, {"id": 2}]));
        let resolved = resolve_value(&Vec::<Item>::descriptor(), &raw, &opts()).unwrap();
        let items = Vec::<Item>::from_resolved(resolved).unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn mapping_of_records_keeps_keys() {
        let raw = Value::from(json!({"origin": {"x": 0, "y": 0}, "far": {"x": 9, "y": 9}}));
        let ty = BTreeMap::<String, Point>::descriptor();
        let resolved = resolve_value(&ty, &raw, &opts()).unwrap();
        let map = BTreeMap::<String, Point>::from_resolved(resolved).unwrap();
        assert_eq!(map["far"], Point { x: 9, y: 9 });
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn optional_record_resolves_when_present() {
        let raw = Value::from(json!({"value": "y"}));
        let ty = Option::<Inner>::descriptor();
        let resolved = resolve_value(&ty, &raw, &opts()).unwrap();
        let inner = Option::<Inner>::from_resolved(resolved).unwrap();
        assert_eq!(inner.unwrap().value, "y");
    }

    #[test]
    fn union_leaves_non_table_values_raw() {
        let ty = TypeDescriptor::Union(vec![Point::descriptor(), int()]);
        let resolved = resolve_value(&ty, &Value::from(7), &opts()).unwrap();
        assert!(matches!(resolved, Resolved::Raw(Value::Integer(7))));
    }

    #[test]
    fn union_with_two_records_takes_first_that_loads() {
        let ty = TypeDescriptor::Union(vec![Point::descriptor(), Inner::descriptor()]);
        let resolved = resolve_value(&ty, &Value::from(json!({"value": "z"})), &opts()).unwrap();
        assert_eq!(resolved.kind(), "Inner");

        let resolved = resolve_value(&ty, &Value::from(json!({"x": 1, "y": 2})), &opts()).unwrap();
        assert_eq!(resolved.kind(), "Point");
    }

    #[test]
    fn union_with_two_records_reports_first_error() {
        let ty = TypeDescriptor::Union(vec![Point::descriptor(), Inner::descriptor()]);
        let err = resolve_value(&ty, &Value::from(json!({})), &opts()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { ref record, .. } if record == "Point"));
    }

    #[test]
    fn record_field_with_scalar_is_left_raw() {
        let resolved = resolve_value(&Inner::descriptor(), &Value::from("flat"), &opts()).unwrap();
        assert!(matches!(resolved, Resolved::Raw(Value::String(_))));
    }

    #[test]
    fn nested_missing_key_propagates() {
        let raw = Value::from(json!({}));
        let err = resolve_value(&Inner::descriptor(), &raw, &opts()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { ref key, .. } if key == "value"));
    }

    #[test]
    fn data_is_not_mutated() {
        let schema = Schema::new("S").field(FieldDecl::new("inner", Inner::descriptor()));
        let input = data(json!({"inner": {"value": "x"}}));
        let before = input.clone();
        resolve_all(&schema, &input).unwrap();
        assert_eq!(input, before);
    }

    #[test]
    fn optional_sequence_of_records_resolves() {
        let raw = Value::from(json!([{"id": 3}]));
        let ty = Option::<Vec<Item>>::descriptor();
        let resolved = resolve_value(&ty, &raw, &opts()).unwrap();
        let items = Option::<Vec<Item>>::from_resolved(resolved).unwrap().unwrap();
        assert_eq!(items[0].id, 3);
    }

    #[test]
    fn union_picks_variant_by_shape() {
        let ty = TypeDescriptor::Union(vec![Point::descriptor(), Vec::<Item>::descriptor()]);
        let resolved = resolve_value(&ty, &Value::from(json!([{"id": 1}])), &opts()).unwrap();
        assert!(matches!(resolved, Resolved::Sequence(ref items) if items.len() == 1));
    }
}
