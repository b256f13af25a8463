//! Type validation of resolved field values.
//!
//! [`matches`] is the type-match predicate: does a resolved value fit a
//! descriptor? [`validate`] applies it to every declared field and stops at
//! the first mismatch, in declaration order.
//!
//! Numbers follow the usual numeric tower: an integer is accepted where a
//! float is declared.

use std::collections::BTreeMap;

use tracing::warn;

use crate::convert::Resolved;
use crate::descriptor::{Primitive, TypeDescriptor};
use crate::error::ConfigError;
use crate::schema::FieldSet;
use crate::value::Value;

/// Check every field in `fields` against its resolved value.
///
/// Returns the validated values (only the fields in `fields`) or the first
/// [`ConfigError::InvalidType`].
pub fn validate(
    mut resolved: BTreeMap<String, Resolved>,
    fields: &FieldSet,
) -> Result<BTreeMap<String, Resolved>, ConfigError> {
    let mut checked = BTreeMap::new();

    for (name, ty) in fields.iter() {
        let Some(value) = resolved.remove(name) else {
            warn!(field = name, "declared field missing after resolution, skipping");
            continue;
        };
        if !matches(&value, ty) {
            return Err(ConfigError::InvalidType {
                key: name.to_string(),
                value: value.preview(),
                found: value.kind(),
                expected: ty.clone(),
            });
        }
        checked.insert(name.to_string(), value);
    }

    Ok(checked)
}

/// Does `value` fit `ty`?
pub fn matches(value: &Resolved, ty: &TypeDescriptor) -> bool {
    match (value, ty) {
        (_, TypeDescriptor::Primitive(Primitive::Any)) => true,
        (_, TypeDescriptor::Union(variants)) => variants.iter().any(|v| matches(value, v)),
        (Resolved::Raw(Value::Null), TypeDescriptor::Optional(_)) => true,
        (_, TypeDescriptor::Optional(inner)) => matches(value, inner),

        (Resolved::Raw(raw), _) => matches_raw(raw, ty),
        (Resolved::Record(instance), TypeDescriptor::Record(record)) => {
            instance.type_id() == record.type_id()
        }
        (Resolved::Sequence(items), TypeDescriptor::Sequence(item)) => {
            items.iter().all(|v| matches(v, item))
        }
        (Resolved::Sequence(_), TypeDescriptor::Primitive(Primitive::Array)) => true,
        (Resolved::Mapping(entries), TypeDescriptor::Mapping(key, value_ty)) => {
            entries.iter().all(|(k, v)| {
                matches_raw(&Value::String(k.clone()), key) && matches(v, value_ty)
            })
        }
        (Resolved::Mapping(_), TypeDescriptor::Primitive(Primitive::Table)) => true,
        _ => false,
    }
}

fn matches_raw(raw: &Value, ty: &TypeDescriptor) -> bool {
    match (raw, ty) {
        (_, TypeDescriptor::Primitive(Primitive::Any)) => true,
        (_, TypeDescriptor::Union(variants)) => variants.iter().any(|v| matches_raw(raw, v)),
        (Value::Null, TypeDescriptor::Optional(_)) => true,
        (_, TypeDescriptor::Optional(inner)) => matches_raw(raw, inner),

        (Value::Null, TypeDescriptor::Primitive(Primitive::Null)) => true,
        (Value::String(_), TypeDescriptor::Primitive(Primitive::String)) => true,
        (Value::Integer(_), TypeDescriptor::Primitive(Primitive::Integer)) => true,
        (Value::Float(_) | Value::Integer(_), TypeDescriptor::Primitive(Primitive::Float)) => true,
        (Value::Boolean(_), TypeDescriptor::Primitive(Primitive::Boolean)) => true,
        (Value::Array(_), TypeDescriptor::Primitive(Primitive::Array)) => true,
        (Value::Table(_), TypeDescriptor::Primitive(Primitive::Table)) => true,
        (Value::Datetime(d), TypeDescriptor::LibrarySupported(flavour)) => flavour.accepts(d),

        (Value::Array(items), TypeDescriptor::Sequence(item)) => {
            items.iter().all(|v| matches_raw(v, item))
        }
        (Value::Table(entries), TypeDescriptor::Mapping(key, value_ty)) => {
            entries.iter().all(|(k, v)| {
                matches_raw(&Value::String(k.clone()), key) && matches_raw(v, value_ty)
            })
        }
        _ => false,
    }
}
