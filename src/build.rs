//! Instance building: the last step of every load.
//!
//! [`prepare`] runs the per-record pipeline (normalize, collect, resolve,
//! validate) and the builders below turn its output into an instance:
//!
//! - [`construct`] with [`Shape::Plain`]: resolved fields merged with the init
//!   values (init wins on collision) go to the constructor in one step. Init
//!   values are never validated; those declared as records (or containers of
//!   records) are resolved into instances first.
//! - [`construct`] with [`Shape::Custom`]: the constructor sees only the init
//!   values; every resolved field is then assigned through
//!   [`Record::set_field`], except those the constructor already set.
//! - [`augment`]: an existing instance is populated the same way. Passing
//!   init values here is a usage error.
//!
//! Nothing is handed back on failure: an instance under construction is
//! dropped with the error.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::convert::Resolved;
use crate::error::ConfigError;
use crate::normalize::normalize;
use crate::record::{Fields, Record, Shape};
use crate::resolve::{resolve, resolve_value};
use crate::schema::{Schema, collect};
use crate::validate::validate;
use crate::value::Table;

/// Settings that travel with a load into every nested record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LoadOptions {
    /// Reject data keys no field declares.
    pub strict: bool,
}

/// Normalize `data`, then resolve and validate every field of `schema` not in
/// `exclude`.
pub(crate) fn prepare(
    schema: &Schema,
    data: &Table,
    exclude: &BTreeSet<String>,
    options: &LoadOptions,
) -> Result<BTreeMap<String, Resolved>, ConfigError> {
    let data = normalize(data);

    if options.strict {
        let declared = collect(schema, &BTreeSet::new());
        let unknown: Vec<String> = data
            .keys()
            .filter(|key| !declared.contains(key))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(ConfigError::UnknownKeys {
                record: schema.name().to_string(),
                keys: unknown,
            });
        }
    }

    let fields = collect(schema, exclude);
    let resolved = resolve(schema, &data, &fields, options)?;
    validate(resolved, &fields)
}

/// Turn init values into constructor input. Values of record-holding fields
/// are resolved, everything else stays raw.
fn init_fields(
    schema: &Schema,
    init: Table,
    options: &LoadOptions,
) -> Result<BTreeMap<String, Resolved>, ConfigError> {
    let declared = collect(schema, &BTreeSet::new());
    init.into_iter()
        .map(|(key, value)| {
            let resolved = match declared.get(&key) {
                Some(ty) if ty.contains_record() => resolve_value(ty, &value, options)?,
                _ => Resolved::Raw(value),
            };
            Ok((key, resolved))
        })
        .collect()
}

/// Build a new `T` from `data`, with optional out-of-band init values.
pub(crate) fn construct<T: Record>(
    data: &Table,
    init: Option<Table>,
    options: &LoadOptions,
) -> Result<T, ConfigError> {
    let schema = T::schema();
    let init = init.unwrap_or_default();
    debug!(record = T::NAME, shape = ?T::SHAPE, init = init.len(), "building record");

    match T::SHAPE {
        Shape::Plain => {
            let exclude: BTreeSet<String> = init.keys().cloned().collect();
            let mut values = prepare(&schema, data, &exclude, options)?;
            values.extend(init_fields(&schema, init, options)?);
            T::from_fields(Fields::new(T::NAME, values))
        }
        Shape::Custom => {
            let init = init_fields(&schema, init, options)?;
            let instance = T::from_fields(Fields::new(T::NAME, init))?;
            populate(instance, &schema, data, options)
        }
    }
}

/// Populate an existing instance from `data`.
pub(crate) fn augment<T: Record>(
    instance: T,
    data: &Table,
    init: Option<Table>,
    options: &LoadOptions,
) -> Result<T, ConfigError> {
    if init.is_some() {
        return Err(ConfigError::InitOnExisting {
            record: T::NAME.to_string(),
        });
    }
    debug!(record = T::NAME, "populating existing record");
    populate(instance, &T::schema(), data, options)
}

fn populate<T: Record>(
    mut instance: T,
    schema: &Schema,
    data: &Table,
    options: &LoadOptions,
) -> Result<T, ConfigError> {
    let exclude: BTreeSet<String> = instance.assigned_fields().into_iter().collect();
    let values = prepare(schema, data, &exclude, options)?;
    for (name, value) in values {
        instance.set_field(&name, value)?;
    }
    Ok(instance)
}

/// Entry point for nested records, stored in every
/// [`RecordType`](crate::descriptor::RecordType).
pub(crate) fn load_nested<T: Record>(
    data: &Table,
    options: &LoadOptions,
) -> Result<Resolved, ConfigError> {
    debug!(record = T::NAME, "entering nested record");
    construct::<T>(data, None, options).map(Resolved::record)
}
