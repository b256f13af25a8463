//! Type descriptors: the closed description of what a declared field holds.
//!
//! Every field of a record carries a [`TypeDescriptor`]. The resolver looks at
//! it to decide whether a raw value needs to be turned into a nested record
//! (or a sequence/mapping/union of records), and the validator matches the
//! resolved value against it.
//!
//! The predicates here ([`is_record_type`](TypeDescriptor::is_record_type),
//! [`is_parameterized`](TypeDescriptor::is_parameterized),
//! [`is_optional`](TypeDescriptor::is_optional), ...) are total functions: any
//! descriptor classifies without error.

use std::any::TypeId;
use std::fmt;

use toml::value::Datetime;

use crate::build::LoadOptions;
use crate::convert::Resolved;
use crate::error::ConfigError;
use crate::record::Record;
use crate::schema::Schema;
use crate::value::Table;

/// Scalar and untyped-container types every data source can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Integer,
    Float,
    Boolean,
    /// An array with no declared element type.
    Array,
    /// A table with no declared value type.
    Table,
    /// Untyped: anything matches, including null.
    Any,
    Null,
}

/// Date and time types TOML supports natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Library {
    /// Any of the four TOML date/time flavours.
    Datetime,
    OffsetDatetime,
    LocalDatetime,
    LocalDate,
    LocalTime,
}

impl Library {
    pub fn accepts(self, datetime: &Datetime) -> bool {
        let (date, time, offset) = (
            datetime.date.is_some(),
            datetime.time.is_some(),
            datetime.offset.is_some(),
        );
        match self {
            Library::Datetime => true,
            Library::OffsetDatetime => date && time && offset,
            Library::LocalDatetime => date && time && !offset,
            Library::LocalDate => date && !time,
            Library::LocalTime => !date && time,
        }
    }
}

/// Handle to a user-declared record type.
///
/// Created with [`RecordType::of`]. Holding a handle does not build the
/// record's schema, so a record may name itself (directly or through other
/// records) in its own field declarations. Loading such a type only stops
/// when the data runs out, which surfaces as a
/// [`MissingKey`](ConfigError::MissingKey).
#[derive(Clone, Copy)]
pub struct RecordType {
    name: &'static str,
    type_id: TypeId,
    schema: fn() -> Schema,
    load: fn(&Table, &LoadOptions) -> Result<Resolved, ConfigError>,
}

impl RecordType {
    pub fn of<T: Record>() -> Self {
        Self {
            name: T::NAME,
            type_id: TypeId::of::<T>(),
            schema: T::schema,
            load: crate::build::load_nested::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn schema(&self) -> Schema {
        (self.schema)()
    }

    /// Run the full load pipeline for this record type on `data`.
    pub(crate) fn load(&self, data: &Table, options: &LoadOptions) -> Result<Resolved, ConfigError> {
        (self.load)(data, options)
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordType({})", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    LibrarySupported(Library),
    Record(RecordType),
    Sequence(Box<TypeDescriptor>),
    Mapping(Box<TypeDescriptor>, Box<TypeDescriptor>),
    Union(Vec<TypeDescriptor>),
    /// Shorthand for `Union(inner, Null)`.
    Optional(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn sequence(item: TypeDescriptor) -> Self {
        TypeDescriptor::Sequence(Box::new(item))
    }

    pub fn mapping(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Mapping(Box::new(key), Box::new(value))
    }

    pub fn optional(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Optional(Box::new(inner))
    }

    pub fn record<T: Record>() -> Self {
        TypeDescriptor::Record(RecordType::of::<T>())
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, TypeDescriptor::Primitive(_))
    }

    pub fn is_library_supported(&self) -> bool {
        matches!(self, TypeDescriptor::LibrarySupported(_))
    }

    /// True only for a bare user-declared record, never for a container or
    /// union that holds one.
    pub fn is_record_type(&self) -> bool {
        matches!(self, TypeDescriptor::Record(_))
    }

    /// True when the descriptor carries type arguments.
    pub fn is_parameterized(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Sequence(_)
                | TypeDescriptor::Mapping(..)
                | TypeDescriptor::Union(_)
                | TypeDescriptor::Optional(_)
        )
    }

    /// True when a missing value may be filled with null.
    ///
    /// ```text
    /// any                      -> true
    /// null                     -> true
    /// optional<string>         -> true
    /// string | null            -> true
    /// sequence<optional<int>>  -> false
    /// sequence<string>         -> false
    /// ```
    pub fn is_optional(&self) -> bool {
        match self {
            TypeDescriptor::Primitive(Primitive::Any | Primitive::Null) => true,
            TypeDescriptor::Optional(_) => true,
            TypeDescriptor::Union(variants) => variants.iter().any(TypeDescriptor::is_optional),
            _ => false,
        }
    }

    /// Record types a union (or optional) may resolve to, in declaration order.
    pub fn record_variants(&self) -> Vec<&RecordType> {
        match self {
            TypeDescriptor::Record(record) => vec![record],
            TypeDescriptor::Optional(inner) => inner.record_variants(),
            TypeDescriptor::Union(variants) => {
                variants.iter().flat_map(|v| v.record_variants()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// True when resolving a value of this type may instantiate a record.
    pub fn contains_record(&self) -> bool {
        match self {
            TypeDescriptor::Primitive(_) | TypeDescriptor::LibrarySupported(_) => false,
            TypeDescriptor::Record(_) => true,
            TypeDescriptor::Sequence(item) => item.contains_record(),
            TypeDescriptor::Mapping(_, value) => value.contains_record(),
            TypeDescriptor::Union(variants) => variants.iter().any(TypeDescriptor::contains_record),
            TypeDescriptor::Optional(inner) => inner.contains_record(),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Primitive::String => "string",
            Primitive::Integer => "integer",
            Primitive::Float => "float",
            Primitive::Boolean => "boolean",
            Primitive::Array => "array",
            Primitive::Table => "table",
            Primitive::Any => "any",
            Primitive::Null => "null",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Library::Datetime => "datetime",
            Library::OffsetDatetime => "offset datetime",
            Library::LocalDatetime => "local datetime",
            Library::LocalDate => "local date",
            Library::LocalTime => "local time",
        };
        f.write_str(name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(p) => write!(f, "{p}"),
            TypeDescriptor::LibrarySupported(l) => write!(f, "{l}"),
            TypeDescriptor::Record(r) => f.write_str(r.name()),
            TypeDescriptor::Sequence(item) => write!(f, "sequence<{item}>"),
            TypeDescriptor::Mapping(key, value) => write!(f, "mapping<{key}, {value}>"),
            TypeDescriptor::Union(variants) => {
                for (i, variant) in variants.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{variant}")?;
                }
                Ok(())
            }
            TypeDescriptor::Optional(inner) => write!(f, "optional<{inner}>"),
        }
    }
}
