//! The [`Record`] trait: how a Rust type registers itself as a load target.
//!
//! A record declares its fields once, in [`Record::schema`], and exposes a
//! constructor ([`Record::from_fields`]) plus a string-keyed setter
//! ([`Record::set_field`]). Those three are enough for every build mode:
//!
//! - [`Shape::Plain`]: behaves like a plain data record. The constructor gets
//!   the full set of resolved fields (plus any init values) in one go.
//! - [`Shape::Custom`]: the type has its own construction logic. The
//!   constructor only sees the init values; resolved fields are assigned
//!   afterwards through the setter, skipping whatever
//!   [`assigned_fields`](Record::assigned_fields) reports.
//!
//! Plain records are usually declared with the [`record!`](crate::record!)
//! macro. Inheritance ([`Schema::extends`]) and custom construction need a
//! hand-written impl.

use std::collections::BTreeMap;

use crate::convert::{FromResolved, Resolved};
use crate::error::ConfigError;
use crate::schema::Schema;

/// How instances of a record are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    /// Construct in one step from all resolved fields.
    #[default]
    Plain,
    /// Construct from init values only, then assign resolved fields.
    Custom,
}

pub trait Record: Sized + 'static {
    /// Type name, used in errors and to guess the data key.
    const NAME: &'static str;

    const SHAPE: Shape = Shape::Plain;

    /// Field declarations, bases and defaults.
    fn schema() -> Schema;

    /// Build an instance. See [`Shape`] for what `fields` holds.
    fn from_fields(fields: Fields) -> Result<Self, ConfigError>;

    /// Assign one resolved field in place.
    fn set_field(&mut self, name: &str, value: Resolved) -> Result<(), ConfigError>;

    /// Fields this instance already holds state for. They are left out of
    /// resolution when populating the instance.
    fn assigned_fields(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Resolved field values handed to a record constructor.
#[derive(Debug)]
pub struct Fields {
    record: &'static str,
    values: BTreeMap<String, Resolved>,
}

impl Fields {
    pub fn new(record: &'static str, values: BTreeMap<String, Resolved>) -> Self {
        Self { record, values }
    }

    /// Take a required field.
    pub fn take<T: FromResolved>(&mut self, name: &str) -> Result<T, ConfigError> {
        match self.values.remove(name) {
            Some(value) => convert(self.record, name, value),
            None => Err(ConfigError::MissingKey {
                key: name.to_string(),
                record: self.record.to_string(),
                expected: T::descriptor(),
            }),
        }
    }

    /// Take a field that may be absent.
    pub fn take_opt<T: FromResolved>(&mut self, name: &str) -> Result<Option<T>, ConfigError> {
        self.values
            .remove(name)
            .map(|value| convert(self.record, name, value))
            .transpose()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Convert a resolved value for `field` of `record`, reporting a mismatch as
/// [`ConfigError::InvalidType`].
pub fn convert<T: FromResolved>(
    record: &str,
    field: &str,
    value: Resolved,
) -> Result<T, ConfigError> {
    // Containers fail on a single element; report the whole field value.
    let preview = value.preview();
    let found = value.kind();
    T::from_resolved(value).map_err(|_| {
        tracing::debug!(record, field, "value does not convert to the field type");
        ConfigError::InvalidType {
            key: field.to_string(),
            value: preview,
            found,
            expected: T::descriptor(),
        }
    })
}

/// Declare a plain record struct together with its [`Record`],
/// [`Typed`](crate::Typed) and [`FromResolved`] impls.
///
/// Every field's descriptor comes from its Rust type. `= expr` attaches a
/// static default; the expression must convert into a [`Value`](crate::Value).
///
/// ```ignore
/// typedconfig::record! {
///     #[derive(Debug, PartialEq)]
///     pub struct Server {
///         pub host: String,
///         pub port: u16 = 8080,
///         pub tags: Vec<String>,
///         pub tls: Option<Tls>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty $(= $default:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::Record for $name {
            const NAME: &'static str = stringify!($name);

            fn schema() -> $crate::Schema {
                $crate::Schema::new(stringify!($name))
                    $(
                        .field(
                            $crate::FieldDecl::new(
                                stringify!($field),
                                <$fty as $crate::Typed>::descriptor(),
                            )
                            $(.with_default(|| $crate::Value::from($default)))?
                        )
                    )*
            }

            fn from_fields(
                #[allow(unused_mut)] mut fields: $crate::Fields,
            ) -> ::std::result::Result<Self, $crate::ConfigError> {
                Ok(Self {
                    $( $field: fields.take(stringify!($field))?, )*
                })
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::Resolved,
            ) -> ::std::result::Result<(), $crate::ConfigError> {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field = $crate::record::convert(stringify!($name), name, value)?;
                        }
                    )*
                    other => {
                        let _ = value;
                        return Err($crate::ConfigError::UnknownField {
                            record: stringify!($name).to_string(),
                            field: other.to_string(),
                        });
                    }
                }
                Ok(())
            }
        }

        impl $crate::Typed for $name {
            fn descriptor() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::record::<$name>()
            }
        }

        impl $crate::FromResolved for $name {
            fn from_resolved(
                value: $crate::Resolved,
            ) -> ::std::result::Result<Self, $crate::Resolved> {
                value.into_record::<$name>()
            }
        }
    };
}
