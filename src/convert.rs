//! Resolved values and their conversion into concrete Rust types.
//!
//! The resolver produces a [`Resolved`] per field: raw values pass through
//! untouched, while anything declared as a record (or a container/union of
//! records) becomes a type-erased [`Instance`]. Record constructors then pull
//! typed values out with [`FromResolved`].
//!
//! [`Typed`] is the static side of the same bridge: it tells the schema which
//! [`TypeDescriptor`] a Rust field type stands for.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use toml::value::Datetime;

use crate::descriptor::{Library, Primitive, TypeDescriptor};
use crate::record::Record;
use crate::value::Value;

/// An owned record instance with its concrete type erased.
pub struct Instance {
    name: &'static str,
    type_id: TypeId,
    value: Box<dyn Any>,
}

impl Instance {
    pub fn new<T: Record>(value: T) -> Self {
        Self {
            name: T::NAME,
            type_id: TypeId::of::<T>(),
            value: Box::new(value),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn is<T: Record>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Recover the concrete record, or get the instance back unchanged.
    pub fn downcast<T: Record>(self) -> Result<T, Instance> {
        let Instance {
            name,
            type_id,
            value,
        } = self;
        match value.downcast::<T>() {
            Ok(record) => Ok(*record),
            Err(value) => Err(Instance {
                name,
                type_id,
                value,
            }),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({})", self.name)
    }
}

/// A field value after recursive resolution.
#[derive(Debug)]
pub enum Resolved {
    /// Left as it came from the data (scalars, untyped containers, or values
    /// that could not be turned into the declared record).
    Raw(Value),
    Record(Instance),
    Sequence(Vec<Resolved>),
    Mapping(BTreeMap<String, Resolved>),
}

impl Resolved {
    pub fn record<T: Record>(value: T) -> Self {
        Resolved::Record(Instance::new(value))
    }

    pub fn null() -> Self {
        Resolved::Raw(Value::Null)
    }

    /// Short name of what this value holds, for error messages.
    pub fn kind(&self) -> String {
        match self {
            Resolved::Raw(value) => value.kind().to_string(),
            Resolved::Record(instance) => instance.name().to_string(),
            Resolved::Sequence(_) => "array".to_string(),
            Resolved::Mapping(_) => "table".to_string(),
        }
    }

    pub fn preview(&self) -> String {
        crate::value::truncate(self.to_string(), 50)
    }

    pub fn into_record<T: Record>(self) -> Result<T, Resolved> {
        match self {
            Resolved::Record(instance) => instance.downcast::<T>().map_err(Resolved::Record),
            other => Err(other),
        }
    }
}

impl From<Value> for Resolved {
    fn from(value: Value) -> Self {
        Resolved::Raw(value)
    }
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Raw(value) => write!(f, "{value}"),
            Resolved::Record(instance) => write!(f, "{} {{ .. }}", instance.name()),
            Resolved::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Resolved::Mapping(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Rust types with a known [`TypeDescriptor`].
pub trait Typed {
    fn descriptor() -> TypeDescriptor;
}

/// Typed extraction from a [`Resolved`] value.
///
/// On mismatch the offending value is handed back so the caller can report
/// it.
pub trait FromResolved: Typed + Sized {
    fn from_resolved(value: Resolved) -> Result<Self, Resolved>;
}

impl Typed for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Primitive(Primitive::String)
    }
}

impl FromResolved for String {
    fn from_resolved(value: Resolved) -> Result<Self, Resolved> {
        match value {
            Resolved::Raw(Value::String(s)) => Ok(s),
            other => Err(other),
        }
    }
}

impl Typed for bool {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Primitive(Primitive::Boolean)
    }
}

impl FromResolved for bool {
    fn from_resolved(value: Resolved) -> Result<Self, Resolved> {
        match value {
            Resolved::Raw(Value::Boolean(b)) => Ok(b),
            other => Err(other),
        }
    }
}

macro_rules! integer_types {
    ($($ty:ty),*) => {
        $(
            impl Typed for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::Primitive(Primitive::Integer)
                }
            }

            impl FromResolved for $ty {
                fn from_resolved(value: Resolved) -> Result<Self, Resolved> {
                    match value {
                        Resolved::Raw(Value::Integer(i)) => {
                            <$ty>::try_from(i).map_err(|_| Resolved::Raw(Value::Integer(i)))
                        }
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

integer_types!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Typed for f64 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Primitive(Primitive::Float)
    }
}

impl FromResolved for f64 {
    fn from_resolved(value: Resolved) -> Result<Self, Resolved> {
        match value {
            Resolved::Raw(Value::Float(x)) => Ok(x),
            Resolved::Raw(Value::Integer(i)) => Ok(i as f64),
            other => Err(other),
        }
    }
}

impl Typed for f32 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Primitive(Primitive::Float)
    }
}

impl FromResolved for f32 {
    fn from_resolved(value: Resolved) -> Result<Self, Resolved> {
        match value {
            Resolved::Raw(Value::Float(x)) if x.is_finite() && x.abs() > f64::from(f32::MAX) => {
                Err(Resolved::Raw(Value::Float(x)))
            }
            other => f64::from_resolved(other).map(|x| x as f32),
        }
    }
}

impl Typed for Datetime {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::LibrarySupported(Library::Datetime)
    }
}

impl FromResolved for Datetime {
    fn from_resolved(value: Resolved) -> Result<Self, Resolved> {
        match value {
            Resolved::Raw(Value::Datetime(d)) => Ok(d),
            other => Err(other),
        }
    }
}

impl Typed for Value {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Primitive(Primitive::Any)
    }
}

impl FromResolved for Value {
    fn from_resolved(value: Resolved) -> Result<Self, Resolved> {
        match value {
            Resolved::Raw(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence(T::descriptor())
    }
}

impl<T: FromResolved> FromResolved for Vec<T> {
    fn from_resolved(value: Resolved) -> Result<Self, Resolved> {
        match value {
            Resolved::Sequence(items) => items.into_iter().map(T::from_resolved).collect(),
            Resolved::Raw(Value::Array(items)) => items
                .into_iter()
                .map(|item| T::from_resolved(Resolved::Raw(item)))
                .collect(),
            other => Err(other),
        }
    }
}

impl<T: Typed> Typed for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::optional(T::descriptor())
    }
}

impl<T: FromResolved> FromResolved for Option<T> {
    fn from_resolved(value: Resolved) -> Result<Self, Resolved> {
        match value {
            Resolved::Raw(Value::Null) => Ok(None),
            other => T::from_resolved(other).map(Some),
        }
    }
}

// Boxing is how a record refers to its own type.
impl<T: Typed> Typed for Box<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }
}

impl<T: FromResolved> FromResolved for Box<T> {
    fn from_resolved(value: Resolved) -> Result<Self, Resolved> {
        T::from_resolved(value).map(Box::new)
    }
}

fn map_entries<T: FromResolved>(value: Resolved) -> Result<Vec<(String, T)>, Resolved> {
    match value {
        Resolved::Mapping(entries) => entries
            .into_iter()
            .map(|(key, item)| T::from_resolved(item).map(|v| (key, v)))
            .collect(),
        Resolved::Raw(Value::Table(entries)) => entries
            .into_iter()
            .map(|(key, item)| T::from_resolved(Resolved::Raw(item)).map(|v| (key, v)))
            .collect(),
        other => Err(other),
    }
}

impl<T: Typed> Typed for BTreeMap<String, T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::mapping(String::descriptor(), T::descriptor())
    }
}

impl<T: FromResolved> FromResolved for BTreeMap<String, T> {
    fn from_resolved(value: Resolved) -> Result<Self, Resolved> {
        map_entries(value).map(|entries| entries.into_iter().collect())
    }
}

impl<T: Typed> Typed for HashMap<String, T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::mapping(String::descriptor(), T::descriptor())
    }
}

impl<T: FromResolved> FromResolved for HashMap<String, T> {
    fn from_resolved(value: Resolved) -> Result<Self, Resolved> {
        map_entries(value).map(|entries| entries.into_iter().collect())
    }
}

/// A value of one of two types, declared as the union `L | R`.
///
/// Extraction tries `L` first.
#[derive(Debug, Clone, PartialEq)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<L: Typed, R: Typed> Typed for Either<L, R> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Union(vec![L::descriptor(), R::descriptor()])
    }
}

impl<L: FromResolved, R: FromResolved> FromResolved for Either<L, R> {
    fn from_resolved(value: Resolved) -> Result<Self, Resolved> {
        match L::from_resolved(value) {
            Ok(left) => Ok(Either::Left(left)),
            Err(value) => R::from_resolved(value).map(Either::Right),
        }
    }
}
