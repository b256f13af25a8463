//! Typed configuration records loaded from TOML or in-memory data.
//!
//! Declare a record, point at a file, and get a fully typed, validated
//! instance back:
//!
//! ```ignore
//! typedconfig::record! {
//!     #[derive(Debug)]
//!     pub struct Server {
//!         pub host: String,
//!         pub port: i64 = 8080,
//!         pub tls: Option<Tls>,
//!     }
//! }
//!
//! let server: Server = Loader::new()
//!     .key("tool.myapp.server")
//!     .load(Path::new("pyproject.toml"))?;
//! ```
//!
//! # Records as the schema
//!
//! Every record type carries a [`Schema`]: its field names, a
//! [`TypeDescriptor`] per field, static defaults, and the schemas it
//! extends. Descriptors form a closed set:
//!
//! - **Primitives**: string, integer, float, boolean, array, table, any.
//! - **Library types**: TOML datetimes (offset, local, date-only, time-only).
//! - **Records**: other registered types, loaded recursively.
//! - **Containers**: `Vec<T>`, `BTreeMap<String, T>`, `HashMap<String, T>`.
//! - **Unions and optionals**: [`Either<L, R>`] and `Option<T>`.
//!
//! Plain records are declared with [`record!`], which derives the schema from
//! the Rust field types. Records that extend other schemas or have their own
//! construction logic implement [`Record`] by hand.
//!
//! # The load pipeline
//!
//! One load runs these steps per record, recursing into nested records:
//!
//! 1. **Locate**: pick the mapping to read (see [`Source`] and the key rules
//!    below).
//! 2. **Normalize**: `-` and `.` in keys become `_`, null values are dropped.
//! 3. **Collect**: gather the declared fields through the whole inheritance
//!    chain. A subtype's declaration overrides its base's.
//! 4. **Resolve**: present values are resolved against their descriptor
//!    (records become instances). Absent ones take the static default, or
//!    null when optional, or fail with [`ConfigError::MissingKey`].
//! 5. **Validate**: every value must match its descriptor, checked in
//!    declaration order. The first mismatch fails with
//!    [`ConfigError::InvalidType`].
//! 6. **Build**: construct the instance (see [`Shape`]).
//!
//! The input data is never modified, and nothing is handed back on failure.
//!
//! # Locating the data
//!
//! With an explicit dotted key (`.key("tool.myapp")`) that table is used;
//! `""` means the whole document. Without one, a document with a single
//! top-level table is unwrapped, then the record name in snake case is tried
//! (`ToolConfig` reads `[tool_config]`), and finally the whole document is
//! used.
//!
//! # Init values and existing instances
//!
//! [`Loader::init`] passes values straight to the record constructor,
//! bypassing validation (values for record fields are still built into
//! records). They win over the data for plain records and are the
//! only constructor input for [`Shape::Custom`] records.
//! [`Loader::load_existing`] populates an instance you already have; combining
//! it with init values is an error.
//!
//! # Strict mode
//!
//! Strict mode is **off by default**: keys no field declares are ignored, so
//! a shared file (a `pyproject.toml`, say) can carry settings for other
//! tools. Turn it on with [`.strict(true)`](Loader::strict) to fail with
//! [`ConfigError::UnknownKeys`] instead. Nested records inherit the setting.
//!
//! # Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events (`debug` for
//! load and key-selection decisions, `trace` per defaulted field) and never
//! installs a subscriber.
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` feature, on by default) provides
//! [`ConfigArgs`]: `--config`, `--config-key` and `--strict` flags to flatten
//! into your own parser. To use typedconfig without clap:
//!
//! ```toml
//! typedconfig = { version = "...", default-features = false }
//! ```

pub mod error;
pub mod record;

mod build;
#[cfg(feature = "clap")]
mod cli;
mod convert;
mod descriptor;
mod loader;
mod naming;
mod normalize;
mod resolve;
mod schema;
mod source;
mod validate;
mod value;

#[cfg(test)]
mod fixtures;

#[cfg(feature = "clap")]
pub use cli::ConfigArgs;
pub use convert::{Either, FromResolved, Instance, Resolved, Typed};
pub use descriptor::{Library, Primitive, RecordType, TypeDescriptor};
pub use error::ConfigError;
pub use loader::{Loader, TypedConfig, load_into, load_into_existing};
pub use naming::camel_to_snake;
pub use normalize::normalize;
pub use record::{Fields, Record, Shape};
pub use schema::{FieldDecl, FieldSet, Schema, collect};
pub use source::{Source, select};
pub use value::{Table, Value};
