use serde::Serialize;
use tracing::debug;

use crate::build::{LoadOptions, augment, construct};
use crate::error::ConfigError;
use crate::record::Record;
use crate::source::{Source, select};
use crate::value::{Table, Value};

/// Builder for a single load.
///
/// ```ignore
/// let tool: ToolConfig = Loader::new()
///     .key("tool.myapp")
///     .strict(true)
///     .load("pyproject.toml".as_ref())?;
/// ```
///
/// Every setting is optional: by default the data location is inferred (see
/// [`select`]), no init values are passed and unknown keys are ignored.
#[derive(Debug, Default)]
pub struct Loader {
    key: Option<String>,
    init: Option<Table>,
    strict: bool,
    deferred: Option<ConfigError>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dotted key of the mapping to load from. `""` selects the whole
    /// mapping.
    pub fn key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    /// Values handed straight to the record constructor, bypassing
    /// validation. Values for record fields are built into records first.
    pub fn init(mut self, init: Table) -> Self {
        self.init = Some(init);
        self
    }

    /// Like [`init`](Self::init), from anything serializable to a map.
    ///
    /// `None` fields are dropped. A failure to serialize is reported when the
    /// load runs.
    pub fn init_from<S: Serialize>(mut self, source: &S) -> Self {
        match init_table(source) {
            Ok(table) => self.init = Some(table),
            Err(err) => self.deferred = Some(err),
        }
        self
    }

    /// Reject data keys no field declares (default: `false`).
    /// Applies to nested records too.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn options(&self) -> LoadOptions {
        LoadOptions {
            strict: self.strict,
        }
    }

    fn locate<T: Record>(&self, source: &Source) -> Result<Table, ConfigError> {
        select(source.read()?, self.key.as_deref(), T::NAME)
    }

    /// Build a new `T` from `source`.
    pub fn load<T: Record>(mut self, source: impl Into<Source>) -> Result<T, ConfigError> {
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }
        debug!(
            record = T::NAME,
            key = ?self.key,
            shape = ?T::SHAPE,
            strict = self.strict,
            "loading record"
        );
        let data = self.locate::<T>(&source.into())?;
        let options = self.options();
        construct(&data, self.init, &options)
    }

    /// Populate `instance` from `source`. Setting init values for this is an
    /// error.
    pub fn load_existing<T: Record>(
        mut self,
        instance: T,
        source: impl Into<Source>,
    ) -> Result<T, ConfigError> {
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }
        if self.init.is_some() {
            return Err(ConfigError::InitOnExisting {
                record: T::NAME.to_string(),
            });
        }
        debug!(record = T::NAME, key = ?self.key, strict = self.strict, "loading into existing record");
        let data = self.locate::<T>(&source.into())?;
        let options = self.options();
        augment(instance, &data, self.init, &options)
    }
}

fn init_table<S: Serialize>(source: &S) -> Result<Table, ConfigError> {
    match Value::from(serde_json::to_value(source)?) {
        Value::Table(table) => Ok(table.into_iter().filter(|(_, v)| !v.is_null()).collect()),
        other => Err(ConfigError::NotATable {
            key: "init".into(),
            found: other.kind().to_string(),
        }),
    }
}

/// Load a new `T` from `source`.
///
/// `key` and `init` behave as on [`Loader`].
pub fn load_into<T: Record>(
    source: impl Into<Source>,
    key: Option<&str>,
    init: Option<Table>,
) -> Result<T, ConfigError> {
    let mut loader = Loader::new();
    if let Some(key) = key {
        loader = loader.key(key);
    }
    if let Some(init) = init {
        loader = loader.init(init);
    }
    loader.load(source)
}

/// Populate an existing `instance` from `source`.
///
/// Always fails with [`ConfigError::InitOnExisting`] when `init` is given.
pub fn load_into_existing<T: Record>(
    instance: T,
    source: impl Into<Source>,
    key: Option<&str>,
    init: Option<Table>,
) -> Result<T, ConfigError> {
    let mut loader = Loader::new();
    if let Some(key) = key {
        loader = loader.key(key);
    }
    if let Some(init) = init {
        loader = loader.init(init);
    }
    loader.load_existing(instance, source)
}

/// Loading shortcuts available on every [`Record`].
pub trait TypedConfig: Record {
    fn load(source: impl Into<Source>) -> Result<Self, ConfigError> {
        Loader::new().load(source)
    }

    fn load_key(source: impl Into<Source>, key: &str) -> Result<Self, ConfigError> {
        Loader::new().key(key).load(source)
    }
}

impl<T: Record> TypedConfig for T {}
