//! Clap adapter for typedconfig.
//!
//! Compiled only with the `clap` Cargo feature (on by default). It provides
//! [`ConfigArgs`], a set of flags you can flatten into your own clap
//! `#[derive(Parser)]` struct to let users pick the config file, the key to
//! read from and strict mode.
//!
//! The bridge to the core is [`ConfigArgs::loader()`], which turns the parsed
//! flags into a [`Loader`]. If you use a different CLI parser, build the
//! [`Loader`] yourself.

use std::path::PathBuf;

use clap::Args;

use crate::error::ConfigError;
use crate::loader::Loader;
use crate::record::Record;
use crate::source::Source;
use crate::value::Table;

/// Clap-derived config flags.
///
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     config: ConfigArgs,
/// }
///
/// let cli = Cli::parse();
/// let settings: Settings = cli.config.load()?;
/// ```
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// TOML file to load configuration from.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Dotted key of the table to read (e.g. "tool.myapp"). Pass "" for the
    /// whole file.
    #[arg(long = "config-key", value_name = "KEY")]
    pub config_key: Option<String>,

    /// Fail on keys the config type does not declare.
    #[arg(long)]
    pub strict: bool,
}

impl ConfigArgs {
    /// A [`Loader`] set up from the parsed flags.
    pub fn loader(&self) -> Loader {
        let loader = Loader::new().strict(self.strict);
        match &self.config_key {
            Some(key) => loader.key(key),
            None => loader,
        }
    }

    /// The file to read, or an empty mapping when `--config` is absent.
    pub fn source(&self) -> Source {
        match &self.config {
            Some(path) => Source::Path(path.clone()),
            None => Source::from(Table::new()),
        }
    }

    /// Load `T` as the flags describe. Without `--config`, only defaults and
    /// optional fields can be filled.
    pub fn load<T: Record>(&self) -> Result<T, ConfigError> {
        self.loader().load(self.source())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{Empty, Point, Relevant, MULTIPLE_TOPLEVEL_TOML};
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    /// Wrapper so we can use `try_parse_from` on the flattened args.
    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    fn parse(args: &[&str]) -> ConfigArgs {
        TestCli::try_parse_from(args).unwrap().config
    }

    #[test]
    fn parse_no_flags() {
        let args = parse(&["test"]);
        assert_eq!(args.config, None);
        assert_eq!(args.config_key, None);
        assert!(!args.strict);
    }

    #[test]
    fn parse_all_flags() {
        let args = parse(&[
            "test",
            "--config",
            "app.toml",
            "--config-key",
            "tool.app",
            "--strict",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("app.toml")));
        assert_eq!(args.config_key.as_deref(), Some("tool.app"));
        assert!(args.strict);
    }

    #[test]
    fn parse_empty_key() {
        let args = parse(&["test", "--config-key", ""]);
        assert_eq!(args.config_key.as_deref(), Some(""));
    }

    #[test]
    fn config_flag_requires_value() {
        let result = TestCli::try_parse_from(["test", "--config"]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_flag_errors() {
        let result = TestCli::try_parse_from(["test", "--nope"]);
        assert!(result.is_err());
    }

    #[test]
    fn source_without_config_is_empty() {
        let args = parse(&["test"]);
        assert_eq!(args.source(), Source::from(Table::new()));
    }

    #[test]
    fn load_without_config_uses_defaults() {
        let empty: Empty = parse(&["test"]).load().unwrap();
        assert_eq!(empty.default, "allowed");
    }

    #[test]
    fn load_from_file_with_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "[server.origin]\nx = 1\ny = 2\n").unwrap();
        let path = path.to_str().unwrap();

        let point: Point = parse(&["test", "--config", path, "--config-key", "server.origin"])
            .load()
            .unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });
    }

    #[test]
    fn load_guesses_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, MULTIPLE_TOPLEVEL_TOML).unwrap();

        let relevant: Relevant = parse(&["test", "--config", path.to_str().unwrap()])
            .load()
            .unwrap();
        assert_eq!(relevant.key, "this one!");
    }

    #[test]
    fn load_strict_from_flag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "x = 1\ny = 2\nz = 3\n").unwrap();
        let path = path.to_str().unwrap();

        let lenient: Point = parse(&["test", "--config", path]).load().unwrap();
        assert_eq!(lenient, Point { x: 1, y: 2 });

        let err = parse(&["test", "--config", path, "--strict"])
            .load::<Point>()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKeys { .. }));
    }
}
