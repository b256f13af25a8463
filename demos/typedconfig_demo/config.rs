//! Configuration records for the typedconfig demo application.
//!
//! The root [`DemoConfig`] nests two records, [`ServerConfig`] and
//! [`DisplayConfig`], plus a list of [`Upstream`] entries read from an array
//! of tables. Every nested record defaults to an empty table, so a missing
//! section falls back to the nested record's own defaults.
//!
//! A matching file looks like this:
//!
//! ```toml
//! [demo_config]
//! name = "my-demo"
//!
//! [demo_config.server]
//! port = 9000
//! max-connections = 50
//!
//! [[demo_config.upstreams]]
//! url = "http://10.0.0.1"
//! weight = 2.5
//! ```

use typedconfig::{Either, Table};

typedconfig::record! {
    /// Root configuration for the demo application.
    #[derive(Debug)]
    pub struct DemoConfig {
        /// Application name shown in the echo banner.
        pub name: String = "typedconfig-demo",
        /// Enable verbose output.
        pub verbose: bool = false,
        pub server: ServerConfig = Table::new(),
        pub display: DisplayConfig = Table::new(),
        pub upstreams: Vec<Upstream> = Vec::<String>::new(),
    }
}

typedconfig::record! {
    /// Server settings, under `[server]`.
    #[derive(Debug)]
    pub struct ServerConfig {
        pub host: String = "127.0.0.1",
        pub port: u16 = 8080,
        /// Read from `max_connections`, `max-connections` or `max.connections`.
        pub max_connections: u32 = 100,
        pub started: Option<toml::value::Datetime>,
    }
}

typedconfig::record! {
    /// Display and formatting settings, under `[display]`.
    #[derive(Debug)]
    pub struct DisplayConfig {
        /// Output color (red, green, yellow, blue, magenta, cyan).
        pub color: String = "yellow",
        /// `table` or `plain`.
        pub format: String = "table",
    }
}

typedconfig::record! {
    #[derive(Debug)]
    pub struct Upstream {
        pub url: String,
        /// Integer or fractional weight.
        pub weight: Either<i64, f64> = 1,
    }
}
