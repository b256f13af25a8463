//! # typedconfig demo application
//!
//! A sample CLI tool that showcases how to integrate typedconfig into a real
//! application. It exists purely to demonstrate and manually verify the
//! crate's features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example typedconfig_demo -- echo
//! cargo run --example typedconfig_demo -- --config demo.toml echo
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                 | How to exercise it                                                        |
//! |-------------------------|---------------------------------------------------------------------------|
//! | Compiled defaults       | `cargo run --example typedconfig_demo -- echo`                            |
//! | Config file             | `--config demo.toml echo`                                                 |
//! | Explicit key            | `--config pyproject.toml --config-key tool.demo echo`                     |
//! | Key guessed from type   | Put settings under `[demo_config]` in a file with several tables          |
//! | Strict mode             | `--strict` with a typo in the file                                        |
//! | Verbose override        | `--verbose echo`                                                          |
//! | Load tracing            | `RUST_LOG=typedconfig=debug cargo run --example typedconfig_demo -- echo` |

mod config;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use typedconfig::{ConfigArgs, ConfigError, Either};

use config::DemoConfig;

/// typedconfig demo: a sample CLI app for showcasing typedconfig.
#[derive(Parser, Debug)]
#[command(name = "typedconfig-demo")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Enable verbose output regardless of the config file.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the loaded configuration (colored by display.color).
    Echo,
    /// Print the configuration as the library sees it, with Debug formatting.
    Dump,
}

/// Init values for the root record. Unset flags are dropped, so they never
/// shadow the file.
#[derive(Serialize)]
struct Overrides {
    verbose: Option<bool>,
}

fn load(cli: &Cli) -> Result<DemoConfig, ConfigError> {
    let overrides = Overrides {
        verbose: cli.verbose.then_some(true),
    };
    cli.config
        .loader()
        .init_from(&overrides)
        .load(cli.config.source())
}

fn ansi_color_code(name: &str) -> &str {
    match name {
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        "magenta" => "\x1b[35m",
        "cyan" => "\x1b[36m",
        "white" => "\x1b[37m",
        _ => "\x1b[0m",
    }
}

const RESET: &str = "\x1b[0m";

fn echo_all(config: &DemoConfig) {
    let color = ansi_color_code(&config.display.color);

    if config.verbose {
        println!("{color}[verbose] Loaded configuration for {:?}{RESET}", config.name);
        println!();
    }

    let mut entries = vec![
        ("name".to_string(), config.name.clone()),
        ("verbose".to_string(), config.verbose.to_string()),
        ("server.host".to_string(), config.server.host.clone()),
        ("server.port".to_string(), config.server.port.to_string()),
        (
            "server.max_connections".to_string(),
            config.server.max_connections.to_string(),
        ),
        (
            "server.started".to_string(),
            config
                .server
                .started
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "<not set>".into()),
        ),
        ("display.color".to_string(), config.display.color.clone()),
        ("display.format".to_string(), config.display.format.clone()),
    ];
    for (i, upstream) in config.upstreams.iter().enumerate() {
        let weight = match &upstream.weight {
            Either::Left(w) => w.to_string(),
            Either::Right(w) => format!("{w:.2}"),
        };
        entries.push((format!("upstreams[{i}]"), format!("{} (weight {weight})", upstream.url)));
    }

    if config.display.format == "plain" {
        for (key, value) in &entries {
            println!("{key}={value}");
        }
    } else {
        let max_key_len = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in &entries {
            println!("{color}{key:<max_key_len$}{RESET}  {value}");
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load(&cli).unwrap_or_else(|e| {
        eprintln!("Failed to load config:\n{e}");
        std::process::exit(1);
    });

    match cli.command {
        Commands::Echo => echo_all(&config),
        Commands::Dump => println!("{config:#?}"),
    }
}
