#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub mod common;
pub mod make;
pub mod source;

/// Log filter environment variable.
const LOG_ENV: &str = "APIGEN_LOG";
/// Crates whose logs a plain `APIGEN_LOG` level applies to.
const LOG_TARGETS: [&str; 2] = ["apigen_cli", "apigen_core"];

#[derive(Parser)]
#[command(
    name = "apigen",
    version,
    about = "\x1b[33mapigen\x1b[0m generates a typed API client, React hooks, default fixtures and Zod schemas from an OpenAPI document"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options accepted before or after any subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    #[arg(
        short = 'f',
        long = "force",
        global = true,
        help = "Overwrite existing default fixtures"
    )]
    pub force: bool,
    #[arg(
        long = "config",
        value_name = "PATH",
        global = true,
        help = "Config file [default: ./apigen.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// 🔨 Generate the client, hooks, default fixtures and Zod schemas
    Make(make::MakeArgs),
}

/// Parse `args` (including the program name) and run the command. Returns
/// the process exit code.
pub fn run_cli(args: Vec<String>) -> i32 {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to create tokio runtime: {err}");
            return 1;
        }
    };

    runtime.block_on(run_cli_async(args))
}

async fn run_cli_async(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => {
            init_tracing();
            match cli.command {
                Some(Commands::Make(args)) => make::run(args, cli.global).await,
                None => {
                    let mut cmd = Cli::command();
                    let _ = cmd.print_help();
                    println!();
                    0
                }
            }
        }
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Build the tracing filter from the `APIGEN_LOG` value: a plain level
/// applies to the apigen crates, anything else is a full filter spec.
fn log_filter(value: Option<&str>) -> String {
    match value {
        Some(level) if is_plain_level(level) => LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(","),
        Some(spec) => spec.to_string(),
        None => log_filter(Some("info")),
    }
}

fn init_tracing() {
    let filter = log_filter(std::env::var(LOG_ENV).ok().as_deref());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
