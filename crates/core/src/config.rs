//! `apigen.toml`: external commands and generation defaults.
//!
//! Every key is optional; missing keys fall back to the built-in defaults.
//!
//! ```toml
//! [generator]
//! program = "npx"
//! args = ["--yes", "@openapitools/openapi-generator-cli", "generate", "-g", "typescript-fetch"]
//!
//! [formatter]
//! program = "npx"
//! args = ["--yes", "prettier", "--write"]
//!
//! [make]
//! out_dir = "docs"
//! gen_defaults = true
//! gen_zod_schemas = true
//! gen_hooks = true
//! required_only = true
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{GenError, Result};
use crate::files::Formatter;

/// Config filename looked up in the working directory.
pub const CONFIG_FILENAME: &str = "apigen.toml";

/// An external program and its leading arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CommandConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandConfig {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|arg| (*arg).to_string()).collect(),
        }
    }

    fn default_generator() -> Self {
        Self::new(
            "npx",
            &[
                "--yes",
                "@openapitools/openapi-generator-cli",
                "generate",
                "-g",
                "typescript-fetch",
            ],
        )
    }

    fn default_formatter() -> Self {
        Self::new("npx", &["--yes", "prettier", "--write"])
    }
}

impl From<CommandConfig> for Formatter {
    fn from(command: CommandConfig) -> Self {
        Formatter::new(command.program, command.args)
    }
}

/// Defaults for the `make` command, overridable by flags.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MakeDefaults {
    pub out_dir: PathBuf,
    pub gen_defaults: bool,
    pub gen_zod_schemas: bool,
    pub gen_hooks: bool,
    pub required_only: bool,
}

impl Default for MakeDefaults {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("docs"),
            gen_defaults: true,
            gen_zod_schemas: true,
            gen_hooks: true,
            required_only: true,
        }
    }
}

/// The parsed configuration file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub generator: CommandConfig,
    pub formatter: CommandConfig,
    pub make: MakeDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator: CommandConfig::default_generator(),
            formatter: CommandConfig::default_formatter(),
            make: MakeDefaults::default(),
        }
    }
}

impl Config {
    /// Parse configuration text.
    pub fn from_toml(path: &Path, contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|err| GenError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, `apigen.toml` in `cwd` is
    /// used when present and the built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let implicit = cwd.join(CONFIG_FILENAME);
                if !implicit.exists() {
                    debug!("No {CONFIG_FILENAME}; using built-in defaults.");
                    return Ok(Self::default());
                }
                implicit
            }
        };

        let contents = fs::read_to_string(&path).map_err(|err| GenError::Config {
            path: path.clone(),
            message: format!("Failed to read config file: {err}"),
        })?;
        let config = Self::from_toml(&path, &contents)?;
        debug!(path = %path.display(), "Loaded configuration.");
        Ok(config)
    }
}
