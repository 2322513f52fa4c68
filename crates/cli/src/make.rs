use clap::{ArgAction, Args};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use apigen_core::config::Config;
use apigen_core::hooks::write_hooks;
use apigen_core::walker::{DEFAULTS_DIR, ZOD_SCHEMAS_DIR};
use apigen_core::{Formatter, WalkOptions, load_documents, write_defaults, write_zod_schemas};

use crate::GlobalOptions;
use crate::common::{ExternalCommand, format_elapsed_ms, run_cli_async, run_with_spinner_async};
use crate::source::InputSource;

const DEFAULT_INPUT: &str = "api.yaml";

#[derive(Args, Debug, Clone)]
pub struct MakeArgs {
    #[arg(
        short = 'i',
        long = "inputYaml",
        value_name = "PATH|URL",
        default_value = DEFAULT_INPUT,
        help = "OpenAPI document: a local path or an http(s) URL"
    )]
    pub input_yaml: String,
    #[arg(
        short = 'o',
        long = "outDir",
        value_name = "DIR",
        help = "Output directory [default: docs, or make.out_dir from apigen.toml]"
    )]
    pub out_dir: Option<PathBuf>,
    #[arg(
        short = 'n',
        long = "name",
        help = "Output sub-directory name. Defaults to the input's file name"
    )]
    pub name: Option<String>,
    #[arg(long = "genDefaults", value_name = "BOOL", action = ArgAction::Set, help = "Generate default-value fixtures [default: true]")]
    pub gen_defaults: Option<bool>,
    #[arg(long = "genZodSchemas", value_name = "BOOL", action = ArgAction::Set, help = "Generate Zod validation schemas [default: true]")]
    pub gen_zod_schemas: Option<bool>,
    #[arg(long = "genHooks", value_name = "BOOL", action = ArgAction::Set, help = "Generate React hooks [default: true]")]
    pub gen_hooks: Option<bool>,
    #[arg(
        long = "allProperties",
        help = "Include non-required data properties in default fixtures"
    )]
    pub all_properties: bool,
    #[arg(long = "skipClient", help = "Do not run the external client generator")]
    pub skip_client: bool,
    #[arg(long = "format", help = "Run the configured formatter over written files")]
    pub format: bool,
}

/// Everything one `make` run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct MakeContext {
    pub name: String,
    pub source: InputSource,
    /// `<outDir>/<name>`: client, hooks, fixtures and schemas all go here.
    pub target_dir: PathBuf,
    /// Local copy of the input document.
    pub yaml_path: PathBuf,
    pub force: bool,
    pub gen_defaults: bool,
    pub gen_zod_schemas: bool,
    pub gen_hooks: bool,
    pub required_only: bool,
    pub skip_client: bool,
    pub format: bool,
    pub config: Config,
}

impl MakeContext {
    /// Merge flags over the loaded configuration. Fails when no name can be
    /// derived.
    pub fn resolve(
        args: &MakeArgs,
        global: &GlobalOptions,
        config: Config,
        cwd: &Path,
    ) -> Result<Self, String> {
        let source = InputSource::parse(&args.input_yaml);
        let name = args
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .or_else(|| source.derive_name())
            .ok_or_else(|| {
                format!(
                    "Could not derive a name from '{source}'; pass one with --name"
                )
            })?;

        let out_dir = args
            .out_dir
            .clone()
            .unwrap_or_else(|| config.make.out_dir.clone());
        let target_dir = cwd.join(out_dir).join(&name);
        let yaml_path = target_dir.join(format!("{name}.yaml"));

        Ok(Self {
            source: match source {
                InputSource::Local(path) => InputSource::Local(cwd.join(path)),
                remote @ InputSource::Remote(_) => remote,
            },
            name,
            target_dir,
            yaml_path,
            force: global.force,
            gen_defaults: args.gen_defaults.unwrap_or(config.make.gen_defaults),
            gen_zod_schemas: args.gen_zod_schemas.unwrap_or(config.make.gen_zod_schemas),
            gen_hooks: args.gen_hooks.unwrap_or(config.make.gen_hooks),
            required_only: !args.all_properties && config.make.required_only,
            skip_client: args.skip_client,
            format: args.format,
            config,
        })
    }

    fn formatter(&self) -> Option<Formatter> {
        self.format
            .then(|| Formatter::from(self.config.formatter.clone()))
    }

    fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            out_dir: self.target_dir.clone(),
            force: self.force,
            required_only: self.required_only,
        }
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MakeSummary {
    pub hooks: usize,
    pub defaults: usize,
    /// Existing fixtures left stale because `--force` was off.
    pub outdated_defaults: usize,
    pub zod_schemas: usize,
}

pub async fn run(args: MakeArgs, global: GlobalOptions) -> i32 {
    run_cli_async(|| run_inner(args, global)).await
}

async fn run_inner(args: MakeArgs, global: GlobalOptions) -> Result<(), String> {
    let cwd = std::env::current_dir()
        .map_err(|err| format!("Failed to determine current directory: {err}"))?;
    let config = Config::load(global.config.as_deref(), &cwd).map_err(|err| err.to_string())?;
    let ctx = MakeContext::resolve(&args, &global, config, &cwd)?;

    let start = Instant::now();
    let summary = make(&ctx).await?;
    println!(
        "✅ Generated '{}' in {}: {} hook file(s), {} default fixture(s), {} schema file(s) ({})",
        ctx.name,
        ctx.target_dir.display(),
        summary.hooks,
        summary.defaults,
        summary.zod_schemas,
        format_elapsed_ms(start)
    );
    if summary.outdated_defaults > 0 {
        println!(
            "⚠️  {} default fixture(s) left out of date; rerun with --force to overwrite",
            summary.outdated_defaults
        );
    }
    Ok(())
}

/// Run every enabled step for `ctx`.
pub async fn make(ctx: &MakeContext) -> Result<MakeSummary, String> {
    debug!(?ctx, "Starting make.");
    let mut summary = MakeSummary::default();

    run_with_spinner_async(
        &format!("Fetching {}...", ctx.source),
        &format!("📄 Input copied to {}", ctx.yaml_path.display()),
        || ctx.source.fetch_to(&ctx.yaml_path),
    )
    .await?;

    if ctx.skip_client {
        info!("Skipping client generation.");
    } else {
        let generator = ExternalCommand::new(
            ctx.config.generator.program.clone(),
            ctx.config.generator.args.clone(),
        )
        .arg("-i")
        .path_arg(&ctx.yaml_path)
        .arg("-o")
        .path_arg(&ctx.target_dir);
        run_with_spinner_async(
            "Generating API client...",
            "🧬 API client generated",
            || async {
                let output = generator.run(&ctx.target_dir).await?;
                debug!(stdout = %output.stdout, "Generator finished.");
                Ok::<(), String>(())
            },
        )
        .await?;
    }

    let formatter = ctx.formatter();

    if ctx.gen_hooks {
        let written = write_hooks(&ctx.target_dir, formatter.as_ref()).map_err(|err| err.to_string())?;
        summary.hooks = written.len();
    }

    if ctx.gen_defaults || ctx.gen_zod_schemas {
        let documents = load_documents(&ctx.yaml_path).map_err(|err| err.to_string())?;
        let options = ctx.walk_options();
        if ctx.gen_defaults {
            let report = write_defaults(&documents, &options);
            for path in &report.refused {
                warn!(path = %path.display(), "Default fixture is out of date; rerun with --force to overwrite.");
            }
            summary.defaults = report.written.len();
            summary.outdated_defaults = report.refused.len();
        }
        if ctx.gen_zod_schemas {
            summary.zod_schemas = write_zod_schemas(&documents, &options).written.len();
        }
    }

    if let Some(formatter) = &formatter {
        for dir in [DEFAULTS_DIR, ZOD_SCHEMAS_DIR] {
            let dir = ctx.target_dir.join(dir);
            if !dir.is_dir() {
                continue;
            }
            if let Err(err) = formatter.format(&dir) {
                warn!(dir = %dir.display(), "Formatter failed: {err}");
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: MakeArgs,
    }

    fn parse(args: &[&str]) -> MakeArgs {
        TestCli::try_parse_from(std::iter::once("make").chain(args.iter().copied()))
            .unwrap()
            .args
    }

    fn global(force: bool) -> GlobalOptions {
        GlobalOptions {
            force,
            config: None,
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let cwd = Path::new("/work");
        let ctx = MakeContext::resolve(&parse(&[]), &global(false), Config::default(), cwd).unwrap();
        assert_eq!(ctx.name, "api");
        assert_eq!(ctx.target_dir, PathBuf::from("/work/docs/api"));
        assert_eq!(ctx.yaml_path, PathBuf::from("/work/docs/api/api.yaml"));
        assert_eq!(ctx.source, InputSource::Local(PathBuf::from("/work/api.yaml")));
        assert!(ctx.gen_defaults && ctx.gen_zod_schemas && ctx.gen_hooks);
        assert!(ctx.required_only);
        assert!(!ctx.force);
    }

    #[test]
    fn test_resolve_flags_override_config() {
        let mut config = Config::default();
        config.make.out_dir = PathBuf::from("app/docs");
        config.make.gen_hooks = false;

        let args = parse(&[
            "-i",
            "https://example.com/specs/functions.yaml",
            "--genDefaults",
            "false",
            "--genHooks",
            "true",
            "--allProperties",
            "-n",
            "fns",
        ]);
        let ctx = MakeContext::resolve(&args, &global(true), config, Path::new("/work")).unwrap();
        assert_eq!(ctx.name, "fns");
        assert_eq!(ctx.target_dir, PathBuf::from("/work/app/docs/fns"));
        assert!(!ctx.gen_defaults);
        assert!(ctx.gen_hooks);
        assert!(!ctx.required_only);
        assert!(ctx.force);
        assert!(matches!(ctx.source, InputSource::Remote(_)));
    }

    #[test]
    fn test_resolve_without_name_fails() {
        let args = parse(&["-i", "https://example.com"]);
        let err =
            MakeContext::resolve(&args, &global(false), Config::default(), Path::new("/w")).unwrap_err();
        assert!(err.contains("--name"));
    }

    #[tokio::test]
    async fn test_make_without_client() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("shop.yaml");
        fs::write(
            &input,
            "components:\n  schemas:\n    OrderIN:\n      type: object\n      properties:\n        data:\n          type: object\n          required: [qty]\n          properties:\n            qty: {type: integer, default: 1}\n",
        )
        .unwrap();

        let args = parse(&["-i", input.to_str().unwrap(), "--skipClient"]);
        let ctx =
            MakeContext::resolve(&args, &global(false), Config::default(), temp_dir.path()).unwrap();
        let summary = make(&ctx).await.unwrap();

        assert_eq!(
            summary,
            MakeSummary {
                hooks: 0,
                defaults: 1,
                outdated_defaults: 0,
                zod_schemas: 1,
            }
        );
        let target = temp_dir.path().join("docs").join("shop");
        assert!(target.join("shop.yaml").is_file());
        let defaults =
            fs::read_to_string(target.join("defaults").join("OrderINData_default.ts")).unwrap();
        assert!(defaults.contains("\"qty\": 1"));
        assert!(target.join("zodSchemas").join("Order_schema.ts").is_file());
    }

    #[tokio::test]
    async fn test_make_counts_outdated_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("shop.yaml");
        let yaml = |qty: u32| {
            format!(
                "components:\n  schemas:\n    OrderIN:\n      type: object\n      properties:\n        data:\n          type: object\n          required: [qty]\n          properties:\n            qty: {{type: integer, default: {qty}}}\n"
            )
        };
        fs::write(&input, yaml(1)).unwrap();
        let args = parse(&["-i", input.to_str().unwrap(), "--skipClient", "--genZodSchemas", "false"]);
        make(&MakeContext::resolve(&args, &global(false), Config::default(), temp_dir.path()).unwrap())
            .await
            .unwrap();

        fs::write(&input, yaml(5)).unwrap();
        let ctx =
            MakeContext::resolve(&args, &global(false), Config::default(), temp_dir.path()).unwrap();
        let summary = make(&ctx).await.unwrap();
        assert_eq!(summary.defaults, 0);
        assert_eq!(summary.outdated_defaults, 1);
        let fixture = ctx.target_dir.join("defaults").join("OrderINData_default.ts");
        assert!(fs::read_to_string(&fixture).unwrap().contains("\"qty\": 1"));

        let ctx =
            MakeContext::resolve(&args, &global(true), Config::default(), temp_dir.path()).unwrap();
        let summary = make(&ctx).await.unwrap();
        assert_eq!(summary.defaults, 1);
        assert_eq!(summary.outdated_defaults, 0);
    }

    #[tokio::test]
    async fn test_make_missing_input_fails() {
        let temp_dir = TempDir::new().unwrap();
        let args = parse(&["-i", "nope.yaml", "--skipClient"]);
        let ctx =
            MakeContext::resolve(&args, &global(false), Config::default(), temp_dir.path()).unwrap();
        assert!(make(&ctx).await.unwrap_err().contains("not found"));
    }

    #[tokio::test]
    async fn test_make_failing_generator_aborts() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("api.yaml"), "openapi: 3.0.0\n").unwrap();

        let mut config = Config::default();
        config.generator.program = "apigen-generator-that-does-not-exist".to_string();
        let ctx = MakeContext::resolve(&parse(&[]), &global(false), config, temp_dir.path()).unwrap();

        let err = make(&ctx).await.unwrap_err();
        assert!(err.contains("apigen-generator-that-does-not-exist"));
        assert!(!temp_dir.path().join("docs/api/zodSchemas").exists());
    }
}
