//! React data-fetching hooks rendered next to the generated API client.
//!
//! For a client directory containing `apis/<Name>Api.ts`, this writes into
//! `uses/`:
//! - `_useConfiguration.ts` and `_useFnCommon.ts` (shared helpers)
//! - `use<Name>Api.ts` per API class
//! - `use<Method>.tsx` per API method whose name ends in `Post`

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tera::Context;
use tracing::{debug, info, warn};

use crate::error::{GenError, Result};
use crate::files::{Formatter, make_file};
use crate::utils::{capitalize_first, lower_first};

pub const APIS_DIR: &str = "apis";
pub const USES_DIR: &str = "uses";

const USE_CONFIGURATION: &str = include_str!("../templates/_useConfiguration.ts");
const USE_FN_COMMON: &str = include_str!("../templates/_useFnCommon.ts");
const USE_API_TEMPLATE: &str = include_str!("../templates/useApi.ts.tera");
const USE_FN_TEMPLATE: &str = include_str!("../templates/useFn.tsx.tera");

const POST_SUFFIX: &str = "Post";

fn render(name: &str, template: &str, context: &Context) -> Result<String> {
    tera::Tera::one_off(template, context, false).map_err(|err| GenError::Template {
        name: name.to_string(),
        message: err.to_string(),
    })
}

/// Render the API-instance hook for `api_name` (e.g. `GreetingApi`).
pub fn render_api_hook(api_name: &str) -> Result<String> {
    let mut context = Context::new();
    context.insert("api_name", api_name);
    render("useApi.ts", USE_API_TEMPLATE, &context)
}

/// Render the request hook for `method` (e.g. `greetingPost`) of `api_name`.
pub fn render_method_hook(api_name: &str, method: &str) -> Result<String> {
    let method_capitalized = capitalize_first(method);
    let operation = method_capitalized
        .strip_suffix(POST_SUFFIX)
        .unwrap_or(&method_capitalized)
        .to_string();

    let mut context = Context::new();
    context.insert("api_name", api_name);
    context.insert("api_var", &lower_first(api_name));
    context.insert("method", method);
    context.insert("method_capitalized", &method_capitalized);
    context.insert("operation_var", &lower_first(&operation));
    context.insert("operation", &operation);
    render("useFn.tsx", USE_FN_TEMPLATE, &context)
}

/// Names of the `async` methods declared in a generated API class, in
/// declaration order and without duplicates.
pub fn api_methods(source: &str) -> Result<Vec<String>> {
    let pattern = Regex::new(r"(?m)^\s*(?:public\s+)?async\s+([A-Za-z_$][\w$]*)\s*\(").map_err(
        |err| GenError::Template {
            name: "api method scan".to_string(),
            message: err.to_string(),
        },
    )?;

    let mut methods: Vec<String> = Vec::new();
    for captures in pattern.captures_iter(source) {
        let name = &captures[1];
        if !methods.iter().any(|m| m == name) {
            methods.push(name.to_string());
        }
    }
    Ok(methods)
}

/// Methods that get a request hook: names ending in `Post`. The `...PostRaw`
/// variants never match.
pub fn post_methods(source: &str) -> Result<Vec<String>> {
    Ok(api_methods(source)?
        .into_iter()
        .filter(|name| name.ends_with(POST_SUFFIX))
        .collect())
}

/// API class files in `apis_dir`, sorted by name.
fn api_files(apis_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(apis_dir).map_err(|source| GenError::Io {
        path: apis_dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<(String, PathBuf)> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter_map(|path| {
            let api_name = path.file_name()?.to_str()?.strip_suffix(".ts")?.to_string();
            api_name.ends_with("Api").then_some((api_name, path))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn write(path: PathBuf, content: &str, formatter: Option<&Formatter>, written: &mut Vec<PathBuf>) {
    if make_file(&path, content, true, formatter) {
        debug!(path = %path.display(), "Wrote hook.");
        written.push(path);
    }
}

/// Render every hook for the client generated into `client_dir`.
///
/// A client without an `apis/` directory yields no hooks and a warning.
pub fn write_hooks(client_dir: &Path, formatter: Option<&Formatter>) -> Result<Vec<PathBuf>> {
    let apis_dir = client_dir.join(APIS_DIR);
    if !apis_dir.is_dir() {
        warn!(
            dir = %apis_dir.display(),
            "No generated apis directory; skipping hooks."
        );
        return Ok(Vec::new());
    }

    let uses_dir = client_dir.join(USES_DIR);
    let mut written = Vec::new();
    write(
        uses_dir.join("_useConfiguration.ts"),
        USE_CONFIGURATION,
        formatter,
        &mut written,
    );
    write(
        uses_dir.join("_useFnCommon.ts"),
        USE_FN_COMMON,
        formatter,
        &mut written,
    );

    for (api_name, path) in api_files(&apis_dir)? {
        let source = fs::read_to_string(&path).map_err(|source| GenError::Io {
            path: path.clone(),
            source,
        })?;

        let hook = render_api_hook(&api_name)?;
        write(
            uses_dir.join(format!("use{api_name}.ts")),
            &hook,
            formatter,
            &mut written,
        );

        for method in post_methods(&source)? {
            let hook = render_method_hook(&api_name, &method)?;
            write(
                uses_dir.join(format!("use{}.tsx", capitalize_first(&method))),
                &hook,
                formatter,
                &mut written,
            );
        }
        info!(api = %api_name, "Hooks generated.");
    }

    Ok(written)
}
