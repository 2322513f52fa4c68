//! Where the OpenAPI document comes from, and copying it into the output
//! tree.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The `--inputYaml` value: a local path or an http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Local(PathBuf),
    Remote(String),
}

impl InputSource {
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            Self::Remote(input.to_string())
        } else {
            Self::Local(PathBuf::from(input))
        }
    }

    /// Name derived from the input: the file stem of a local path, or of
    /// the last path segment of a URL (query and fragment ignored).
    pub fn derive_name(&self) -> Option<String> {
        let stem = match self {
            Self::Local(path) => path.file_stem()?.to_str()?.to_string(),
            Self::Remote(url) => {
                let without_scheme = url.split_once("://").map_or(url.as_str(), |(_, rest)| rest);
                let path = without_scheme
                    .split(['?', '#'])
                    .next()
                    .unwrap_or_default();
                // The host is not a name.
                let (_, path) = path.split_once('/')?;
                let segment = path.trim_end_matches('/').rsplit('/').next()?;
                Path::new(segment).file_stem()?.to_str()?.to_string()
            }
        };
        let stem = stem.trim();
        (!stem.is_empty()).then(|| stem.to_string())
    }

    /// Copy or download the document to `dest`, creating parent
    /// directories.
    pub async fn fetch_to(&self, dest: &Path) -> Result<(), String> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| format!("Failed to create {}: {err}", parent.display()))?;
        }
        match self {
            Self::Local(path) => copy_local(path, dest),
            Self::Remote(url) => download(url, dest).await,
        }
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

fn copy_local(path: &Path, dest: &Path) -> Result<(), String> {
    if !path.is_file() {
        return Err(format!("Input file '{}' not found", path.display()));
    }
    let same_file = match (path.canonicalize(), dest.canonicalize()) {
        (Ok(src), Ok(dst)) => src == dst,
        _ => false,
    };
    if same_file {
        debug!(path = %path.display(), "Input already in place.");
        return Ok(());
    }
    fs::copy(path, dest).map_err(|err| {
        format!(
            "Failed to copy '{}' to '{}': {err}",
            path.display(),
            dest.display()
        )
    })?;
    info!(from = %path.display(), to = %dest.display(), "Copied input document.");
    Ok(())
}

async fn download(url: &str, dest: &Path) -> Result<(), String> {
    let client = reqwest::Client::builder()
        .build()
        .map_err(|err| format!("Failed to build HTTP client: {err}"))?;
    debug!(%url, "Downloading input document.");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|err| format!("Failed to download '{url}': {err}"))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("Failed to download '{url}': HTTP {status}"));
    }
    let body = response
        .bytes()
        .await
        .map_err(|err| format!("Failed to read response from '{url}': {err}"))?;
    fs::write(dest, &body).map_err(|err| format!("Failed to write {}: {err}", dest.display()))?;
    info!(%url, to = %dest.display(), bytes = body.len(), "Downloaded input document.");
    Ok(())
}
