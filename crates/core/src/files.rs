//! Scoped file writing with overwrite protection.

use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{debug, error, warn};

/// External source formatter (for example `npx prettier --write`), invoked
/// with the target path appended to its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    pub program: String,
    pub args: Vec<String>,
}

impl Formatter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Format a file or directory in place.
    pub fn format(&self, target: &Path) -> Result<(), String> {
        debug!(
            program = %self.program,
            target = %target.display(),
            "Running formatter."
        );
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(target)
            .output()
            .map_err(|err| format!("Failed to spawn '{}': {err}", self.program))?;
        if output.status.success() {
            return Ok(());
        }
        Err(format!(
            "{} exited with status {}: {}",
            self.display(),
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        ))
    }

    /// Format the command for display/logging.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Create `dir` and its parents if needed. Returns whether it exists
/// afterwards.
pub fn make_dir(dir: &Path) -> bool {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return true;
    }
    if let Err(err) = fs::create_dir_all(dir) {
        error!(dir = %dir.display(), "Failed to create directory: {err}");
    }
    dir.is_dir()
}

/// Write `content` to `path`.
///
/// Refuses to overwrite an existing file unless `force` is set. When a
/// formatter is given it runs on the written file; formatter failures are
/// logged but do not undo the write.
pub fn make_file(path: &Path, content: &str, force: bool, formatter: Option<&Formatter>) -> bool {
    if let Some(parent) = path.parent() {
        if !make_dir(parent) {
            error!(dir = %parent.display(), "Can not create directory.");
            return false;
        }
    }

    if path.exists() && !force {
        warn!(
            path = %path.display(),
            "File already exists; use --force to overwrite."
        );
        return false;
    }

    if let Err(err) = fs::write(path, content) {
        error!(path = %path.display(), "Failed to write file: {err}");
        return false;
    }

    if let Some(formatter) = formatter {
        if let Err(err) = formatter.format(path) {
            warn!(path = %path.display(), "Formatter failed: {err}");
        }
    }
    true
}
