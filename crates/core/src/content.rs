//! Idempotent merging of generated fragments into source files.
//!
//! A fragment is merged into whatever the target file already holds, the
//! result is normalised (imports hoisted and deduplicated, blank runs
//! collapsed) and the whole file is rewritten. Appending a fragment that is
//! already present leaves the file untouched.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::files::make_file;

fn is_import(line: &str) -> bool {
    line.trim().starts_with("import")
}

fn normalize_import(line: &str) -> String {
    line.replace('\'', "\"")
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Normalise merged file content.
///
/// - `import` lines get double quotes, are deduplicated (first occurrence
///   wins) and are moved above every other line
/// - the remaining lines keep their relative order, with leading and
///   trailing blank lines dropped and blank runs collapsed to one
/// - non-empty output ends with a single newline
pub fn make_content(content: &str) -> String {
    let mut seen = HashSet::new();
    let mut imports = Vec::new();
    let mut body = Vec::new();
    for line in content.split('\n') {
        if is_import(line) {
            let line = normalize_import(line);
            if seen.insert(line.clone()) {
                imports.push(line);
            }
        } else {
            body.push(line.trim_end_matches('\r'));
        }
    }

    let start = body.iter().position(|line| !is_blank(line)).unwrap_or(body.len());
    let end = body.iter().rposition(|line| !is_blank(line)).map_or(start, |i| i + 1);

    let mut lines: Vec<&str> = imports.iter().map(String::as_str).collect();
    for line in &body[start..end] {
        if is_blank(line) && lines.last().is_some_and(|last| is_blank(last)) {
            continue;
        }
        lines.push(if is_blank(line) { "" } else { *line });
    }

    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Check whether `fragment` is already part of `existing`.
///
/// True when the fragment occurs verbatim, or when every import it needs is
/// present and its normalised non-import body occurs verbatim.
pub fn contains_fragment(existing: &str, fragment: &str) -> bool {
    if existing.contains(fragment) {
        return true;
    }

    let normalized = make_content(fragment);
    let existing_imports: HashSet<String> = existing
        .lines()
        .filter(|line| is_import(line))
        .map(normalize_import)
        .collect();

    let mut body = Vec::new();
    for line in normalized.lines() {
        if is_import(line) {
            if !existing_imports.contains(line) {
                return false;
            }
        } else {
            body.push(line);
        }
    }
    let body = body.join("\n");
    body.is_empty() || existing.contains(&body)
}

/// What [`append_content`] did to the target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    Written(PathBuf),
    /// The merged content equals what is already on disk.
    Unchanged,
    /// The content differs but the file exists and `force` is off.
    Refused,
}

/// Merge `content` into the file at `path` and rewrite it.
///
/// A missing or unreadable file counts as empty.
pub fn append_content(path: &Path, content: &str, force: bool) -> AppendOutcome {
    let existing = fs::read_to_string(path).unwrap_or_default();

    let merged = if contains_fragment(&existing, content) {
        debug!(path = %path.display(), "Fragment already present.");
        existing.clone()
    } else {
        format!("{existing}\n{content}")
    };

    let processed = make_content(&merged);
    if processed == existing {
        debug!(path = %path.display(), "Content unchanged; skipping write.");
        return AppendOutcome::Unchanged;
    }

    if make_file(path, &processed, force, None) {
        info!(path = %path.display(), "Wrote file.");
        AppendOutcome::Written(path.to_path_buf())
    } else {
        AppendOutcome::Refused
    }
}
