//! Walks a multi-document OpenAPI fixture through both generators.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::path::{Path, PathBuf};

use apigen_core::{WalkOptions, load_documents, write_defaults, write_zod_schemas};
use tempfile::TempDir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("store.yaml")
}

fn read(dir: &Path, parts: &[&str]) -> String {
    let path = parts.iter().fold(dir.to_path_buf(), |path, part| path.join(part));
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("{}: {err}", path.display()))
}

#[test]
fn test_defaults_across_documents() {
    let out = TempDir::new().unwrap();
    let documents = load_documents(&fixture()).unwrap();
    assert_eq!(documents.len(), 2);

    let report = write_defaults(&documents, &WalkOptions::new(out.path()));
    assert_eq!(report.written.len(), 2);

    let list = read(out.path(), &["defaults", "ListProductsINData_default.ts"]);
    assert_eq!(
        list,
        "import {ListProductsIN} from \"../models/ListProductsIN\"\ntype INData = ListProductsIN['data'];\n\nexport const ListProductsINData_default: INData = {\n    \"category\": \"books\",\n    \"limit\": 20,\n    \"tags\": [\n        \"\"\n    ]\n}\n"
    );

    // Nothing in PingIN's data is required.
    let ping = read(out.path(), &["defaults", "PingINData_default.ts"]);
    assert!(ping.contains("export const PingINData_default: INData = {}"));
}

#[test]
fn test_all_properties_fixture() {
    let out = TempDir::new().unwrap();
    let documents = load_documents(&fixture()).unwrap();
    let options = WalkOptions {
        required_only: false,
        ..WalkOptions::new(out.path())
    };
    write_defaults(&documents, &options);

    let ping = read(out.path(), &["defaults", "PingINData_default.ts"]);
    assert!(ping.contains("\"echo\": \"pong\""));
    // A nullable string still synthesizes as a string.
    let list = read(out.path(), &["defaults", "ListProductsINData_default.ts"]);
    assert!(list.contains("\"cursor\": \"\""));
}

#[test]
fn test_zod_schemas_across_documents() {
    let out = TempDir::new().unwrap();
    let documents = load_documents(&fixture()).unwrap();
    let report = write_zod_schemas(&documents, &WalkOptions::new(out.path()));
    assert_eq!(report.written.len(), 4);
    assert_eq!(report.skipped, 1);

    let list = read(out.path(), &["zodSchemas", "ListProducts_schema.ts"]);
    assert!(list.starts_with("import { z } from \"zod\";\n/* IN Schema */\n"));
    assert!(list.contains("\"category\": z.enum([\"books\", \"games\"]).default(\"games\"),"));
    assert!(list.contains("\"limit\": z.number().int().min(1).max(100).default(20),"));
    assert!(list.contains("\"cursor\": z.string().nullable().optional(),"));
    assert!(list.contains("\"data\": z.array(z.unknown()),"));
    assert!(list.contains("export const ListProductsOUTResult_schema = ListProductsOUT_schema.shape.result"));
    assert!(list.contains("\"category\": \"games\""));

    let ping = read(out.path(), &["zodSchemas", "Ping_schema.ts"]);
    assert!(ping.contains("export const PingINData_schema = PingIN_schema.shape.data"));
    assert!(ping.contains("WARNING: 'result' property not found"));
}

#[test]
fn test_second_run_changes_nothing() {
    let out = TempDir::new().unwrap();
    let documents = load_documents(&fixture()).unwrap();
    let options = WalkOptions::new(out.path());
    write_defaults(&documents, &options);
    write_zod_schemas(&documents, &options);
    let before = read(out.path(), &["zodSchemas", "ListProducts_schema.ts"]);

    assert!(write_defaults(&documents, &options).written.is_empty());
    assert!(write_zod_schemas(&documents, &options).written.is_empty());
    assert_eq!(read(out.path(), &["zodSchemas", "ListProducts_schema.ts"]), before);
}
