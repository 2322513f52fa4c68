//! End-to-end `apigen make` runs without the external client generator.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use apigen_cli::run_cli;
use tempfile::TempDir;

const OPENAPI: &str = r#"
openapi: 3.0.3
info: {title: greeting, version: 1.0.0}
components:
  schemas:
    GreetingIN:
      type: object
      required: [data]
      properties:
        data:
          type: object
          required: [name]
          properties:
            name: {type: string, minLength: 1}
            polite: {type: boolean, default: true}
    GreetingOUT:
      type: object
      required: [result]
      properties:
        result:
          type: object
          properties:
            message: {type: string, nullable: true}
"#;

const GREETING_API: &str = r#"
export class GreetingApi extends runtime.BaseAPI {
    async greetingPostRaw(requestParameters: GreetingPostRequest): Promise<runtime.ApiResponse<GreetingOUT>> {
    }
    async greetingPost(requestParameters: GreetingPostRequest): Promise<GreetingOUT> {
    }
}
"#;

fn make(input: &Path, out: &Path, extra: &[&str]) -> i32 {
    let mut args: Vec<String> = vec![
        "apigen".into(),
        "make".into(),
        "--skipClient".into(),
        "-i".into(),
        input.display().to_string(),
        "-o".into(),
        out.display().to_string(),
    ];
    args.extend(extra.iter().map(|arg| (*arg).to_string()));
    run_cli(args)
}

#[test]
fn test_make_generates_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("greeting.yaml");
    fs::write(&input, OPENAPI).unwrap();
    let out = temp_dir.path().join("docs");

    // Pretend the client generator already ran.
    let apis = out.join("greeting").join("apis");
    fs::create_dir_all(&apis).unwrap();
    fs::write(apis.join("GreetingApi.ts"), GREETING_API).unwrap();

    assert_eq!(make(&input, &out, &[]), 0);

    let target = out.join("greeting");
    assert_eq!(fs::read_to_string(target.join("greeting.yaml")).unwrap(), OPENAPI);
    for hook in [
        "_useConfiguration.ts",
        "_useFnCommon.ts",
        "useGreetingApi.ts",
        "useGreetingPost.tsx",
    ] {
        assert!(target.join("uses").join(hook).is_file(), "missing {hook}");
    }

    let defaults =
        fs::read_to_string(target.join("defaults").join("GreetingINData_default.ts")).unwrap();
    assert!(defaults.contains("\"name\": \"\""));
    assert!(!defaults.contains("polite"));

    let schema = fs::read_to_string(target.join("zodSchemas").join("Greeting_schema.ts")).unwrap();
    assert!(schema.contains("\"name\": z.string().min(1),"));
    assert!(schema.contains("\"polite\": z.boolean().default(true).optional(),"));
    assert!(schema.contains("\"message\": z.string().nullable().optional(),"));
}

#[test]
fn test_make_flags_disable_steps() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("greeting.yaml");
    fs::write(&input, OPENAPI).unwrap();
    let out = temp_dir.path().join("docs");

    let code = make(
        &input,
        &out,
        &["--genHooks", "false", "--genZodSchemas", "false", "--allProperties", "-n", "g"],
    );
    assert_eq!(code, 0);

    let target = out.join("g");
    assert!(target.join("g.yaml").is_file());
    assert!(!target.join("uses").exists());
    assert!(!target.join("zodSchemas").exists());
    let defaults =
        fs::read_to_string(target.join("defaults").join("GreetingINData_default.ts")).unwrap();
    assert!(defaults.contains("\"polite\": true"));
}

#[test]
fn test_existing_fixture_needs_force() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("greeting.yaml");
    fs::write(&input, OPENAPI).unwrap();
    let out = temp_dir.path().join("docs");
    let fixture = out
        .join("greeting")
        .join("defaults")
        .join("GreetingINData_default.ts");
    fs::create_dir_all(fixture.parent().unwrap()).unwrap();
    fs::write(&fixture, "// hand written\n").unwrap();

    assert_eq!(make(&input, &out, &["--genHooks", "false"]), 0);
    assert_eq!(fs::read_to_string(&fixture).unwrap(), "// hand written\n");

    assert_eq!(make(&input, &out, &["--genHooks", "false", "--force"]), 0);
    let merged = fs::read_to_string(&fixture).unwrap();
    assert!(merged.starts_with("import {GreetingIN} from \"../models/GreetingIN\"\n// hand written\n"));
}

#[test]
fn test_missing_input_exits_non_zero() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("docs");
    assert_eq!(make(&temp_dir.path().join("missing.yaml"), &out, &[]), 1);
}

#[test]
fn test_missing_config_file_exits_non_zero() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("greeting.yaml");
    fs::write(&input, OPENAPI).unwrap();
    let config = temp_dir.path().join("absent.toml");
    let code = make(
        &input,
        &temp_dir.path().join("docs"),
        &["--config", config.to_str().unwrap()],
    );
    assert_eq!(code, 1);
}
