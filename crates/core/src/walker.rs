//! Walks every named schema of a YAML stream and writes the per-schema
//! artifacts: default-value fixtures for input schemas, and validation
//! schemas for input and output schemas.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::content::{AppendOutcome, append_content};
use crate::error::{GenError, Result};
use crate::schema::{NamedSchema, SchemaDocument, SchemaKind, SchemaNode, parse_documents};
use crate::synth::type_to_value;
use crate::utils::json_pretty;
use crate::zod::{Emit, get_default_values, to_zod_schema};

pub const DEFAULTS_DIR: &str = "defaults";
pub const ZOD_SCHEMAS_DIR: &str = "zodSchemas";

/// Role of a named schema, taken from its name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaRole {
    Input,
    Output,
}

impl SchemaRole {
    /// Classify a schema name. Names ending in neither `IN` nor `OUT` are
    /// not generation targets.
    pub fn classify(name: &str) -> Option<Self> {
        if name.ends_with("IN") {
            Some(Self::Input)
        } else if name.ends_with("OUT") {
            Some(Self::Output)
        } else {
            None
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Input => "IN",
            Self::Output => "OUT",
        }
    }

    /// The schema name without its role suffix.
    pub fn cleaned_name(self, name: &str) -> &str {
        name.strip_suffix(self.suffix()).unwrap_or(name)
    }
}

/// Settings shared by both walks.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Directory the `defaults/` and `zodSchemas/` folders are created in.
    pub out_dir: PathBuf,
    /// Overwrite existing default fixtures.
    pub force: bool,
    /// Only put `required` data properties in default fixtures.
    pub required_only: bool,
}

impl WalkOptions {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            force: false,
            required_only: true,
        }
    }
}

/// What a walk did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WalkReport {
    /// Files that were (re)written.
    pub written: Vec<PathBuf>,
    /// Files already holding the generated content.
    pub unchanged: usize,
    /// Files left out of date because they exist and overwriting was off.
    pub refused: Vec<PathBuf>,
    /// Schemas that were not generation targets or lacked what the walk
    /// needs.
    pub skipped: usize,
}

impl WalkReport {
    fn record(&mut self, path: &Path, outcome: AppendOutcome) {
        match outcome {
            AppendOutcome::Written(path) => self.written.push(path),
            AppendOutcome::Unchanged => self.unchanged += 1,
            AppendOutcome::Refused => self.refused.push(path.to_path_buf()),
        }
    }
}

/// Read and parse a (possibly multi-document) YAML file.
pub fn load_documents(path: &Path) -> Result<Vec<SchemaDocument>> {
    let text = fs::read_to_string(path).map_err(|source| GenError::MissingInputFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_documents(&text).map_err(|source| GenError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

fn named_schemas(documents: &[SchemaDocument]) -> impl Iterator<Item = &NamedSchema> {
    documents.iter().flat_map(|document| document.schemas.iter())
}

/// Default values for the `data` property of an input schema, or `None`
/// when it declares no data properties.
pub fn data_defaults(node: &SchemaNode, required_only: bool) -> Option<Map<String, Value>> {
    let data = node.property("data")?;
    let SchemaKind::Object {
        properties,
        required,
    } = &data.kind
    else {
        return None;
    };
    if properties.is_empty() {
        return None;
    }

    Some(
        properties
            .iter()
            .filter(|(key, _)| !required_only || required.contains(key))
            .filter_map(|(key, property)| type_to_value(property).map(|value| (key.clone(), value)))
            .collect(),
    )
}

/// Source of the default-value fixture module for input schema `name`.
pub fn defaults_fragment(name: &str, values: &Map<String, Value>) -> String {
    let json = json_pretty(&Value::Object(values.clone()), 4);
    format!(
        "\nimport {{{name}}} from \"../models/{name}\"\n\ntype INData = {name}['data'];\n\nexport const {name}Data_default: INData = {json}\n"
    )
}

/// Write `defaults/<X>Data_default.ts` for every input schema.
pub fn write_defaults(documents: &[SchemaDocument], options: &WalkOptions) -> WalkReport {
    let mut report = WalkReport::default();
    let dir = options.out_dir.join(DEFAULTS_DIR);

    for schema in named_schemas(documents) {
        if SchemaRole::classify(&schema.name) != Some(SchemaRole::Input) {
            report.skipped += 1;
            continue;
        }
        let Some(values) = data_defaults(&schema.node, options.required_only) else {
            debug!(schema = %schema.name, "No data properties; skipping defaults.");
            report.skipped += 1;
            continue;
        };

        let path = dir.join(format!("{}Data_default.ts", schema.name));
        let fragment = defaults_fragment(&schema.name, &values);
        report.record(&path, append_content(&path, &fragment, options.force));
    }

    info!(
        written = report.written.len(),
        unchanged = report.unchanged,
        refused = report.refused.len(),
        "Default fixtures done."
    );
    report
}

/// Source of the validation-schema module fragment for `name`.
pub fn zod_fragment(name: &str, role: SchemaRole, node: &SchemaNode) -> String {
    let schema = to_zod_schema(node);
    let label = role.suffix();

    let data_content = match role {
        SchemaRole::Input if schema.field("data").is_some() => format!(
            "/* IN data Schema */\nexport const {name}Data_schema = {name}_schema.shape.data"
        ),
        SchemaRole::Input => {
            error!(schema = %name, "Schema does not have a 'data' property in its shape.");
            String::new()
        }
        SchemaRole::Output => String::new(),
    };

    let result_content = match role {
        SchemaRole::Output if schema.field("result").is_some() => format!(
            "/* OUT result Schema*/\nexport const {name}Result_schema = {name}_schema.shape.result"
        ),
        SchemaRole::Output => {
            error!(schema = %name, "Schema does not have a 'result' property in its shape.");
            format!(
                "/* OUT result Schema - WARNING: 'result' property not found in schema shape */\n// export const {name}Result_schema = {name}_schema.shape.result // 'result' is not in the schema shape"
            )
        }
        SchemaRole::Input => String::new(),
    };

    let defaults_content = get_default_values(&schema)
        .map(|values| {
            format!(
                "/* {label} default values */\nexport const {name}_defaultValues = {}",
                json_pretty(&values, 2)
            )
        })
        .unwrap_or_default();

    format!(
        "\nimport {{ z }} from \"zod\";\n\n/* {label} Schema */\nexport const {name}_schema = {}\n\n{data_content}\n\n{result_content}\n\n{defaults_content}\n",
        schema.emit()
    )
}

/// Write `zodSchemas/<cleaned>_schema.ts` for every input and output
/// schema. Input and output schemas sharing a cleaned name share a file.
pub fn write_zod_schemas(documents: &[SchemaDocument], options: &WalkOptions) -> WalkReport {
    let mut report = WalkReport::default();
    let dir = options.out_dir.join(ZOD_SCHEMAS_DIR);

    for schema in named_schemas(documents) {
        let Some(role) = SchemaRole::classify(&schema.name) else {
            report.skipped += 1;
            continue;
        };
        debug!(schema = %schema.name, ?role, "Building validation schema.");

        let path = dir.join(format!("{}_schema.ts", role.cleaned_name(&schema.name)));
        let fragment = zod_fragment(&schema.name, role, &schema.node);
        report.record(&path, append_content(&path, &fragment, true));
    }

    info!(
        written = report.written.len(),
        unchanged = report.unchanged,
        "Validation schemas done."
    );
    report
}
