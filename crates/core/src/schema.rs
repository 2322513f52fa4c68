//! JSON-Schema nodes as they appear under `components.schemas`.
//!
//! Schema fragments arrive as untyped YAML. They are lifted into a
//! [`SchemaNode`] whose [`SchemaKind`] is keyed by the `type` keyword, so the
//! synthesizer and the validation-schema builder can match exhaustively
//! instead of probing string paths. Lifting never fails: anything that does
//! not look like a schema becomes [`SchemaKind::Untyped`].

use serde::Deserialize;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use tracing::{debug, warn};

/// A single JSON-Schema fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    /// `anyOf` alternatives, in declaration order.
    pub any_of: Vec<SchemaNode>,
    /// `enum` values, in declaration order. `None` when the keyword is absent.
    pub enum_values: Option<Vec<JsonValue>>,
    /// Literal `default`.
    pub default: Option<JsonValue>,
    /// OpenAPI 3.0 `nullable: true`, or `null` inside a 3.1 type array.
    pub nullable: bool,
    pub constraints: Constraints,
}

/// The `type` keyword, with the payload each type carries.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    String,
    Integer,
    Number,
    Boolean,
    Null,
    Array {
        items: Option<Box<SchemaNode>>,
    },
    Object {
        /// Properties in declaration order.
        properties: Vec<(String, SchemaNode)>,
        required: Vec<String>,
    },
    /// A `type` value outside the JSON-Schema vocabulary.
    Other(String),
    /// No `type` keyword at all.
    Untyped,
}

/// Validation keywords carried through to the generated schemas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

impl SchemaNode {
    /// A node with no type information.
    pub fn untyped() -> Self {
        Self::of_kind(SchemaKind::Untyped)
    }

    pub fn of_kind(kind: SchemaKind) -> Self {
        Self {
            kind,
            any_of: Vec::new(),
            enum_values: None,
            default: None,
            nullable: false,
            constraints: Constraints::default(),
        }
    }

    /// Lift an untyped YAML fragment into a schema node.
    pub fn from_yaml(value: &YamlValue) -> Self {
        let YamlValue::Mapping(_) = value else {
            return Self::untyped();
        };

        let (kind_name, nullable_from_type) = read_type(value.get("type"));
        let kind = match kind_name.as_deref() {
            None => SchemaKind::Untyped,
            Some("string") => SchemaKind::String,
            Some("integer") => SchemaKind::Integer,
            Some("number") => SchemaKind::Number,
            Some("boolean") => SchemaKind::Boolean,
            Some("null") => SchemaKind::Null,
            Some("array") => SchemaKind::Array {
                items: value
                    .get("items")
                    .map(|items| Box::new(Self::from_yaml(items))),
            },
            Some("object") => SchemaKind::Object {
                properties: read_properties(value.get("properties")),
                required: read_string_list(value.get("required")),
            },
            Some(other) => SchemaKind::Other(other.to_string()),
        };

        let any_of = match value.get("anyOf") {
            Some(YamlValue::Sequence(alternatives)) => {
                alternatives.iter().map(Self::from_yaml).collect()
            }
            _ => Vec::new(),
        };

        let enum_values = match value.get("enum") {
            Some(YamlValue::Sequence(values)) => Some(values.iter().map(yaml_to_json).collect()),
            _ => None,
        };

        let nullable = nullable_from_type
            || value
                .get("nullable")
                .and_then(YamlValue::as_bool)
                .unwrap_or(false);

        Self {
            kind,
            any_of,
            enum_values,
            default: value.get("default").map(yaml_to_json),
            nullable,
            constraints: Constraints {
                min_length: value.get("minLength").and_then(YamlValue::as_u64),
                max_length: value.get("maxLength").and_then(YamlValue::as_u64),
                pattern: value
                    .get("pattern")
                    .and_then(YamlValue::as_str)
                    .map(str::to_string),
                minimum: value.get("minimum").and_then(YamlValue::as_f64),
                maximum: value.get("maximum").and_then(YamlValue::as_f64),
                min_items: value.get("minItems").and_then(YamlValue::as_u64),
                max_items: value.get("maxItems").and_then(YamlValue::as_u64),
            },
        }
    }

    /// Look up a declared property of an object node.
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        match &self.kind {
            SchemaKind::Object { properties, .. } => properties
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, node)| node),
            _ => None,
        }
    }

    /// Check if this node is the `{type: null}` alternative of an `anyOf`.
    pub fn is_null(&self) -> bool {
        matches!(self.kind, SchemaKind::Null) && self.any_of.is_empty()
    }
}

/// Read `type`, which is either a single name or (OpenAPI 3.1) a list of
/// names. For a list the first non-null name wins and a `null` entry marks
/// the node nullable.
fn read_type(value: Option<&YamlValue>) -> (Option<String>, bool) {
    match value {
        Some(YamlValue::String(name)) => (Some(name.clone()), false),
        Some(YamlValue::Sequence(names)) => {
            let names: Vec<&str> = names.iter().filter_map(YamlValue::as_str).collect();
            let nullable = names.contains(&"null");
            let first = names
                .iter()
                .find(|name| **name != "null")
                .or_else(|| names.first())
                .map(|name| (*name).to_string());
            (first, nullable)
        }
        _ => (None, false),
    }
}

fn read_properties(value: Option<&YamlValue>) -> Vec<(String, SchemaNode)> {
    let Some(YamlValue::Mapping(map)) = value else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(key, node)| key_to_string(key).map(|key| (key, SchemaNode::from_yaml(node))))
        .collect()
}

fn read_string_list(value: Option<&YamlValue>) -> Vec<String> {
    match value {
        Some(YamlValue::Sequence(items)) => items
            .iter()
            .filter_map(YamlValue::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn key_to_string(key: &YamlValue) -> Option<String> {
    match key {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Convert a YAML value to JSON, stringifying scalar mapping keys and
/// dropping tags.
pub fn yaml_to_json(value: &YamlValue) -> JsonValue {
    match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(JsonValue::Null, JsonValue::Number)
            }
        }
        YamlValue::String(s) => JsonValue::String(s.clone()),
        YamlValue::Sequence(items) => JsonValue::Array(items.iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(map) => JsonValue::Object(
            map.iter()
                .filter_map(|(key, value)| key_to_string(key).map(|key| (key, yaml_to_json(value))))
                .collect(),
        ),
        YamlValue::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

/// One named entry of `components.schemas`.
#[derive(Debug, Clone)]
pub struct NamedSchema {
    pub name: String,
    pub node: SchemaNode,
}

/// The `components.schemas` map of one YAML document.
#[derive(Debug, Clone, Default)]
pub struct SchemaDocument {
    pub schemas: Vec<NamedSchema>,
}

impl SchemaDocument {
    fn from_root(root: &YamlValue, index: usize) -> Self {
        let schemas = root
            .get("components")
            .and_then(|components| components.get("schemas"));
        let Some(YamlValue::Mapping(map)) = schemas else {
            warn!(document = index, "Document has no components.schemas; skipping.");
            return Self::default();
        };

        let schemas: Vec<NamedSchema> = map
            .iter()
            .filter_map(|(name, node)| {
                key_to_string(name).map(|name| NamedSchema {
                    name,
                    node: SchemaNode::from_yaml(node),
                })
            })
            .collect();
        debug!(document = index, count = schemas.len(), "Loaded schemas.");
        Self { schemas }
    }
}

/// Parse every document of a YAML stream and collect its schemas.
pub fn parse_documents(text: &str) -> Result<Vec<SchemaDocument>, serde_yaml::Error> {
    let mut documents = Vec::new();
    for (index, document) in serde_yaml::Deserializer::from_str(text).enumerate() {
        let root = YamlValue::deserialize(document)?;
        if root.is_null() {
            continue;
        }
        documents.push(SchemaDocument::from_root(&root, index));
    }
    Ok(documents)
}
