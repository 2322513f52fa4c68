//! SchemaNode -> ZodSchema conversion.
//!
//! Wrappers are applied in a fixed order: base, then `.nullable()`, then
//! `.default(...)`, and finally `.optional()` for object properties that are
//! not listed in `required`.

use serde_json::Value;

use super::types::{Check, ZodSchema};
use crate::schema::{Constraints, SchemaKind, SchemaNode};

/// Build the Zod schema tree equivalent to `node`.
pub fn to_zod_schema(node: &SchemaNode) -> ZodSchema {
    let mut schema = if node.any_of.is_empty() {
        build_kind(node)
    } else {
        build_any_of(&node.any_of)
    };

    if node.nullable && !matches!(schema, ZodSchema::Nullable(_) | ZodSchema::Null) {
        schema = schema.nullable();
    }
    if let Some(default) = &node.default {
        schema = schema.with_default(default.clone());
    }
    schema
}

fn build_any_of(alternatives: &[SchemaNode]) -> ZodSchema {
    let has_null = alternatives.iter().any(SchemaNode::is_null);
    let mut members: Vec<ZodSchema> = alternatives
        .iter()
        .filter(|alt| !alt.is_null())
        .map(to_zod_schema)
        .collect();

    let inner = match members.len() {
        0 => return ZodSchema::Null,
        1 => members.remove(0),
        _ => ZodSchema::Union(members),
    };
    if has_null { inner.nullable() } else { inner }
}

fn build_kind(node: &SchemaNode) -> ZodSchema {
    let c = &node.constraints;
    match &node.kind {
        SchemaKind::String => match non_empty_enum(node) {
            Some(values) => build_enum(values),
            None => ZodSchema::String(string_checks(c)),
        },
        SchemaKind::Integer | SchemaKind::Number => match non_empty_enum(node) {
            Some(values) => build_enum(values),
            None => ZodSchema::Number {
                int: matches!(node.kind, SchemaKind::Integer),
                checks: range_checks(c.minimum, c.maximum),
            },
        },
        SchemaKind::Boolean => ZodSchema::Boolean,
        SchemaKind::Null => ZodSchema::Null,
        SchemaKind::Array { items } => ZodSchema::Array {
            element: Box::new(items.as_deref().map_or(ZodSchema::Unknown, to_zod_schema)),
            checks: range_checks(
                c.min_items.map(|n| n as f64),
                c.max_items.map(|n| n as f64),
            ),
        },
        SchemaKind::Object {
            properties,
            required,
        } => ZodSchema::Object(
            properties
                .iter()
                .map(|(name, property)| {
                    let schema = to_zod_schema(property);
                    let schema = if required.contains(name) {
                        schema
                    } else {
                        schema.optional()
                    };
                    (name.clone(), schema)
                })
                .collect(),
        ),
        SchemaKind::Other(_) | SchemaKind::Untyped => ZodSchema::Unknown,
    }
}

fn non_empty_enum(node: &SchemaNode) -> Option<&[Value]> {
    node.enum_values
        .as_deref()
        .filter(|values| !values.is_empty())
}

/// String enums become `z.enum`; anything else becomes a union of literals.
fn build_enum(values: &[Value]) -> ZodSchema {
    let strings: Option<Vec<String>> = values
        .iter()
        .map(|value| value.as_str().map(str::to_string))
        .collect();
    if let Some(strings) = strings {
        return ZodSchema::Enum(strings);
    }

    let mut literals: Vec<ZodSchema> = values.iter().cloned().map(ZodSchema::Literal).collect();
    if literals.len() == 1 {
        literals.remove(0)
    } else {
        ZodSchema::Union(literals)
    }
}

fn string_checks(c: &Constraints) -> Vec<Check> {
    let mut checks = range_checks(c.min_length.map(|n| n as f64), c.max_length.map(|n| n as f64));
    if let Some(pattern) = &c.pattern {
        checks.push(Check::Regex(pattern.clone()));
    }
    checks
}

fn range_checks(min: Option<f64>, max: Option<f64>) -> Vec<Check> {
    min.map(Check::Min)
        .into_iter()
        .chain(max.map(Check::Max))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(yaml: &str) -> ZodSchema {
        to_zod_schema(&SchemaNode::from_yaml(&serde_yaml::from_str(yaml).unwrap()))
    }

    #[test]
    fn test_required_and_optional_properties() {
        let schema = build(
            "type: object\nrequired: [a]\nproperties:\n  a: {type: string}\n  b: {type: integer}\n",
        );
        assert_eq!(schema.field("a"), Some(&ZodSchema::String(vec![])));
        assert_eq!(
            schema.field("b"),
            Some(&ZodSchema::Number {
                int: true,
                checks: vec![]
            }
            .optional())
        );
    }

    #[test]
    fn test_wrapper_order() {
        let schema = build(
            "type: object\nproperties:\n  s: {type: string, nullable: true, default: x}\n",
        );
        let expected = ZodSchema::String(vec![])
            .nullable()
            .with_default(json!("x"))
            .optional();
        assert_eq!(schema.field("s"), Some(&expected));
    }

    #[test]
    fn test_any_of_with_null_is_nullable() {
        assert_eq!(
            build("anyOf:\n  - {type: string}\n  - {type: 'null'}"),
            ZodSchema::String(vec![]).nullable()
        );
        assert_eq!(
            build("anyOf:\n  - {type: string}\n  - {type: boolean}"),
            ZodSchema::Union(vec![ZodSchema::String(vec![]), ZodSchema::Boolean])
        );
        assert_eq!(build("anyOf:\n  - {type: 'null'}"), ZodSchema::Null);
    }

    #[test]
    fn test_enums() {
        assert_eq!(
            build("type: string\nenum: [a, b]"),
            ZodSchema::Enum(vec!["a".into(), "b".into()])
        );
        assert_eq!(
            build("type: integer\nenum: [1, 2]"),
            ZodSchema::Union(vec![ZodSchema::Literal(json!(1)), ZodSchema::Literal(json!(2))])
        );
        assert_eq!(build("type: string\nenum: []"), ZodSchema::String(vec![]));
    }

    #[test]
    fn test_constraints_and_arrays() {
        assert_eq!(
            build("type: string\nminLength: 1\nmaxLength: 5\npattern: '^a'"),
            ZodSchema::String(vec![
                Check::Min(1.0),
                Check::Max(5.0),
                Check::Regex("^a".into())
            ])
        );
        assert_eq!(
            build("type: array\nminItems: 1"),
            ZodSchema::Array {
                element: Box::new(ZodSchema::Unknown),
                checks: vec![Check::Min(1.0)]
            }
        );
        assert_eq!(build("description: x"), ZodSchema::Unknown);
    }
}
