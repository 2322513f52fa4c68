//! Representative default values derived straight from a [`SchemaNode`].
//!
//! `None` means "no value": the field is left out of the enclosing object,
//! the same way an absent key is left out of a JSON document.

use serde_json::{Map, Value};

use crate::schema::{SchemaKind, SchemaNode};

/// Synthesize a representative value for `node`.
///
/// `anyOf` resolves to its first alternative. Objects only receive their
/// `required` properties. A node without any type information yields `None`.
pub fn type_to_value(node: &SchemaNode) -> Option<Value> {
    if let Some(first) = node.any_of.first() {
        return type_to_value(first);
    }

    let default = node.default.as_ref();
    match &node.kind {
        SchemaKind::String => {
            let chosen = match &node.enum_values {
                Some(values) => values.first(),
                None => default,
            };
            Some(truthy_or(chosen, || Value::String(String::new())))
        }
        SchemaKind::Array { items } => {
            let items_kind = items.as_deref().map(|items| &items.kind);
            if matches!(items_kind, Some(SchemaKind::Integer | SchemaKind::Number)) {
                return default.cloned();
            }
            let sample = items.as_deref().and_then(type_to_value);
            Some(Value::Array(vec![sample.unwrap_or(Value::Null)]))
        }
        SchemaKind::Boolean => Some(truthy_or(default, || Value::Bool(false))),
        SchemaKind::Integer | SchemaKind::Number => Some(truthy_or(default, || Value::from(0))),
        SchemaKind::Object {
            properties,
            required,
        } => {
            let mut out = Map::new();
            for name in required {
                let value = properties
                    .iter()
                    .find(|(key, _)| key == name)
                    .and_then(|(_, property)| type_to_value(property));
                if let Some(value) = value {
                    out.insert(name.clone(), value);
                }
            }
            Some(Value::Object(out))
        }
        SchemaKind::Null | SchemaKind::Other(_) | SchemaKind::Untyped => None,
    }
}

/// JavaScript truthiness of a JSON value.
///
/// `false`, `0`, `""` and `null` are falsy; arrays and objects are truthy
/// even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy_or(value: Option<&Value>, fallback: impl FnOnce() -> Value) -> Value {
    match value {
        Some(value) if is_truthy(value) => value.clone(),
        _ => fallback(),
    }
}
