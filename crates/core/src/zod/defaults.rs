//! Default values recovered from a composed Zod schema.

use serde_json::{Map, Value};

use super::types::{ZodKind, ZodSchema};

/// Recover the default value tree of `schema`, or `None` when no node in the
/// subtree yields one.
///
/// Checks run in a fixed precedence and the order is load-bearing: the
/// generic inner-type probe comes before the optional and nullable checks,
/// so a wrapper that exposes its inner type resolves to the inner default
/// rather than `undefined`/`null`.
pub fn get_default_values(schema: &ZodSchema) -> Option<Value> {
    if let Some(shape) = schema.shape() {
        let fields: Map<String, Value> = shape
            .iter()
            .filter_map(|(name, field)| get_default_values(field).map(|value| (name.clone(), value)))
            .collect();
        return (!fields.is_empty()).then_some(Value::Object(fields));
    }
    if let Some(value) = schema.default_value() {
        return Some(value);
    }
    if let Some(inner) = schema.inner_type() {
        return get_default_values(inner);
    }
    match schema.kind() {
        ZodKind::Optional => None,
        ZodKind::Default => schema.default_value(),
        ZodKind::Nullable => Some(Value::Null),
        ZodKind::Array => Some(Value::Array(Vec::new())),
        ZodKind::Enum => schema
            .enum_values()
            .and_then(<[String]>::first)
            .map(|first| Value::String(first.clone())),
        _ => None,
    }
}
