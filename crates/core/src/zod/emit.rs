//! Zod source emission via the Emit trait.
//!
//! Object shapes are laid out one field per line with two-space
//! indentation and quoted keys; every other node is emitted inline.

use super::types::{Check, ZodSchema};
use crate::utils::js_string;

/// Trait for emitting TypeScript source from schema nodes.
pub trait Emit {
    /// Convert the node to its TypeScript string representation.
    fn emit(&self) -> String;
}

impl Emit for Check {
    fn emit(&self) -> String {
        match self {
            Check::Min(n) => format!(".min({n})"),
            Check::Max(n) => format!(".max({n})"),
            Check::Regex(pattern) => format!(".regex(new RegExp({}))", js_string(pattern)),
        }
    }
}

impl Emit for ZodSchema {
    fn emit(&self) -> String {
        emit_at(self, 0)
    }
}

fn emit_checks(checks: &[Check]) -> String {
    checks.iter().map(Emit::emit).collect()
}

fn emit_at(schema: &ZodSchema, depth: usize) -> String {
    match schema {
        ZodSchema::String(checks) => format!("z.string(){}", emit_checks(checks)),
        ZodSchema::Number { int, checks } => format!(
            "z.number(){}{}",
            if *int { ".int()" } else { "" },
            emit_checks(checks)
        ),
        ZodSchema::Boolean => "z.boolean()".to_string(),
        ZodSchema::Null => "z.null()".to_string(),
        ZodSchema::Unknown => "z.unknown()".to_string(),
        ZodSchema::Literal(value) => format!("z.literal({value})"),
        ZodSchema::Enum(values) => {
            let values: Vec<String> = values
                .iter()
                .map(|v| js_string(v.as_str()))
                .collect();
            format!("z.enum([{}])", values.join(", "))
        }
        ZodSchema::Array { element, checks } => {
            format!("z.array({}){}", emit_at(element, depth), emit_checks(checks))
        }
        ZodSchema::Object(fields) => {
            if fields.is_empty() {
                return "z.object({})".to_string();
            }
            let pad = "  ".repeat(depth + 1);
            let lines: Vec<String> = fields
                .iter()
                .map(|(name, field)| {
                    format!("{pad}{}: {},", js_string(name), emit_at(field, depth + 1))
                })
                .collect();
            format!("z.object({{\n{}\n{}}})", lines.join("\n"), "  ".repeat(depth))
        }
        ZodSchema::Union(members) => {
            let members: Vec<String> = members.iter().map(|m| emit_at(m, depth)).collect();
            format!("z.union([{}])", members.join(", "))
        }
        ZodSchema::Optional(inner) => format!("{}.optional()", emit_at(inner, depth)),
        ZodSchema::Nullable(inner) => format!("{}.nullable()", emit_at(inner, depth)),
        ZodSchema::Default { inner, value } => {
            format!("{}.default({value})", emit_at(inner, depth))
        }
    }
}
