//! Zod validation schemas generated from JSON-Schema nodes.
//!
//! The pipeline is:
//! 1. Build: SchemaNode -> ZodSchema (`builder`)
//! 2. Emit: ZodSchema -> TypeScript source (via the `Emit` trait)
//! 3. Defaults: ZodSchema -> default value tree (`defaults`)
//!
//! Both the source string and the default values come from the same tree,
//! so the emitted schema and the emitted defaults always agree.

mod builder;
mod defaults;
mod emit;
mod types;

pub use builder::to_zod_schema;
pub use defaults::get_default_values;
pub use emit::Emit;
pub use types::{Check, ZodKind, ZodSchema};

use crate::schema::SchemaNode;

/// Emit the Zod source expression equivalent to `node`.
pub fn to_zod_source(node: &SchemaNode) -> String {
    to_zod_schema(node).emit()
}
