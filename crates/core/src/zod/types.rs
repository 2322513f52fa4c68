//! In-memory Zod schema tree.
//!
//! The tree mirrors the object model of the Zod library closely enough that
//! code walking it can inspect wrappers structurally (inner type, default
//! producer, enum values) the same way it would inspect a live Zod schema.

use serde_json::Value;

/// A composed validation schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ZodSchema {
    /// `z.string()`
    String(Vec<Check>),
    /// `z.number()`, `z.number().int()` when `int` is set
    Number { int: bool, checks: Vec<Check> },
    /// `z.boolean()`
    Boolean,
    /// `z.null()`
    Null,
    /// `z.unknown()`
    Unknown,
    /// `z.literal(value)`
    Literal(Value),
    /// `z.enum([...])`
    Enum(Vec<String>),
    /// `z.array(element)`
    Array {
        element: Box<ZodSchema>,
        checks: Vec<Check>,
    },
    /// `z.object({...})`, fields in declaration order
    Object(Vec<(String, ZodSchema)>),
    /// `z.union([...])`
    Union(Vec<ZodSchema>),
    /// `inner.optional()`
    Optional(Box<ZodSchema>),
    /// `inner.nullable()`
    Nullable(Box<ZodSchema>),
    /// `inner.default(value)`
    Default { inner: Box<ZodSchema>, value: Value },
}

/// Refinements chained after a base schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    Min(f64),
    Max(f64),
    Regex(String),
}

/// The Zod class a schema node corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZodKind {
    String,
    Number,
    Boolean,
    Null,
    Unknown,
    Literal,
    Enum,
    Array,
    Object,
    Union,
    Optional,
    Nullable,
    Default,
}

impl ZodSchema {
    pub fn kind(&self) -> ZodKind {
        match self {
            ZodSchema::String(_) => ZodKind::String,
            ZodSchema::Number { .. } => ZodKind::Number,
            ZodSchema::Boolean => ZodKind::Boolean,
            ZodSchema::Null => ZodKind::Null,
            ZodSchema::Unknown => ZodKind::Unknown,
            ZodSchema::Literal(_) => ZodKind::Literal,
            ZodSchema::Enum(_) => ZodKind::Enum,
            ZodSchema::Array { .. } => ZodKind::Array,
            ZodSchema::Object(_) => ZodKind::Object,
            ZodSchema::Union(_) => ZodKind::Union,
            ZodSchema::Optional(_) => ZodKind::Optional,
            ZodSchema::Nullable(_) => ZodKind::Nullable,
            ZodSchema::Default { .. } => ZodKind::Default,
        }
    }

    /// Object fields, when this is an object schema.
    pub fn shape(&self) -> Option<&[(String, ZodSchema)]> {
        match self {
            ZodSchema::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Look up one object field by name.
    pub fn field(&self, name: &str) -> Option<&ZodSchema> {
        self.shape()?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, schema)| schema)
    }

    /// Produce the default value, for schemas that carry one.
    pub fn default_value(&self) -> Option<Value> {
        match self {
            ZodSchema::Default { value, .. } => Some(value.clone()),
            _ => None,
        }
    }

    /// The wrapped schema of an optional, nullable or default wrapper.
    pub fn inner_type(&self) -> Option<&ZodSchema> {
        match self {
            ZodSchema::Optional(inner) | ZodSchema::Nullable(inner) => Some(inner),
            ZodSchema::Default { inner, .. } => Some(inner),
            _ => None,
        }
    }

    /// Declared values of an enum schema.
    pub fn enum_values(&self) -> Option<&[String]> {
        match self {
            ZodSchema::Enum(values) => Some(values),
            _ => None,
        }
    }

    pub fn optional(self) -> Self {
        ZodSchema::Optional(Box::new(self))
    }

    pub fn nullable(self) -> Self {
        ZodSchema::Nullable(Box::new(self))
    }

    pub fn with_default(self, value: Value) -> Self {
        ZodSchema::Default {
            inner: Box::new(self),
            value,
        }
    }
}
