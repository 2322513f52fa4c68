//! Core of `apigen`: turns OpenAPI `components.schemas` into default-value
//! fixtures, Zod validation schemas and React hooks.

pub mod config;
pub mod content;
pub mod error;
pub mod files;
pub mod hooks;
pub mod schema;
pub mod synth;
pub mod utils;
pub mod walker;
pub mod zod;

pub use config::Config;
pub use content::{AppendOutcome, append_content, make_content};
pub use error::{GenError, Result};
pub use files::{Formatter, make_file};
pub use schema::{SchemaDocument, SchemaKind, SchemaNode};
pub use synth::type_to_value;
pub use walker::{WalkOptions, WalkReport, load_documents, write_defaults, write_zod_schemas};
pub use zod::{get_default_values, to_zod_schema, to_zod_source};
