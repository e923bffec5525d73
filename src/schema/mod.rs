//! Command Schema
//!
//! The single table of commands: parameter shape for validation and the
//! generation rule for the code generator live in the same entry.

pub mod registry;
pub mod definition;

pub use registry::{BUILTIN_SCHEMA, CommandRegistry};
pub use definition::{CommandDef, GenerationRule, NamedDef, SchemaFile, SchemaMeta};
