//! Visual Novel Scene Compiler
//!
//! Compiles line-oriented scene scripts into C source and resource
//! manifests for the VN engine runtime.
//!
//! This library provides:
//! - Line scanning and parameter-expression parsing
//! - A TOML-defined command table
//! - Parameter binding and validation with accumulated diagnostics
//! - C code and resource-manifest generation

pub mod codegen;
pub mod compiler;
pub mod config;
pub mod core;
pub mod driver;
pub mod parser;
pub mod schema;
pub mod validation;

// Re-exports for the public API
pub use codegen::{Artifact, GeneratorOptions};
pub use compiler::{CompileError, Compiler, UnitDiagnostics};
pub use config::Config;
pub use crate::core::{Diagnostic, Diagnostics, MemorySource, SourceError, SourceProvider};
pub use parser::{Node, scan};
pub use schema::CommandRegistry;
pub use validation::{ValidationResult, validate_document};
