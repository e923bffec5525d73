//! Validation Engine
//!
//! Binds command parameters against the command registry.

pub mod engine;

pub use engine::{ValidationResult, bind_params, complete, complete_command, validate_document};
