//! Core Types
//!
//! Error accumulation and the source-provider boundary.

pub mod diagnostics;
pub mod source;

pub use diagnostics::{Diagnostic, Diagnostics, UNIT_LINE};
pub use source::{DirectorySource, MemorySource, SourceError, SourceProvider};
