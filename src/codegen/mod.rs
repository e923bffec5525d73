//! Code Generation
//!
//! Identifier derivation, resource manifests and the C emitter.

pub mod generator;
pub mod identifier;
pub mod manifest;

pub use generator::{
    Artifact, CodeGenerator, GFX_MANIFEST, GeneratorOptions, MUSIC_MANIFEST, SOURCE_FILE,
};
pub use manifest::{Manifest, ResourceEntry, ResourceKind};
