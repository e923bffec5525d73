//! Resource manifests
//!
//! Resource declarations consumed by the downstream resource compiler, one
//! per line: `<KIND> <identifier> "<path>" <compression>`.

use std::collections::HashMap;
use std::fmt;

/// Kind of declared asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Image,
    Music,
}

impl ResourceKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ResourceKind::Image => "IMAGE",
            ResourceKind::Music => "XGM",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub kind: ResourceKind,
    pub identifier: String,
    pub path: String,
    pub compression: String,
}

impl fmt::Display for ResourceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} \"{}\" {}",
            self.kind.keyword(),
            self.identifier,
            self.path,
            self.compression
        )
    }
}

/// Identifier already bound to a different path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierClash {
    pub identifier: String,
    pub existing_path: String,
}

/// Ordered manifest with one entry per identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    entries: Vec<ResourceEntry>,
    by_identifier: HashMap<String, usize>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry. Re-registering the same path is a no-op.
    pub fn register(&mut self, entry: ResourceEntry) -> Result<(), IdentifierClash> {
        if let Some(&idx) = self.by_identifier.get(&entry.identifier) {
            let existing = &self.entries[idx];
            if existing.path == entry.path {
                return Ok(());
            }
            return Err(IdentifierClash {
                identifier: entry.identifier,
                existing_path: existing.path.clone(),
            });
        }

        self.by_identifier
            .insert(entry.identifier.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Newline-joined entries, in registration order
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
