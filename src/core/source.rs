//! Source Providers
//!
//! The only way the pipeline obtains script text: given a unit name,
//! return its text or fail. Missing units abort the compile of that unit.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failure to obtain the text of a source unit
#[derive(Debug)]
pub enum SourceError {
    NotFound { name: String },
    Io { name: String, source: io::Error },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NotFound { name } => write!(f, "Source unit not found: \"{}\"", name),
            SourceError::Io { name, source } => {
                write!(f, "Failed to read source unit \"{}\": {}", name, source)
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::NotFound { .. } => None,
            SourceError::Io { source, .. } => Some(source),
        }
    }
}

/// Resolves source-unit names to script text
pub trait SourceProvider {
    fn read_source(&self, name: &str) -> Result<String, SourceError>;
}

/// In-memory provider, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    units: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, name: &str, text: &str) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: &str, text: &str) {
        self.units.insert(name.to_string(), text.to_string());
    }
}

impl SourceProvider for MemorySource {
    fn read_source(&self, name: &str) -> Result<String, SourceError> {
        self.units
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                name: name.to_string(),
            })
    }
}

/// Reads `<root>/<name>.<extension>` from disk
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extension: String,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        if self.extension.is_empty() {
            self.root.join(name)
        } else {
            self.root.join(format!("{}.{}", name, self.extension))
        }
    }
}

impl SourceProvider for DirectorySource {
    fn read_source(&self, name: &str) -> Result<String, SourceError> {
        let path = self.path_for(name);
        log::debug!("Reading source unit \"{}\" from {:?}", name, path);
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound {
                name: name.to_string(),
            },
            _ => SourceError::Io {
                name: name.to_string(),
                source: e,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_lookup() {
        let source = MemorySource::new().with_unit("startup", "Hello");
        assert_eq!(source.read_source("startup").unwrap(), "Hello");
        assert!(matches!(
            source.read_source("missing"),
            Err(SourceError::NotFound { name }) if name == "missing"
        ));
    }

    #[test]
    fn test_directory_source_path() {
        let source = DirectorySource::new("/tmp/story", ".txt");
        assert_eq!(source.path_for("intro"), PathBuf::from("/tmp/story/intro.txt"));

        let bare = DirectorySource::new("/tmp/story", "");
        assert_eq!(bare.path_for("intro"), PathBuf::from("/tmp/story/intro"));
    }

    #[test]
    fn test_not_found_display() {
        let err = SourceError::NotFound {
            name: "chapter2".to_string(),
        };
        assert_eq!(err.to_string(), "Source unit not found: \"chapter2\"");
    }
}
