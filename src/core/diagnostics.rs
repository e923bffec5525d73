//! Diagnostics
//!
//! Line-scoped compile errors and the accumulator every pipeline stage
//! writes into. Nothing is ever removed once pushed.

use serde::Serialize;
use std::fmt;

/// Line number of diagnostics about a source unit as a whole
pub const UNIT_LINE: usize = 0;

/// A single compile error attached to a 1-based source line, or to
/// [`UNIT_LINE`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Ordered, append-only collection of diagnostics for one compile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: usize, message: impl Into<String>) {
        self.items.push(Diagnostic {
            line,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// True if any diagnostic message contains `needle`
    pub fn contains_message(&self, needle: &str) -> bool {
        self.items.iter().any(|d| d.message.contains(needle))
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_in_order() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.push(3, "first");
        diagnostics.push(1, "second".to_string());

        let items = diagnostics.into_vec();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].line, 3);
        assert_eq!(items[1].message, "second");
    }

    #[test]
    fn test_search() {
        let mut a = Diagnostics::new();
        a.push(1, "Unknown command: \"bogus\"");
        a.push(2, "Wait duration was not informed.");

        assert_eq!(a.len(), 2);
        assert!(a.contains_message("bogus"));
        assert!(a.contains_message("Wait duration"));
        assert!(!a.contains_message("Music"));
    }

    #[test]
    fn test_display() {
        let d = Diagnostic {
            line: 7,
            message: "Image filename was not informed.".to_string(),
        };
        assert_eq!(d.to_string(), "line 7: Image filename was not informed.");
    }
}
