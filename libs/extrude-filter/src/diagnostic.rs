//! # Diagnostics
//!
//! Non-fatal problems found while filtering. Every diagnostic is a warning
//! built from a [`FilterError`]: it is kept on the output group and
//! mirrored to `tracing` as it is recorded.

use crate::error::FilterError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A warning recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What happened
    pub message: String,
}

impl From<&FilterError> for Diagnostic {
    fn from(error: &FilterError) -> Self {
        Self {
            message: error.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning: {}", self.message)
    }
}

/// Ordered collection of diagnostics for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a recovered failure as a warning and logs it.
    pub fn warn(&mut self, error: FilterError) {
        tracing::warn!("{error}");
        self.items.push(Diagnostic::from(&error));
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the diagnostics in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Consumes the collection.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let d = Diagnostic::from(&FilterError::library_not_found("facades"));
        assert_eq!(
            d.to_string(),
            "warning: Unable to load resource library 'facades'"
        );
    }

    #[test]
    fn test_collection_keeps_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn(FilterError::library_not_found("first"));
        diagnostics.warn(FilterError::missing_extrusion("second"));

        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "Unable to load resource library 'first'",
                "Missing required extrusion symbology in style 'second'"
            ]
        );
        assert_eq!(diagnostics.len(), 2);
    }
}
