//! Core types for source mapping

use serde::{Deserialize, Serialize};

/// A line/column position in source text (1-indexed)
///
/// Both fields count from 1; columns are byte positions within the line,
/// not character positions. The pair `(0, 0)` is the sentinel for "no
/// location available" and is what consumers receive when a node has no
/// recorded offset or the source text cannot be recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in bytes)
    pub column: usize,
}

impl Location {
    /// The "unknown location" sentinel.
    pub const UNKNOWN: Location = Location { line: 0, column: 0 };

    /// Create a new location.
    pub fn new(line: usize, column: usize) -> Self {
        Location { line, column }
    }

    /// Whether this is the unknown-location sentinel.
    pub fn is_unknown(&self) -> bool {
        *self == Location::UNKNOWN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sentinel() {
        assert!(Location::UNKNOWN.is_unknown());
        assert!(!Location::new(1, 1).is_unknown());
    }

    #[test]
    fn test_location_ordering() {
        let loc1 = Location::new(1, 1);
        let loc2 = Location::new(1, 5);
        let loc3 = Location::new(2, 1);

        assert!(loc1 < loc2);
        assert!(loc2 < loc3);
        assert!(loc1 < loc3);
    }

    #[test]
    fn test_serialization_location() {
        let loc = Location::new(5, 10);
        let json = serde_json::to_string(&loc).unwrap();
        let deserialized: Location = serde_json::from_str(&json).unwrap();
        assert_eq!(loc, deserialized);
    }
}
