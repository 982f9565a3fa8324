//! Source location mapping for Cantus.
//!
//! This crate answers one question: given a byte offset into a source
//! buffer, at what line and column does that byte appear? It is the
//! location machinery behind `cantus-xml`, where parsed nodes carry only
//! byte offsets and line numbers are resolved on demand.
//!
//! # Overview
//!
//! The core types are:
//! - [`LineIndex`]: A table of start-of-line byte offsets, built by scanning
//!   a source buffer once; resolves offsets in O(log n)
//! - [`Location`]: A 1-indexed (line, column) pair, with `(0, 0)` reserved
//!   as the "unknown location" sentinel
//!
//! # Example
//!
//! ```rust
//! use cantus_source_map::LineIndex;
//!
//! let index = LineIndex::new(b"hello\nworld");
//! let loc = index.location(6);
//! assert_eq!(loc.line, 2);
//! assert_eq!(loc.column, 1);
//! ```

pub mod line_index;
pub mod types;

// Re-export main types
pub use line_index::LineIndex;
pub use types::Location;
