//! Source-tracked XML access for Cantus.
//!
//! This crate is the single place where the rest of the system touches XML.
//! It wraps a third-party pull parser behind a small facade: load a
//! document from a file, a string, or a byte buffer; walk the tree by
//! element name and child/sibling links; read attributes; and map any node
//! back to its line and column in the original source. No backend type
//! appears in the public interface, so the parsing library can be swapped
//! without touching consumers.
//!
//! # Overview
//!
//! The main types are:
//! - [`XmlParser`]: Owns the parsed document and dispatches the four
//!   ingestion modes (file, text, NUL-terminated buffer, byte range)
//! - [`XmlNode`]: A cheap, copyable, read-only handle to one node
//! - [`XmlAttribute`]: A read-only view of one attribute pair
//! - [`NodeKind`]: The enumerated node kinds of the tree
//!
//! # Example
//!
//! ```rust
//! use cantus_xml::XmlParser;
//!
//! let mut parser = XmlParser::new();
//! parser.parse_text("<score-partwise>\n  <part id=\"P1\"/>\n</score-partwise>");
//! assert!(parser.error().is_empty());
//!
//! let part = parser.root().child("part");
//! assert_eq!(part.attribute_value("id"), "P1");
//! ```
//!
//! # Source Location Tracking
//!
//! Every node records the byte offset at which it began. Line numbers are
//! resolved lazily: the first [`XmlParser::line_of`] call after a parse
//! builds a [`cantus_source_map::LineIndex`] over the source (re-reading
//! the file if the document came from disk) and later queries are O(log n)
//! lookups. Location queries are best-effort and report line 0 when no
//! location can be recovered; they never fail.
//!
//! ```rust
//! use cantus_xml::XmlParser;
//!
//! let mut parser = XmlParser::new();
//! parser.parse_text("<a>\n  <b/>\n</a>");
//! assert_eq!(parser.line_of(parser.root().child("b")), 2);
//! ```

pub mod document;
pub mod error;
pub mod node;
pub mod parser;
pub mod types;

// Re-export main types
pub use cantus_source_map::Location;
pub use document::Document;
pub use error::{Error, Result};
pub use node::{XmlAttribute, XmlNode};
pub use parser::XmlParser;
pub use types::NodeKind;
