//! The XML parser facade.
//!
//! [`XmlParser`] owns one parsed document at a time, together with whatever
//! is needed to answer "where in the source is this node?": the retained
//! source bytes (or the path they came from), and a lazily built
//! [`LineIndex`]. The same parser can be reused across documents; every
//! `parse_*` call resets all state from the previous one.

use std::cell::OnceCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cantus_source_map::{LineIndex, Location};
use tracing::{debug, warn};

use crate::document::{self, Document, NodeId, ParseOutcome};
use crate::error::{Error, Result};
use crate::node::XmlNode;

/// Owner of a parsed XML document and its source location state.
///
/// Parse failures never propagate: each `parse_*` operation records the
/// outcome in the parser, and consumers inspect it through [`error`]
/// (empty on success), [`error_offset`], and [`root`] (the null handle
/// after a failure).
///
/// A parser instance is single-threaded: no `parse_*` call may race with
/// any other operation on the same instance. Distinct instances are
/// independent.
///
/// # Example
///
/// ```rust
/// use cantus_xml::XmlParser;
///
/// let mut parser = XmlParser::new();
/// parser.parse_text("<score-partwise>\n  <part/>\n</score-partwise>");
///
/// let root = parser.root();
/// assert_eq!(root.name(), "score-partwise");
/// assert_eq!(parser.line_of(root.first_child()), 2);
/// ```
///
/// [`error`]: Self::error
/// [`error_offset`]: Self::error_offset
/// [`root`]: Self::root
pub struct XmlParser {
    document: Document,
    root_id: NodeId,
    /// Declared or detected encoding, lowercased; empty while unknown.
    encoding: String,
    /// Empty on success; one human-readable sentence otherwise.
    error_msg: String,
    /// Byte offset of the failure; -1 when none applies.
    error_offset: i64,
    /// Retained source bytes for in-memory ingestion modes.
    source: Option<Vec<u8>>,
    /// Path of the source for file ingestion; the file is re-read on the
    /// first location query rather than retained.
    source_path: Option<PathBuf>,
    /// Start-of-line table, built on first location query per parse.
    line_index: OnceCell<LineIndex>,
    /// Sink for one-line parse diagnostics.
    reporter: Box<dyn Write>,
}

impl XmlParser {
    /// Create a parser reporting diagnostics to standard output.
    pub fn new() -> Self {
        Self::with_reporter(Box::new(io::stdout()))
    }

    /// Create a parser reporting diagnostics to the given sink.
    pub fn with_reporter(reporter: Box<dyn Write>) -> Self {
        XmlParser {
            document: Document::empty(),
            root_id: NodeId::NULL,
            encoding: String::new(),
            error_msg: String::new(),
            error_offset: -1,
            source: None,
            source_path: None,
            line_index: OnceCell::new(),
            reporter,
        }
    }

    /// Parse the file at `path`.
    ///
    /// The file content is not retained; a later location query re-reads it
    /// once to build the line table. On failure, and when `report_errors`
    /// holds, one diagnostic line is written to the reporter.
    pub fn parse_file(&mut self, path: impl AsRef<Path>, report_errors: bool) {
        let path = path.as_ref();
        self.reset();
        self.source_path = Some(path.to_path_buf());

        debug!(path = %path.display(), "parsing XML file");
        match fs::read(path) {
            Ok(bytes) => self.apply(document::parse_bytes(&bytes)),
            Err(err) => self.record_error(&Error::FileRead {
                path: path.to_path_buf(),
                source: err,
            }),
        }

        if report_errors && !self.error_msg.is_empty() {
            let _ = writeln!(
                self.reporter,
                "{}. Error: {}. Offset: {}",
                path.display(),
                self.error_msg,
                self.error_offset
            );
        }
    }

    /// Parse an in-memory string. A copy of the text is retained until the
    /// next parse so location queries can resolve against it.
    pub fn parse_text(&mut self, text: &str) {
        self.reset();
        let bytes = text.as_bytes().to_vec();
        self.apply(document::parse_bytes(&bytes));
        self.source = Some(bytes);
    }

    /// Parse a NUL-terminated byte buffer in place.
    ///
    /// The caller relinquishes the buffer for the duration of the parse,
    /// hence the mutable borrow. The bytes up to the terminator (or the end
    /// of the buffer, whichever comes first) are snapshotted before parsing
    /// so location queries resolve against the original source.
    pub fn parse_cstring(&mut self, buffer: &mut [u8]) {
        self.reset();
        let end = memchr::memchr(0, buffer).unwrap_or(buffer.len());
        let bytes = buffer[..end].to_vec();
        self.apply(document::parse_bytes(&bytes));
        self.source = Some(bytes);
    }

    /// Parse a raw byte range. A copy is retained until the next parse.
    pub fn parse_buffer(&mut self, bytes: &[u8]) {
        self.reset();
        let bytes = bytes.to_vec();
        self.apply(document::parse_bytes(&bytes));
        self.source = Some(bytes);
    }

    /// The last parse error, or an empty string after a successful parse.
    pub fn error(&self) -> &str {
        &self.error_msg
    }

    /// Byte offset of the last parse error; -1 when none applies.
    pub fn error_offset(&self) -> i64 {
        self.error_offset
    }

    /// Encoding of the last parsed document, lowercased (from the XML
    /// declaration when present, `utf-8` otherwise); empty before the
    /// first successful parse.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Handle to the document's root element; the null handle while no
    /// document is loaded or the last parse failed.
    pub fn root(&self) -> XmlNode<'_> {
        XmlNode::new(&self.document, self.root_id)
    }

    /// Line number (1-indexed) at which `node` begins in the source, or 0
    /// when no location is available.
    pub fn line_of(&self, node: XmlNode<'_>) -> usize {
        self.location_of(node).line
    }

    /// Line and column (1-indexed) at which `node` begins in the source,
    /// or [`Location::UNKNOWN`] when no location is available.
    ///
    /// The first call per parse builds the line table, reading the source
    /// file back in if the parse came from a path. Lookup failures degrade
    /// to the unknown sentinel; they are never surfaced as errors.
    pub fn location_of(&self, node: XmlNode<'_>) -> Location {
        if node.is_null() || node.offset() < 0 {
            return Location::UNKNOWN;
        }
        match self.line_index() {
            Some(index) => index.location(node.offset() as usize),
            None => Location::UNKNOWN,
        }
    }

    fn line_index(&self) -> Option<&LineIndex> {
        if self.line_index.get().is_none() {
            let index = match (&self.source, &self.source_path) {
                (Some(bytes), _) => LineIndex::new(bytes),
                (None, Some(path)) => match fs::read(path) {
                    Ok(bytes) => LineIndex::new(&bytes),
                    Err(err) => {
                        warn!(path = %path.display(), error = %err,
                              "cannot re-read source for location lookup");
                        return None;
                    }
                },
                (None, None) => return None,
            };
            let _ = self.line_index.set(index);
        }
        self.line_index.get()
    }

    fn reset(&mut self) {
        self.document = Document::empty();
        self.root_id = NodeId::NULL;
        self.encoding.clear();
        self.error_msg.clear();
        self.error_offset = -1;
        self.source = None;
        self.source_path = None;
        self.line_index.take();
    }

    fn apply(&mut self, result: Result<ParseOutcome>) {
        match result {
            Ok(outcome) => {
                self.document = outcome.document;
                match self.document.find_root_element() {
                    Some(root_id) => {
                        self.root_id = root_id;
                        self.encoding = outcome
                            .declared_encoding
                            .unwrap_or_else(|| "utf-8".to_string());
                        debug!(encoding = %self.encoding, "XML document parsed");
                    }
                    None => {
                        let err = Error::NoRootElement;
                        self.record_error(&err);
                    }
                }
            }
            Err(err) => {
                self.document = Document::empty();
                self.record_error(&err);
            }
        }
    }

    fn record_error(&mut self, err: &Error) {
        self.error_msg = err.to_string();
        self.error_offset = err.offset();
        debug!(error = %self.error_msg, offset = self.error_offset, "XML parse failed");
    }
}

impl Default for XmlParser {
    fn default() -> Self {
        XmlParser::new()
    }
}
