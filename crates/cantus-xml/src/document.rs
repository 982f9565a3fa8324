//! Arena document tree built from backend parse events.
//!
//! The backend is a pull parser, so the facade assembles its own tree: a
//! flat arena of [`NodeData`] linked by first-child / next-sibling indices,
//! with each node carrying the byte offset at which it began in the source.
//! Handles in [`crate::node`] are indices into this arena.

use crate::error::{Error, Result};
use crate::types::NodeKind;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Index of a node in the document arena.
///
/// Index 0 is always the null sentinel node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    /// The null sentinel node.
    pub(crate) const NULL: NodeId = NodeId(0);

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// One attribute pair on an element.
#[derive(Debug, Clone)]
pub(crate) struct AttributeData {
    pub name: String,
    pub value: String,
}

/// Stored state of one node.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub kind: NodeKind,
    /// Element tag name or processing-instruction target; empty otherwise.
    pub name: String,
    /// Raw text for text-bearing kinds; empty otherwise.
    pub value: String,
    /// Byte offset of the node's first byte in the source; -1 if unknown.
    pub offset: i64,
    pub first_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub attributes: Vec<AttributeData>,
}

impl NodeData {
    fn new(kind: NodeKind, offset: i64) -> Self {
        NodeData {
            kind,
            name: String::new(),
            value: String::new(),
            offset,
            first_child: None,
            next_sibling: None,
            attributes: Vec::new(),
        }
    }

    fn null() -> Self {
        NodeData::new(NodeKind::Null, -1)
    }
}

/// A parsed XML document owning its node arena.
///
/// Every document holds the null sentinel at index 0. A freshly constructed
/// (or failed) document holds nothing else, so handles into it resolve to
/// the sentinel and traversal yields nothing.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    /// A document with no content, only the null sentinel.
    pub(crate) fn empty() -> Self {
        Document {
            nodes: vec![NodeData::null()],
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    /// The absolute root of the tree (kind `Document`), if parsed.
    pub(crate) fn document_node(&self) -> Option<NodeId> {
        (self.nodes.len() > 1).then_some(NodeId(1))
    }

    /// First `Element` child of the document node. Leading comments,
    /// processing instructions, declarations, and doctypes are skipped.
    pub(crate) fn find_root_element(&self) -> Option<NodeId> {
        let mut next = self.node(self.document_node()?).first_child;
        while let Some(id) = next {
            if self.node(id).kind == NodeKind::Element {
                return Some(id);
            }
            next = self.node(id).next_sibling;
        }
        None
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }
}

/// Result of a successful backend parse.
#[derive(Debug)]
pub(crate) struct ParseOutcome {
    pub document: Document,
    /// Encoding token from the XML declaration, lowercased, if declared.
    pub declared_encoding: Option<String>,
}

/// An element still being populated, with its last appended child so
/// sibling links can be wired in document order.
struct Frame {
    node: NodeId,
    last_child: Option<NodeId>,
}

/// Parse a byte buffer into a document tree.
///
/// Whitespace-only character data between elements is not stored; the
/// backend's default mode drops it and callers navigating by `first_child`
/// rely on that.
pub(crate) fn parse_bytes(source: &[u8]) -> Result<ParseOutcome> {
    TreeBuilder::new(source).build()
}

struct TreeBuilder<'a> {
    reader: Reader<&'a [u8]>,
    document: Document,
    stack: Vec<Frame>,
    declared_encoding: Option<String>,
    root_seen: bool,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a [u8]) -> Self {
        let reader = Reader::from_reader(source);

        let mut document = Document::empty();
        let document_id = document.push(NodeData::new(NodeKind::Document, 0));

        TreeBuilder {
            reader,
            document,
            stack: vec![Frame {
                node: document_id,
                last_child: None,
            }],
            declared_encoding: None,
            root_seen: false,
        }
    }

    fn build(mut self) -> Result<ParseOutcome> {
        loop {
            // Position before the event is the offset of its first byte
            let event_start = self.reader.buffer_position();

            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    let id = self.append_element(&e, event_start)?;
                    self.stack.push(Frame {
                        node: id,
                        last_child: None,
                    });
                }
                Ok(Event::Empty(e)) => {
                    self.append_element(&e, event_start)?;
                }
                Ok(Event::End(e)) => {
                    if self.stack.len() == 1 {
                        return Err(Error::Syntax {
                            message: format!(
                                "unexpected closing tag </{}>",
                                String::from_utf8_lossy(e.name().as_ref())
                            ),
                            offset: event_start,
                        });
                    }
                    self.stack.pop();
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|err| Error::Syntax {
                        message: format!("invalid character data: {}", err),
                        offset: event_start,
                    })?;
                    // The backend's default mode drops inter-element whitespace
                    if !text.trim().is_empty() {
                        let mut data = NodeData::new(NodeKind::PcData, event_start as i64);
                        data.value = text.into_owned();
                        self.append(data);
                    }
                }
                Ok(Event::CData(e)) => {
                    let mut data = NodeData::new(NodeKind::CData, event_start as i64);
                    data.value = String::from_utf8_lossy(e.as_ref()).into_owned();
                    self.append(data);
                }
                Ok(Event::Comment(e)) => {
                    let mut data = NodeData::new(NodeKind::Comment, event_start as i64);
                    data.value = String::from_utf8_lossy(e.as_ref()).into_owned();
                    self.append(data);
                }
                Ok(Event::PI(e)) => {
                    let content = String::from_utf8_lossy(e.as_ref()).into_owned();
                    let (target, rest) = content
                        .split_once(char::is_whitespace)
                        .unwrap_or((content.as_str(), ""));

                    let mut data =
                        NodeData::new(NodeKind::ProcessingInstruction, event_start as i64);
                    data.name = target.to_string();
                    data.value = rest.trim_start().to_string();
                    self.append(data);
                }
                Ok(Event::Decl(e)) => {
                    let mut data = NodeData::new(NodeKind::Declaration, event_start as i64);
                    data.name = "xml".to_string();

                    if let Ok(version) = e.version() {
                        data.attributes.push(AttributeData {
                            name: "version".to_string(),
                            value: String::from_utf8_lossy(&version).into_owned(),
                        });
                    }
                    if let Some(Ok(encoding)) = e.encoding() {
                        let encoding = String::from_utf8_lossy(&encoding).to_lowercase();
                        data.attributes.push(AttributeData {
                            name: "encoding".to_string(),
                            value: encoding.clone(),
                        });
                        self.declared_encoding = Some(encoding);
                    }
                    if let Some(Ok(standalone)) = e.standalone() {
                        data.attributes.push(AttributeData {
                            name: "standalone".to_string(),
                            value: String::from_utf8_lossy(&standalone).into_owned(),
                        });
                    }

                    self.append(data);
                }
                Ok(Event::DocType(e)) => {
                    let mut data = NodeData::new(NodeKind::Doctype, event_start as i64);
                    data.value = String::from_utf8_lossy(e.as_ref()).into_owned();
                    self.append(data);
                }
                Ok(Event::Eof) => {
                    if self.stack.len() > 1 {
                        // Name of the innermost open element
                        let open = self.stack.last().map_or(NodeId::NULL, |f| f.node);
                        return Err(Error::UnexpectedEof {
                            expected: self.document.node(open).name.clone(),
                            offset: event_start,
                        });
                    }
                    break;
                }
                Err(err) => {
                    return Err(Error::Syntax {
                        message: err.to_string(),
                        offset: self.reader.error_position(),
                    });
                }
            }
        }

        Ok(ParseOutcome {
            document: self.document,
            declared_encoding: self.declared_encoding,
        })
    }

    fn append_element(&mut self, e: &BytesStart<'_>, event_start: u64) -> Result<NodeId> {
        let at_top_level = self.stack.len() == 1;
        if at_top_level {
            if self.root_seen {
                return Err(Error::MultipleRoots {
                    offset: event_start,
                });
            }
            self.root_seen = true;
        }

        let mut data = NodeData::new(NodeKind::Element, event_start as i64);
        data.name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

        for attr in e.attributes() {
            let attr = attr.map_err(|err| Error::Syntax {
                message: format!("malformed attribute: {}", err),
                offset: event_start,
            })?;

            let value = attr.unescape_value().map_err(|err| Error::Syntax {
                message: format!("invalid attribute value: {}", err),
                offset: event_start,
            })?;

            data.attributes.push(AttributeData {
                name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                value: value.into_owned(),
            });
        }

        Ok(self.append(data))
    }

    /// Append a node as the next child of the innermost open element.
    fn append(&mut self, data: NodeData) -> NodeId {
        let id = self.document.push(data);

        // The stack is never empty: the document frame stays at the bottom
        let frame = self.stack.last_mut().expect("document frame present");
        match frame.last_child {
            Some(prev) => self.document.nodes[prev.index()].next_sibling = Some(id),
            None => self.document.nodes[frame.node.index()].first_child = Some(id),
        }
        frame.last_child = Some(id);

        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_of_document_children(doc: &Document) -> Vec<NodeKind> {
        let mut kinds = Vec::new();
        let mut next = doc.node(doc.document_node().unwrap()).first_child;
        while let Some(id) = next {
            kinds.push(doc.node(id).kind);
            next = doc.node(id).next_sibling;
        }
        kinds
    }

    #[test]
    fn test_build_simple_tree() {
        let outcome = parse_bytes(b"<a><b/><c/></a>").unwrap();
        let doc = outcome.document;

        let root = doc.find_root_element().unwrap();
        assert_eq!(doc.node(root).name, "a");
        assert_eq!(doc.node(root).offset, 0);

        let b = doc.node(root).first_child.unwrap();
        assert_eq!(doc.node(b).name, "b");
        assert_eq!(doc.node(b).offset, 3);

        let c = doc.node(b).next_sibling.unwrap();
        assert_eq!(doc.node(c).name, "c");
        assert!(doc.node(c).next_sibling.is_none());
    }

    #[test]
    fn test_whitespace_text_dropped() {
        let outcome = parse_bytes(b"<a>\n  <b/>\n</a>").unwrap();
        let doc = outcome.document;

        let root = doc.find_root_element().unwrap();
        let first = doc.node(root).first_child.unwrap();
        assert_eq!(doc.node(first).kind, NodeKind::Element);
        assert_eq!(doc.node(first).name, "b");
    }

    #[test]
    fn test_text_node_kept_raw() {
        let outcome = parse_bytes(b"<a>  hello   world  </a>").unwrap();
        let doc = outcome.document;

        let root = doc.find_root_element().unwrap();
        let text = doc.node(root).first_child.unwrap();
        assert_eq!(doc.node(text).kind, NodeKind::PcData);
        assert_eq!(doc.node(text).value, "  hello   world  ");
    }

    #[test]
    fn test_entities_decoded_in_text_and_attributes() {
        let outcome = parse_bytes(br#"<a x="1 &amp; 2">a &lt; b</a>"#).unwrap();
        let doc = outcome.document;

        let root = doc.find_root_element().unwrap();
        assert_eq!(doc.node(root).attributes[0].value, "1 & 2");

        let text = doc.node(root).first_child.unwrap();
        assert_eq!(doc.node(text).value, "a < b");
    }

    #[test]
    fn test_prolog_nodes_stored() {
        let source = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- intro -->\n<?print once?>\n<score/>";
        let outcome = parse_bytes(source).unwrap();
        let doc = outcome.document;

        assert_eq!(
            kinds_of_document_children(&doc),
            vec![
                NodeKind::Declaration,
                NodeKind::Comment,
                NodeKind::ProcessingInstruction,
                NodeKind::Element,
            ]
        );
        assert_eq!(outcome.declared_encoding.as_deref(), Some("utf-8"));

        // Root finding skips everything before the element
        let root = doc.find_root_element().unwrap();
        assert_eq!(doc.node(root).name, "score");
    }

    #[test]
    fn test_declaration_attributes() {
        let outcome = parse_bytes(b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a/>").unwrap();
        let doc = outcome.document;

        let decl = doc.node(doc.document_node().unwrap()).first_child.unwrap();
        let decl = doc.node(decl);
        assert_eq!(decl.name, "xml");
        assert_eq!(decl.attributes[0].name, "version");
        assert_eq!(decl.attributes[0].value, "1.0");
        assert_eq!(decl.attributes[1].name, "encoding");
        assert_eq!(decl.attributes[1].value, "iso-8859-1");
    }

    #[test]
    fn test_processing_instruction_target_and_content() {
        let outcome = parse_bytes(b"<a><?layout page=2?></a>").unwrap();
        let doc = outcome.document;

        let root = doc.find_root_element().unwrap();
        let pi = doc.node(doc.node(root).first_child.unwrap());
        assert_eq!(pi.kind, NodeKind::ProcessingInstruction);
        assert_eq!(pi.name, "layout");
        assert_eq!(pi.value, "page=2");
    }

    #[test]
    fn test_cdata_node() {
        let outcome = parse_bytes(b"<a><![CDATA[1 < 2]]></a>").unwrap();
        let doc = outcome.document;

        let root = doc.find_root_element().unwrap();
        let cdata = doc.node(doc.node(root).first_child.unwrap());
        assert_eq!(cdata.kind, NodeKind::CData);
        assert_eq!(cdata.value, "1 < 2");
    }

    #[test]
    fn test_no_element_root() {
        let outcome = parse_bytes(b"<!-- only a comment -->").unwrap();
        assert!(outcome.document.find_root_element().is_none());
    }

    #[test]
    fn test_mismatched_end_tag_is_error() {
        let result = parse_bytes(b"<a><b></a>");
        assert!(matches!(result, Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_unclosed_element_is_error() {
        let result = parse_bytes(b"<a><b>");
        match result {
            Err(Error::UnexpectedEof { expected, .. }) => assert_eq!(expected, "b"),
            other => panic!("expected UnexpectedEof, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_roots_is_error() {
        let result = parse_bytes(b"<a/><b/>");
        assert!(matches!(result, Err(Error::MultipleRoots { offset: 4 })));
    }

    #[test]
    fn test_stray_end_tag_is_error() {
        let result = parse_bytes(b"</a>");
        assert!(matches!(result, Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_empty_document_has_null_only() {
        let doc = Document::empty();
        assert!(doc.document_node().is_none());
        assert!(doc.find_root_element().is_none());
        assert_eq!(doc.node(NodeId::NULL).kind, NodeKind::Null);
    }
}
