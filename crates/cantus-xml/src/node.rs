//! Read-only handles over the parsed tree.
//!
//! [`XmlNode`] and [`XmlAttribute`] are cheap `Copy` views into a
//! [`Document`] arena. Their lifetime is tied to the document's borrow, so a
//! handle cannot outlive the parser that produced it. Every operation on a
//! null handle returns an empty or zero result; none of them fail.

use crate::document::{AttributeData, Document, NodeId};
use crate::types::NodeKind;

/// Handle to one node of a parsed XML document.
#[derive(Debug, Clone, Copy)]
pub struct XmlNode<'d> {
    document: &'d Document,
    id: NodeId,
}

impl<'d> XmlNode<'d> {
    pub(crate) fn new(document: &'d Document, id: NodeId) -> Self {
        XmlNode { document, id }
    }

    pub(crate) fn null(document: &'d Document) -> Self {
        XmlNode {
            document,
            id: NodeId::NULL,
        }
    }

    /// The element tag name (or processing-instruction target); empty for
    /// other node kinds.
    pub fn name(&self) -> &'d str {
        &self.document.node(self.id).name
    }

    /// Textual value of the node, whitespace-normalized: leading and
    /// trailing whitespace is trimmed and internal runs collapse to a
    /// single space.
    ///
    /// Text-bearing kinds (`PcData`, `CData`, `Comment`,
    /// `ProcessingInstruction`) yield their own text. An `Element` yields
    /// the text of its first character-data child, if any. Everything else
    /// yields an empty string.
    pub fn value(&self) -> String {
        let data = self.document.node(self.id);
        match data.kind {
            NodeKind::PcData
            | NodeKind::CData
            | NodeKind::Comment
            | NodeKind::ProcessingInstruction => normalize_value(&data.value),
            NodeKind::Element => {
                let mut next = data.first_child;
                while let Some(id) = next {
                    let child = self.document.node(id);
                    if matches!(child.kind, NodeKind::PcData | NodeKind::CData) {
                        return normalize_value(&child.value);
                    }
                    next = child.next_sibling;
                }
                String::new()
            }
            _ => String::new(),
        }
    }

    /// The kind of this node.
    pub fn kind(&self) -> NodeKind {
        self.document.node(self.id).kind
    }

    /// Whether this handle is the null sentinel.
    pub fn is_null(&self) -> bool {
        self.id == NodeId::NULL
    }

    /// First direct child whose tag name equals `name` exactly, or the
    /// null handle if there is none.
    pub fn child(&self, name: &str) -> XmlNode<'d> {
        let mut next = self.document.node(self.id).first_child;
        while let Some(id) = next {
            let data = self.document.node(id);
            if data.kind == NodeKind::Element && data.name == name {
                return XmlNode::new(self.document, id);
            }
            next = data.next_sibling;
        }
        XmlNode::null(self.document)
    }

    /// First direct child of any kind, or the null handle.
    pub fn first_child(&self) -> XmlNode<'d> {
        match self.document.node(self.id).first_child {
            Some(id) => XmlNode::new(self.document, id),
            None => XmlNode::null(self.document),
        }
    }

    /// Next sibling of any kind, or the null handle.
    pub fn next_sibling(&self) -> XmlNode<'d> {
        match self.document.node(self.id).next_sibling {
            Some(id) => XmlNode::new(self.document, id),
            None => XmlNode::null(self.document),
        }
    }

    /// Whether an attribute of exactly this name exists.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.find_attribute(name).is_some()
    }

    /// The named attribute, or the null attribute when absent.
    pub fn attribute(&self, name: &str) -> XmlAttribute<'d> {
        XmlAttribute {
            data: self.find_attribute(name),
        }
    }

    /// The named attribute's value, or an empty string when absent.
    ///
    /// A missing attribute and an attribute with an empty value are
    /// indistinguishable here; use [`has_attribute`](Self::has_attribute)
    /// to tell them apart.
    pub fn attribute_value(&self, name: &str) -> &'d str {
        self.find_attribute(name).map_or("", |a| a.value.as_str())
    }

    /// Byte offset of this node's first byte in the original source, or -1
    /// when the backend supplied none.
    pub fn offset(&self) -> i64 {
        self.document.node(self.id).offset
    }

    fn find_attribute(&self, name: &str) -> Option<&'d AttributeData> {
        self.document
            .node(self.id)
            .attributes
            .iter()
            .find(|a| a.name == name)
    }
}

/// Read-only view of one attribute pair on an element.
///
/// Same lifetime rule as [`XmlNode`]: valid only while the owning parser's
/// document is alive.
#[derive(Debug, Clone, Copy)]
pub struct XmlAttribute<'d> {
    data: Option<&'d AttributeData>,
}

impl<'d> XmlAttribute<'d> {
    /// Whether this is the sentinel for an absent attribute.
    pub fn is_null(&self) -> bool {
        self.data.is_none()
    }

    /// The attribute name, or empty for the null attribute.
    pub fn name(&self) -> &'d str {
        self.data.map_or("", |a| a.name.as_str())
    }

    /// The attribute value, or empty for the null attribute.
    pub fn value(&self) -> &'d str {
        self.data.map_or("", |a| a.value.as_str())
    }
}

/// Trim leading and trailing whitespace and collapse internal runs to a
/// single space.
fn normalize_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_ascii_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_bytes;

    fn document(source: &[u8]) -> Document {
        parse_bytes(source).unwrap().document
    }

    fn root(doc: &Document) -> XmlNode<'_> {
        XmlNode::new(doc, doc.find_root_element().unwrap())
    }

    #[test]
    fn test_navigation() {
        let doc = document(b"<score-partwise><part-list/><part/></score-partwise>");
        let root = root(&doc);

        assert_eq!(root.name(), "score-partwise");
        assert_eq!(root.kind(), NodeKind::Element);
        assert_eq!(root.first_child().name(), "part-list");
        assert_eq!(root.first_child().next_sibling().name(), "part");
        assert_eq!(root.child("part").name(), "part");
        assert!(root.child("measure").is_null());
    }

    #[test]
    fn test_child_matches_exact_name() {
        let doc = document(b"<a><bb/><b/></a>");
        assert_eq!(root(&doc).child("b").offset(), 8);
    }

    #[test]
    fn test_null_node_is_safe() {
        let doc = Document::empty();
        let null = XmlNode::null(&doc);

        assert!(null.is_null());
        assert_eq!(null.kind(), NodeKind::Null);
        assert_eq!(null.name(), "");
        assert_eq!(null.value(), "");
        assert_eq!(null.offset(), -1);
        assert!(null.first_child().is_null());
        assert!(null.next_sibling().is_null());
        assert!(null.child("anything").is_null());
        assert!(!null.has_attribute("x"));
        assert!(null.attribute("x").is_null());
        assert_eq!(null.attribute_value("x"), "");
    }

    #[test]
    fn test_attribute_lookup() {
        let doc = document(br#"<n x="1" y=""/>"#);
        let n = root(&doc);

        assert!(n.has_attribute("x"));
        assert_eq!(n.attribute_value("x"), "1");
        assert!(n.has_attribute("y"));
        assert_eq!(n.attribute_value("y"), "");
        assert!(!n.has_attribute("z"));
        assert_eq!(n.attribute_value("z"), "");
    }

    #[test]
    fn test_attribute_handle_round_trip() {
        let doc = document(br#"<n x="1" y=""/>"#);
        let n = root(&doc);

        let x = n.attribute("x");
        assert!(!x.is_null());
        assert_eq!(x.name(), "x");
        assert_eq!(x.value(), "1");

        let y = n.attribute("y");
        assert!(!y.is_null());
        assert_eq!(y.value(), "");

        assert!(n.attribute("z").is_null());
        assert_eq!(n.attribute("z").value(), "");
    }

    #[test]
    fn test_value_normalization() {
        let doc = document(b"<a>  hello   world  </a>");
        assert_eq!(root(&doc).value(), "hello world");

        let text = root(&doc).first_child();
        assert_eq!(text.kind(), NodeKind::PcData);
        assert_eq!(text.value(), "hello world");
    }

    #[test]
    fn test_value_with_tabs_and_newlines() {
        let doc = document(b"<a>\thello\r\n\tworld\n</a>");
        assert_eq!(root(&doc).value(), "hello world");
    }

    #[test]
    fn test_element_value_skips_leading_child_elements() {
        let doc = document(b"<a><b/>text</a>");
        assert_eq!(root(&doc).value(), "text");
    }

    #[test]
    fn test_element_without_text_has_empty_value() {
        let doc = document(b"<a><b/></a>");
        assert_eq!(root(&doc).value(), "");
    }

    #[test]
    fn test_comment_value() {
        let doc = document(b"<a><!--  a  note  --></a>");
        let comment = root(&doc).first_child();
        assert_eq!(comment.kind(), NodeKind::Comment);
        assert_eq!(comment.value(), "a note");
    }

    #[test]
    fn test_handles_are_copyable() {
        let doc = document(b"<a><b/></a>");
        let a = root(&doc);
        let copy = a;

        // Both handles refer to the same underlying node
        assert_eq!(a.name(), copy.name());
        assert_eq!(a.first_child().name(), copy.first_child().name());
    }
}
