//! Node kind enumeration for the XML facade.

/// The kind of a node in a parsed XML tree.
///
/// Backend event kinds map onto these values by a fixed table in the tree
/// builder; consumers never see a backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    /// Empty (null) node handle.
    #[default]
    Null,
    /// A document tree's absolute root.
    Document,
    /// Element tag, e.g. `<node/>`.
    Element,
    /// Plain character data, e.g. `text`.
    PcData,
    /// Character data section, e.g. `<![CDATA[text]]>`.
    CData,
    /// Comment, e.g. `<!-- text -->`.
    Comment,
    /// Processing instruction, e.g. `<?name?>`.
    ProcessingInstruction,
    /// Document declaration, e.g. `<?xml version="1.0"?>`.
    Declaration,
    /// Document type declaration, e.g. `<!DOCTYPE doc>`.
    Doctype,
    /// Reserved for backend node kinds this facade has not enumerated.
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_null() {
        assert_eq!(NodeKind::default(), NodeKind::Null);
    }
}
