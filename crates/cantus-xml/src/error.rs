//! Error types for XML parsing.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cantus-xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading and parsing an XML document.
///
/// These never escape to the process boundary: `XmlParser` recovers every
/// failure into its error accessors, so consumers observe a null root and a
/// message rather than a propagating error.
#[derive(Debug, Error)]
pub enum Error {
    /// The backend rejected the input.
    #[error("{message}")]
    Syntax {
        message: String,
        /// Byte offset where the error occurred.
        offset: u64,
    },

    /// The document ended with elements still open.
    #[error("unexpected end of document, expected closing tag </{expected}>")]
    UnexpectedEof { expected: String, offset: u64 },

    /// Parsing succeeded syntactically but produced no element root.
    #[error("XML document has no root element.")]
    NoRootElement,

    /// A second element appeared at the top level.
    #[error("XML document has more than one root element")]
    MultipleRoots { offset: u64 },

    /// The source file could not be opened or read.
    #[error("cannot read file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Byte offset associated with this error, or -1 when none applies.
    pub fn offset(&self) -> i64 {
        match self {
            Error::Syntax { offset, .. }
            | Error::UnexpectedEof { offset, .. }
            | Error::MultipleRoots { offset, .. } => *offset as i64,
            Error::NoRootElement => 0,
            Error::FileRead { .. } => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_root_message() {
        let err = Error::NoRootElement;
        assert_eq!(err.to_string(), "XML document has no root element.");
        assert_eq!(err.offset(), 0);
    }

    #[test]
    fn test_syntax_offset() {
        let err = Error::Syntax {
            message: "ill-formed".into(),
            offset: 12,
        };
        assert_eq!(err.offset(), 12);
    }

    #[test]
    fn test_file_read_has_no_offset() {
        let err = Error::FileRead {
            path: PathBuf::from("missing.xml"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.offset(), -1);
        assert!(err.to_string().contains("missing.xml"));
    }
}
