//! Error types for reading and writing XML documents.

use std::path::PathBuf;

/// Errors that can occur while loading or serializing a document.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A file could not be read or written.
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The input is not well-formed XML, or uses an undeclared namespace prefix.
    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },
    /// The input contains no element at all.
    #[error("Document has no root element")]
    MissingRoot,
    /// A second top-level element follows the root.
    #[error("Document has more than one root element (found <{0}>)")]
    MultipleRoots(String),
    /// The serializer failed.
    #[error("XML write failed")]
    Write(#[from] quick_xml::Error),
}
