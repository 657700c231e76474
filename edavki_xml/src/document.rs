use std::path::Path;

use crate::element::Element;
use crate::errors::Error;
use crate::reader;
use crate::writer::{self, NamespaceBindings};

/// A whole XML document held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn parse_str(xml: &str) -> Result<Self, Error> {
        Ok(Self {
            root: reader::parse_str(xml)?,
        })
    }

    /// Reads and parses a file. The handle is closed before parsing starts.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::parse_str(&xml)?;
        tracing::debug!(path = %path.display(), root = %doc.root.name, "loaded document");
        Ok(doc)
    }

    pub fn to_xml_bytes(&self, bindings: &NamespaceBindings) -> Result<Vec<u8>, Error> {
        Ok(writer::to_xml_bytes(&self.root, bindings)?)
    }

    pub fn to_xml_string(&self, bindings: &NamespaceBindings) -> Result<String, Error> {
        let bytes = self.to_xml_bytes(bindings)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Serializes the document and overwrites `path`.
    pub fn write_to_file(
        &self,
        path: impl AsRef<Path>,
        bindings: &NamespaceBindings,
    ) -> Result<(), Error> {
        let path = path.as_ref();
        let bytes = self.to_xml_bytes(bindings)?;
        std::fs::write(path, bytes).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
