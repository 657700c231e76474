//! Owned XML tree with namespace-aware reading and writing, used for eDavki report documents.

mod document;
mod element;
mod errors;
mod reader;
mod writer;
pub use self::document::Document;
pub use self::element::{Attribute, Element, Name, Node};
pub use self::errors::Error;
pub use self::writer::{NamespaceBindings, XML_NAMESPACE};
