use std::io::Cursor;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::element::{Element, Name, Node};

/// Reserved namespace of the `xml:` prefix. Never declared.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Prefix-to-URI bindings the serializer declares on the root element.
///
/// Elements in the default namespace, or in no namespace, are written unprefixed.
/// Elements in a bound namespace use its prefix. Any other namespace gets a generated
/// `nsN` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceBindings {
    default: Option<String>,
    prefixes: Vec<(String, String)>,
}

impl NamespaceBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, uri: impl Into<String>) -> Self {
        self.default = Some(uri.into());
        self
    }

    /// Binds `prefix` to `uri`, replacing an earlier binding of the same prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefixes.retain(|(p, _)| *p != prefix);
        self.prefixes.push((prefix, uri.into()));
        self
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(_, u)| u == uri)
            .map(|(p, _)| p.as_str())
    }
}

/// Per-document prefix assignment: the configured bindings plus generated ones.
struct PrefixTable<'a> {
    default: Option<&'a str>,
    prefixes: Vec<(String, String)>,
    next_generated: usize,
}

impl<'a> PrefixTable<'a> {
    fn build(root: &Element, bindings: &'a NamespaceBindings) -> Self {
        let mut table = Self {
            default: bindings.default_namespace(),
            prefixes: bindings.prefixes.clone(),
            next_generated: 0,
        };
        table.collect(root);
        table
    }

    fn collect(&mut self, element: &Element) {
        if let Some(uri) = &element.name.namespace {
            if self.default != Some(uri.as_str()) {
                self.ensure_prefix(uri);
            }
        }
        for attr in &element.attributes {
            // attributes never pick up the default namespace, so they always need a prefix
            if let Some(uri) = &attr.name.namespace {
                self.ensure_prefix(uri);
            }
        }
        for child in element.elements() {
            self.collect(child);
        }
    }

    fn ensure_prefix(&mut self, uri: &str) {
        if uri == XML_NAMESPACE || self.prefix(uri).is_some() {
            return;
        }
        loop {
            let candidate = format!("ns{}", self.next_generated);
            self.next_generated += 1;
            if !self.prefixes.iter().any(|(p, _)| *p == candidate) {
                tracing::debug!(prefix = %candidate, namespace = %uri, "generated namespace prefix");
                self.prefixes.push((candidate, uri.to_string()));
                return;
            }
        }
    }

    fn prefix(&self, uri: &str) -> Option<&str> {
        if uri == XML_NAMESPACE {
            return Some("xml");
        }
        self.prefixes
            .iter()
            .find(|(_, u)| u == uri)
            .map(|(p, _)| p.as_str())
    }

    fn element_name(&self, name: &Name) -> String {
        match &name.namespace {
            Some(uri) if self.default != Some(uri.as_str()) => self.prefixed(uri, &name.local),
            _ => name.local.clone(),
        }
    }

    fn attribute_name(&self, name: &Name) -> String {
        match &name.namespace {
            Some(uri) => self.prefixed(uri, &name.local),
            None => name.local.clone(),
        }
    }

    fn prefixed(&self, uri: &str, local: &str) -> String {
        match self.prefix(uri) {
            Some(prefix) => format!("{}:{}", prefix, local),
            None => local.to_string(),
        }
    }

    /// `xmlns` attributes for the root element, default namespace first.
    fn declarations(&self) -> Vec<(String, String)> {
        let mut decls = Vec::new();
        if let Some(uri) = self.default {
            decls.push(("xmlns".to_string(), uri.to_string()));
        }
        for (prefix, uri) in &self.prefixes {
            decls.push((format!("xmlns:{}", prefix), uri.clone()));
        }
        decls
    }
}

/// Recursively write an element and its subtree.
fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &Element,
    table: &PrefixTable,
    is_root: bool,
) -> Result<(), quick_xml::Error> {
    let name = table.element_name(&element.name);
    let mut start = BytesStart::new(name.as_str());
    if is_root {
        for (key, value) in table.declarations() {
            start.push_attribute((key.as_str(), value.as_str()));
        }
    }
    for attr in &element.attributes {
        let key = table.attribute_name(&attr.name);
        start.push_attribute((key.as_str(), attr.value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for node in &element.children {
        match node {
            Node::Element(child) => write_element(writer, child, table, false)?,
            Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            Node::CData(text) => writer.write_event(Event::CData(BytesCData::new(text.as_str())))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    Ok(())
}

/// Serialize a tree with an XML declaration, UTF-8, two-space indentation.
pub(crate) fn to_xml_bytes(
    root: &Element,
    bindings: &NamespaceBindings,
) -> Result<Vec<u8>, quick_xml::Error> {
    let table = PrefixTable::build(root, bindings);
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root, &table, true)?;
    Ok(writer.into_inner().into_inner())
}
