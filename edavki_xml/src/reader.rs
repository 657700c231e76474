use std::fmt::Display;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use crate::element::{Attribute, Element, Name, Node};
use crate::errors::Error;

fn syntax(position: u64, err: impl Display) -> Error {
    Error::Syntax {
        position,
        message: err.to_string(),
    }
}

fn utf8(bytes: &[u8], position: u64) -> Result<String, Error> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| syntax(position, e))
}

/// Turns a resolved prefix into an owned namespace URI.
fn namespace_of(resolved: ResolveResult, position: u64) -> Result<Option<String>, Error> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(String::from_utf8_lossy(ns.as_ref()).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(syntax(
            position,
            format!(
                "undeclared namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            ),
        )),
    }
}

fn open_element(
    reader: &NsReader<&[u8]>,
    namespace: Option<String>,
    start: &BytesStart,
) -> Result<Element, Error> {
    let position = reader.buffer_position() as u64;
    let local = utf8(start.local_name().as_ref(), position)?;

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| syntax(position, e))?;
        // xmlns declarations are folded into the resolved names
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, attr_local) = reader.resolve_attribute(attr.key);
        let attr_namespace = namespace_of(resolved, position)?;
        let attr_local = utf8(attr_local.as_ref(), position)?;
        let value = attr
            .unescape_value()
            .map_err(|e| syntax(position, e))?
            .into_owned();
        attributes.push(Attribute {
            name: Name {
                namespace: attr_namespace,
                local: attr_local,
            },
            value,
        });
    }

    Ok(Element {
        name: Name { namespace, local },
        attributes,
        children: Vec::new(),
    })
}

/// Attaches a finished element to its parent, or makes it the root.
fn close_element(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), Error> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => {
            if root.is_some() {
                return Err(Error::MultipleRoots(element.name.local));
            }
            *root = Some(element);
        }
    }
    Ok(())
}

/// Parses a whole document into an owned tree rooted at its single top-level element.
///
/// Whitespace-only text is dropped and surrounding whitespace of text content is trimmed.
/// Comments, processing instructions and the doctype are discarded.
pub(crate) fn parse_str(xml: &str) -> Result<Element, Error> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let (namespace, event) = match reader.read_resolved_event() {
            Ok((resolved, event)) => (namespace_of(resolved, position)?, event),
            Err(e) => return Err(syntax(reader.error_position() as u64, e)),
        };

        match event {
            Event::Start(start) => {
                let element = open_element(&reader, namespace, &start)?;
                if stack.is_empty() && root.is_some() {
                    return Err(Error::MultipleRoots(element.name.local));
                }
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = open_element(&reader, namespace, &start)?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| syntax(position, "closing tag without an open element"))?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| syntax(position, e))?;
                if text.is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Text(text.into_owned())),
                    None => return Err(syntax(position, "text outside the root element")),
                }
            }
            Event::CData(cdata) => {
                let text = String::from_utf8_lossy(&cdata).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::CData(text)),
                    None => return Err(syntax(position, "CDATA outside the root element")),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(syntax(
            reader.buffer_position() as u64,
            format!("unclosed element <{}>", open.name.local),
        ));
    }
    root.ok_or(Error::MissingRoot)
}
