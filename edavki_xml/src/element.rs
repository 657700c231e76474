//! Owned XML tree.
//!
//! Every element owns its children in document order. There are no parent links, so a subtree
//! is moved by taking it out of one `children` list and pushing it onto another.

use std::fmt;

/// An expanded element or attribute name: namespace URI plus local part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    pub namespace: Option<String>,
    pub local: String,
}

impl Name {
    /// A name with no namespace.
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    pub fn qualified(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }
}

/// Clark notation, `{uri}local`, or just `local` when there is no namespace.
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: Name,
    pub value: String,
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: Name,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an empty element with no namespace.
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            name: Name::local(local),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates an element holding a single text node.
    pub fn with_text(local: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(local);
        element.children.push(Node::Text(text.into()));
        element
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Direct child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First direct child with the given local name.
    pub fn child(&self, local: &str) -> Option<&Element> {
        self.elements().find(|e| e.name.local == local)
    }

    /// First direct child with the given local name, appending an empty one if there is none.
    pub fn child_or_insert(&mut self, local: &str) -> &mut Element {
        let position = self
            .children
            .iter()
            .position(|node| matches!(node, Node::Element(e) if e.name.local == local));
        let index = match position {
            Some(index) => index,
            None => {
                self.children.push(Node::Element(Element::new(local)));
                self.children.len() - 1
            }
        };
        match &mut self.children[index] {
            Node::Element(e) => e,
            _ => unreachable!("index points at an element node"),
        }
    }

    /// First descendant (excluding `self`) with the given local name, in document order.
    pub fn find_descendant(&self, local: &str) -> Option<&Element> {
        for child in self.elements() {
            if child.name.local == local {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(local) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_descendant_mut(&mut self, local: &str) -> Option<&mut Element> {
        for child in self.elements_mut() {
            if child.name.local == local {
                return Some(child);
            }
            if let Some(found) = child.find_descendant_mut(local) {
                return Some(found);
            }
        }
        None
    }

    /// Child-index paths to every descendant with the given local name, in document order.
    ///
    /// A path indexes into `children` at each level and can be resolved later with
    /// [`Element::at_path`] or [`Element::at_path_mut`]. Paths stay valid as long as no
    /// node is inserted or removed on the way down to the target.
    pub fn descendant_paths(&self, local: &str) -> Vec<Vec<usize>> {
        let mut paths = Vec::new();
        let mut prefix = Vec::new();
        collect_paths(self, local, &mut prefix, &mut paths);
        paths
    }

    pub fn at_path(&self, path: &[usize]) -> Option<&Element> {
        let mut current = self;
        for &index in path {
            match current.children.get(index) {
                Some(Node::Element(e)) => current = e,
                _ => return None,
            }
        }
        Some(current)
    }

    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &index in path {
            match current.children.get_mut(index) {
                Some(Node::Element(e)) => current = e,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Concatenated text of the direct text and CDATA children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Replaces all direct text content with a single leading text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children
            .retain(|node| matches!(node, Node::Element(_)));
        self.children.insert(0, Node::Text(text.into()));
    }

    /// Detaches every direct child element with the given local name and returns them in order.
    pub fn take_children_named(&mut self, local: &str) -> Vec<Element> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.children.len());
        for node in self.children.drain(..) {
            match node {
                Node::Element(e) if e.name.local == local => taken.push(e),
                other => kept.push(other),
            }
        }
        self.children = kept;
        taken
    }

    /// Visits `self` and every descendant element, parents before children.
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in self.elements_mut() {
            child.for_each_mut(f);
        }
    }
}

fn collect_paths(element: &Element, local: &str, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
    for (index, node) in element.children.iter().enumerate() {
        if let Node::Element(child) = node {
            prefix.push(index);
            if child.name.local == local {
                out.push(prefix.clone());
            }
            collect_paths(child, local, prefix, out);
            prefix.pop();
        }
    }
}
