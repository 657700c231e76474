//! Namespace normalization and eDavki re-prefixing.
//!
//! Input reports arrive with arbitrary prefixes and default namespaces. Both trees are first
//! reduced to local names so that blocks can be matched by tag alone. The primary tree then gets
//! the namespace layout FURS expects: envelope elements in `edp`, everything else in the KDVP
//! default namespace.

use std::collections::HashSet;

use edavki_xml::Element;

/// Drops the namespace of every element in the tree. Attributes are left alone.
pub fn strip_namespaces(root: &mut Element) {
    root.for_each_mut(&mut |element| element.name.namespace = None);
}

/// Rule table mapping `(tag, direct parent tag)` to the namespace the tag should carry.
#[derive(Debug, Clone)]
pub struct NamespaceRules {
    primary: String,
    edp: String,
    edp_tags: HashSet<String>,
    workflow_tag: String,
    workflow_id_tag: String,
}

impl NamespaceRules {
    pub fn new(
        primary: String,
        edp: String,
        edp_tags: impl IntoIterator<Item = String>,
        workflow_tag: String,
        workflow_id_tag: String,
    ) -> Self {
        Self {
            primary,
            edp,
            edp_tags: edp_tags.into_iter().collect(),
            workflow_tag,
            workflow_id_tag,
        }
    }

    /// `None` means the element is written without a prefix and inherits the default namespace.
    pub fn target(&self, tag: &str, parent: Option<&str>) -> Option<&str> {
        if tag == self.workflow_id_tag {
            // the workflow id exists twice: once in the edp header, once in the KDVP body
            if parent == Some(self.workflow_tag.as_str()) {
                return Some(&self.edp);
            }
            return Some(&self.primary);
        }
        if self.edp_tags.contains(tag) {
            return Some(&self.edp);
        }
        None
    }
}

/// Re-applies namespaces to a normalized tree in one top-down pass.
///
/// Local names are never touched, so local-name lookups keep working afterwards.
pub fn apply_edp_prefix(root: &mut Element, rules: &NamespaceRules) {
    relabel(root, None, rules);
}

fn relabel(element: &mut Element, parent: Option<&str>, rules: &NamespaceRules) {
    element.name.namespace = rules
        .target(&element.name.local, parent)
        .map(str::to_owned);
    let local = element.name.local.clone();
    for child in element.elements_mut() {
        relabel(child, Some(&local), rules);
    }
}
