//! Security matching between the primary and secondary reports.

use std::collections::HashMap;

use edavki_xml::Element;
use serde::Serialize;

use crate::tags::{CODE, KDVP_ITEM, SECURITIES};

/// Trimmed instrument code of a `KDVPItem`, read from its first `Securities/Code`.
///
/// Returns `None` only when either element is missing. A blank code is the empty string.
pub fn security_code(item: &Element) -> Option<String> {
    securities_code(item.find_descendant(SECURITIES)?)
}

/// Trimmed text of the `Code` child of a `Securities` element.
pub fn securities_code(securities: &Element) -> Option<String> {
    securities
        .child(CODE)
        .map(|code| code.text().trim().to_string())
}

/// Primary-report `KDVPItem` blocks keyed by instrument code.
///
/// Blocks are stored as child-index paths from the document root. Merging only rewrites the
/// children of `Securities` elements, so the paths stay valid for the whole run.
#[derive(Debug, Default)]
pub struct SecurityIndex {
    by_code: HashMap<String, Vec<usize>>,
}

impl SecurityIndex {
    /// Indexes every `KDVPItem` under `root`. A repeated code replaces the earlier entry.
    pub fn build(root: &Element) -> Self {
        let mut by_code = HashMap::new();
        for path in root.descendant_paths(KDVP_ITEM) {
            let Some(item) = root.at_path(&path) else {
                continue;
            };
            let Some(code) = security_code(item) else {
                tracing::debug!(?path, "primary KDVPItem has no security code, not indexed");
                continue;
            };
            if by_code.insert(code.clone(), path).is_some() {
                tracing::warn!(%code, "duplicate security code in primary report, later block wins");
            }
        }
        Self { by_code }
    }

    pub fn get(&self, code: &str) -> Option<&[usize]> {
        self.by_code.get(code).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// Secondary-report codes split into matched and unmatched, each kept once in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    matched: Vec<String>,
    unmatched: Vec<String>,
}

impl MatchReport {
    pub fn record_matched(&mut self, code: &str) {
        if !self.matched.iter().any(|c| c == code) {
            self.matched.push(code.to_string());
        }
    }

    pub fn record_unmatched(&mut self, code: &str) {
        if !self.unmatched.iter().any(|c| c == code) {
            self.unmatched.push(code.to_string());
        }
    }

    pub fn matched(&self) -> &[String] {
        &self.matched
    }

    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }
}
