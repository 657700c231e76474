//! The merge pipeline: normalize, re-prefix, match, merge rows, recompute positions.

use edavki_xml::{Document, Node};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::MergeConfig;
use crate::error::MergeError;
use crate::matcher::{securities_code, MatchReport, SecurityIndex};
use crate::namespace::{apply_edp_prefix, strip_namespaces};
use crate::rows::{merge_rows, recompute_positions};
use crate::tags::{HEADER, KDVP_ITEM, ROW, SECURITIES};

/// Per-security result of a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityMerge {
    pub code: String,
    pub primary_rows: usize,
    pub secondary_rows: usize,
    /// Position after the last merged row.
    pub final_position: Decimal,
}

impl SecurityMerge {
    pub fn merged_rows(&self) -> usize {
        self.primary_rows + self.secondary_rows
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub report: MatchReport,
    pub securities: Vec<SecurityMerge>,
}

/// Merges the secondary report into the primary one, in place.
///
/// Both trees lose their original namespaces. Matched secondary rows are moved out of the
/// secondary tree into the primary `Securities` element of the same code. Any unreadable date
/// or quantity aborts the merge.
pub fn merge_documents(
    primary: &mut Document,
    secondary: &mut Document,
    config: &MergeConfig,
) -> Result<MergeOutcome, MergeError> {
    strip_namespaces(&mut primary.root);
    strip_namespaces(&mut secondary.root);

    if primary.root.child(HEADER).is_none() {
        tracing::debug!("primary report has no Header element");
    }
    apply_edp_prefix(&mut primary.root, &config.rules());

    let index = SecurityIndex::build(&primary.root);
    tracing::info!(securities = index.len(), "indexed primary report");

    let mut outcome = MergeOutcome::default();
    for path in secondary.root.descendant_paths(KDVP_ITEM) {
        let Some(securities) = secondary
            .root
            .at_path_mut(&path)
            .and_then(|item| item.find_descendant_mut(SECURITIES))
        else {
            tracing::debug!(?path, "secondary KDVPItem has no Securities, skipped");
            continue;
        };
        let Some(code) = securities_code(securities) else {
            tracing::debug!(?path, "secondary KDVPItem has no Code, skipped");
            continue;
        };

        let Some(primary_path) = index.get(&code) else {
            tracing::warn!(%code, label = %config.primary_label, "no matching security in primary report");
            outcome.report.record_unmatched(&code);
            continue;
        };
        outcome.report.record_matched(&code);

        // indexed items always have a Securities element
        let Some(target) = primary
            .root
            .at_path_mut(primary_path)
            .and_then(|item| item.find_descendant_mut(SECURITIES))
        else {
            continue;
        };

        let incoming = securities.take_children_named(ROW);
        let existing = target.take_children_named(ROW);
        let (primary_rows, secondary_rows) = (existing.len(), incoming.len());

        let mut merged = merge_rows(existing, incoming).map_err(|source| MergeError::Row {
            code: code.clone(),
            source,
        })?;
        let final_position = recompute_positions(&mut merged).map_err(|source| MergeError::Row {
            code: code.clone(),
            source,
        })?;
        target
            .children
            .extend(merged.into_iter().map(Node::Element));

        tracing::info!(
            %code,
            primary_rows,
            secondary_rows,
            %final_position,
            "merged security"
        );
        outcome.securities.push(SecurityMerge {
            code,
            primary_rows,
            secondary_rows,
            final_position,
        });
    }

    Ok(outcome)
}
