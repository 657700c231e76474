//! Merge configuration.
//!
//! Defaults target the FURS eDavki `Doh_KDVP_9` schema. A TOML file can override any field;
//! missing keys keep their defaults and unknown keys are rejected.

use std::path::Path;

use edavki_xml::NamespaceBindings;
use serde::{Deserialize, Serialize};

use crate::error::MergeError;
use crate::namespace::NamespaceRules;

pub const KDVP_NAMESPACE: &str = "http://edavki.durs.si/Documents/Schemas/Doh_KDVP_9.xsd";
pub const EDP_NAMESPACE: &str = "http://edavki.durs.si/Documents/Schemas/EDP-Common-1.xsd";

/// Envelope elements that belong to the `edp` namespace.
pub const EDP_TAGS: &[&str] = &[
    "Header",
    "taxpayer",
    "taxNumber",
    "taxpayerType",
    "Workflow",
    "AttachmentList",
    "Signatures",
    "bodyContent",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    /// Default namespace of the output document.
    pub primary_namespace: String,
    pub edp_namespace: String,
    pub edp_prefix: String,
    pub edp_tags: Vec<String>,
    /// Parent tag under which `workflow_id_tag` takes the edp namespace.
    pub workflow_tag: String,
    pub workflow_id_tag: String,
    /// Broker name of the primary document, used in the side reports.
    pub primary_label: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            primary_namespace: KDVP_NAMESPACE.to_string(),
            edp_namespace: EDP_NAMESPACE.to_string(),
            edp_prefix: "edp".to_string(),
            edp_tags: EDP_TAGS.iter().map(|t| t.to_string()).collect(),
            workflow_tag: "Workflow".to_string(),
            workflow_id_tag: "DocumentWorkflowID".to_string(),
            primary_label: "eToro".to_string(),
        }
    }
}

impl MergeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, MergeError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MergeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| MergeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded merge config");
        Ok(config)
    }

    /// Bindings the writer declares on the output root.
    pub fn bindings(&self) -> NamespaceBindings {
        NamespaceBindings::new()
            .with_default(&self.primary_namespace)
            .with_prefix(&self.edp_prefix, &self.edp_namespace)
    }

    pub fn rules(&self) -> NamespaceRules {
        NamespaceRules::new(
            self.primary_namespace.clone(),
            self.edp_namespace.clone(),
            self.edp_tags.iter().cloned(),
            self.workflow_tag.clone(),
            self.workflow_id_tag.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_edavki_schema() {
        let config = MergeConfig::default();
        assert_eq!(config.primary_namespace, KDVP_NAMESPACE);
        assert_eq!(config.edp_namespace, EDP_NAMESPACE);
        assert_eq!(config.edp_tags.len(), 8);
        assert_eq!(config.primary_label, "eToro");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = MergeConfig::from_toml_str(
            r#"
primary_label = "Revolut"
edp_tags = ["Header", "Workflow"]
"#,
        )
        .unwrap();
        assert_eq!(config.primary_label, "Revolut");
        assert_eq!(config.edp_tags, vec!["Header", "Workflow"]);
        assert_eq!(config.edp_namespace, EDP_NAMESPACE);
        assert_eq!(config.workflow_id_tag, "DocumentWorkflowID");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(MergeConfig::from_toml_str("").unwrap(), MergeConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = MergeConfig::from_toml_str("primary_lable = \"typo\"");
        assert!(matches!(result.unwrap_err(), MergeError::Config(_)));
    }

    #[test]
    fn test_bindings_declare_default_and_edp() {
        let bindings = MergeConfig::default().bindings();
        assert_eq!(bindings.default_namespace(), Some(KDVP_NAMESPACE));
        assert_eq!(bindings.prefix_for(EDP_NAMESPACE), Some("edp"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MergeConfig::load(dir.path().join("merge.toml")).unwrap_err();
        assert!(matches!(err, MergeError::Io { .. }));
    }
}
