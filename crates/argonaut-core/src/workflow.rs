//! Minimal Argo `Workflow` manifest.
//!
//! Only the fields this crate reads or writes are typed. Everything else at
//! the top level, in `metadata` (annotations, owner references, ...) and in
//! `spec` (templates, arguments, volumes, ...) is carried through untouched,
//! so a manifest loaded from JSON serializes back the same way.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::affinity::Affinity;
use crate::materialize::Materialize;
use crate::wire;

pub const WORKFLOW_API_VERSION: &str = "argoproj.io/v1alpha1";
pub const WORKFLOW_KIND: &str = "Workflow";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: WorkflowSpec,
    /// Populated by the server on responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<wire::Affinity>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_selector: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of `POST /api/v1/workflows/{namespace}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowCreateRequest {
    pub namespace: String,
    pub workflow: Workflow,
}

fn default_api_version() -> String {
    WORKFLOW_API_VERSION.to_string()
}

fn default_kind() -> String {
    WORKFLOW_KIND.to_string()
}

impl Default for Workflow {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: ObjectMeta::default(),
            spec: WorkflowSpec::default(),
            status: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl Workflow {
    /// A workflow whose name is generated server-side from `prefix`.
    pub fn generated(prefix: impl Into<String>, entrypoint: impl Into<String>) -> Self {
        let mut workflow = Self::default();
        workflow.metadata.generate_name = Some(prefix.into());
        workflow.spec.entrypoint = Some(entrypoint.into());
        workflow
    }

    /// Replace the workflow-level affinity. An affinity that materializes to
    /// nothing clears the field.
    pub fn with_affinity(mut self, affinity: &Affinity) -> Self {
        self.spec.affinity = affinity.materialize();
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.metadata.namespace = Some(namespace.into());
        self
    }

    pub fn from_json_str(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// The name, falling back to the generate-name prefix.
    pub fn display_name(&self) -> &str {
        self.metadata
            .name
            .as_deref()
            .or(self.metadata.generate_name.as_deref())
            .unwrap_or("<unnamed>")
    }
}

impl WorkflowCreateRequest {
    pub fn new(namespace: impl Into<String>, workflow: Workflow) -> Self {
        Self {
            namespace: namespace.into(),
            workflow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::PodAntiAffinity;
    use crate::term::{PodAffinityTerm, TopologyKey};

    #[test]
    fn generated_workflow_serializes_header() {
        let wf = Workflow::generated("hello-", "main");
        let json = serde_json::to_value(&wf).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "apiVersion": "argoproj.io/v1alpha1",
                "kind": "Workflow",
                "metadata": {"generateName": "hello-"},
                "spec": {"entrypoint": "main"}
            })
        );
    }

    #[test]
    fn attaches_materialized_affinity() {
        let affinity = Affinity::new().with_pod_anti_affinity(
            PodAntiAffinity::new().with_required(PodAffinityTerm::with_topology(TopologyKey::hostname())),
        );
        let wf = Workflow::generated("spread-", "main").with_affinity(&affinity);

        let json = serde_json::to_value(&wf).unwrap();
        assert_eq!(
            json["spec"]["affinity"],
            serde_json::json!({
                "podAntiAffinity": {
                    "requiredDuringSchedulingIgnoredDuringExecution": [
                        {"topologyKey": "kubernetes.io/hostname"}
                    ]
                }
            })
        );
    }

    #[test]
    fn empty_affinity_clears_field() {
        let affinity = Affinity::new().with_pod_anti_affinity(
            PodAntiAffinity::new().with_required(PodAffinityTerm::with_topology(TopologyKey::zone())),
        );
        let wf = Workflow::generated("a-", "main")
            .with_affinity(&affinity)
            .with_affinity(&Affinity::new());

        assert!(wf.spec.affinity.is_none());
        let json = serde_json::to_value(&wf).unwrap();
        assert!(json["spec"].get("affinity").is_none());
    }

    #[test]
    fn unknown_spec_fields_survive() {
        let json = r#"{
            "metadata": {"name": "steps"},
            "spec": {
                "entrypoint": "main",
                "templates": [{"name": "main", "container": {"image": "alpine"}}],
                "serviceAccountName": "runner"
            }
        }"#;

        let wf = Workflow::from_json_str(json).unwrap();
        assert_eq!(wf.api_version, WORKFLOW_API_VERSION);
        assert_eq!(wf.kind, WORKFLOW_KIND);
        assert_eq!(wf.display_name(), "steps");
        assert!(wf.spec.extra.contains_key("templates"));

        let back = serde_json::to_value(&wf).unwrap();
        assert_eq!(back["spec"]["serviceAccountName"], "runner");
        assert_eq!(back["spec"]["templates"][0]["container"]["image"], "alpine");
    }

    #[test]
    fn untyped_metadata_and_top_level_fields_survive() {
        let json = serde_json::json!({
            "apiVersion": "argoproj.io/v1alpha1",
            "kind": "Workflow",
            "metadata": {
                "name": "x",
                "annotations": {"owner": "team-a"},
                "ownerReferences": [{"kind": "CronWorkflow", "name": "nightly"}]
            },
            "spec": {},
            "x-custom": true
        });

        let wf: Workflow = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(wf.metadata.extra["annotations"]["owner"], "team-a");
        assert_eq!(serde_json::to_value(&wf).unwrap(), json);
    }

    #[test]
    fn create_request_shape() {
        let req = WorkflowCreateRequest::new("argo", Workflow::generated("x-", "main").with_namespace("argo"));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["namespace"], "argo");
        assert_eq!(json["workflow"]["metadata"]["namespace"], "argo");
    }
}
