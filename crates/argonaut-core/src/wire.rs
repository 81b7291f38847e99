//! Wire model for the Argo/Kubernetes affinity schema.
//!
//! These records mirror the JSON the orchestrator accepts field for field.
//! Every optional field is skipped when `None`, so a serialized record never
//! carries `null` placeholders. Values are produced by the builder tree in
//! [`crate::affinity`] and friends; callers rarely construct them by hand.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::requirement::{LabelOperator, NodeSelectorOperator};

/// Root affinity record attached to a workflow or template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affinity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_affinity: Option<NodeAffinity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_affinity: Option<PodAffinity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_anti_affinity: Option<PodAntiAffinity>,
}

// ── Node affinity ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAffinity {
    #[serde(
        rename = "preferredDuringSchedulingIgnoredDuringExecution",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred: Option<Vec<PreferredSchedulingTerm>>,
    #[serde(
        rename = "requiredDuringSchedulingIgnoredDuringExecution",
        skip_serializing_if = "Option::is_none"
    )]
    pub required: Option<NodeSelector>,
}

/// A list of node selector terms, OR'd together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSelector {
    pub node_selector_terms: Vec<NodeSelectorTerm>,
}

/// A conjunction of node selector requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSelectorTerm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_expressions: Option<Vec<NodeSelectorRequirement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_fields: Option<Vec<NodeSelectorRequirement>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSelectorRequirement {
    pub key: String,
    pub operator: NodeSelectorOperator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferredSchedulingTerm {
    pub weight: i32,
    pub preference: NodeSelector,
}

// ── Pod affinity ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodAffinity {
    #[serde(
        rename = "preferredDuringSchedulingIgnoredDuringExecution",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred: Option<Vec<WeightedPodAffinityTerm>>,
    #[serde(
        rename = "requiredDuringSchedulingIgnoredDuringExecution",
        skip_serializing_if = "Option::is_none"
    )]
    pub required: Option<Vec<PodAffinityTerm>>,
}

/// Same shape as [`PodAffinity`]; kept distinct so the two cannot be swapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodAntiAffinity {
    #[serde(
        rename = "preferredDuringSchedulingIgnoredDuringExecution",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred: Option<Vec<WeightedPodAffinityTerm>>,
    #[serde(
        rename = "requiredDuringSchedulingIgnoredDuringExecution",
        skip_serializing_if = "Option::is_none"
    )]
    pub required: Option<Vec<PodAffinityTerm>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedPodAffinityTerm {
    pub weight: i32,
    pub pod_affinity_term: PodAffinityTerm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodAffinityTerm {
    pub topology_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<LabelSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<LabelSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_expressions: Option<Vec<LabelSelectorRequirement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_labels: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelectorRequirement {
    pub key: String,
    pub operator: LabelOperator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

// Records whose fields are all optional collapse to absent when empty.
crate::materialize::impl_sparse!(Affinity { node_affinity, pod_affinity, pod_anti_affinity });
crate::materialize::impl_sparse!(NodeAffinity { preferred, required });
crate::materialize::impl_sparse!(PodAffinity { preferred, required });
crate::materialize::impl_sparse!(PodAntiAffinity { preferred, required });
crate::materialize::impl_sparse!(NodeSelectorTerm { match_expressions, match_fields });
crate::materialize::impl_sparse!(LabelSelector { match_expressions, match_labels });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_affinity_uses_schema_field_names() {
        let affinity = NodeAffinity {
            preferred: None,
            required: Some(NodeSelector {
                node_selector_terms: vec![NodeSelectorTerm {
                    match_expressions: Some(vec![NodeSelectorRequirement {
                        key: "zone".to_string(),
                        operator: NodeSelectorOperator::In,
                        values: Some(vec!["zone-a".to_string()]),
                    }]),
                    match_fields: None,
                }],
            }),
        };

        let json = serde_json::to_value(&affinity).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "requiredDuringSchedulingIgnoredDuringExecution": {
                    "nodeSelectorTerms": [{
                        "matchExpressions": [{
                            "key": "zone",
                            "operator": "In",
                            "values": ["zone-a"]
                        }]
                    }]
                }
            })
        );
    }

    #[test]
    fn parses_kubernetes_pod_anti_affinity() {
        let json = r#"{
            "podAntiAffinity": {
                "preferredDuringSchedulingIgnoredDuringExecution": [{
                    "weight": 100,
                    "podAffinityTerm": {
                        "topologyKey": "kubernetes.io/hostname",
                        "labelSelector": {
                            "matchExpressions": [
                                {"key": "app", "operator": "In", "values": ["web"]}
                            ]
                        }
                    }
                }]
            }
        }"#;

        let affinity: Affinity = serde_json::from_str(json).unwrap();
        let anti = affinity.pod_anti_affinity.unwrap();
        let preferred = anti.preferred.unwrap();
        assert_eq!(preferred[0].weight, 100);
        assert_eq!(preferred[0].pod_affinity_term.topology_key, "kubernetes.io/hostname");
        assert!(anti.required.is_none());
        assert!(affinity.node_affinity.is_none());
    }
}
