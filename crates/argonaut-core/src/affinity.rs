//! Root of the scheduling constraint tree.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::category::{NodeAffinity, PodAffinity, PodAntiAffinity};
use crate::error::AffinityResult;
use crate::materialize::{Materialize, collapse, materialize_opt};
use crate::wire;

/// The full set of scheduling constraints attached to a workload.
///
/// Can be built in code or loaded from TOML:
///
/// ```toml
/// [[node_affinity.required]]
/// match_expressions = [{ key = "zone", operator = "In", values = ["zone-a"] }]
///
/// [[pod_anti_affinity.preferred]]
/// weight = 100
/// pod_affinity_term = { topology_key = "kubernetes.io/hostname" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Affinity {
    node_affinity: Option<NodeAffinity>,
    pod_affinity: Option<PodAffinity>,
    pod_anti_affinity: Option<PodAntiAffinity>,
}

impl Affinity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_affinity(mut self, node_affinity: NodeAffinity) -> Self {
        self.node_affinity = Some(node_affinity);
        self
    }

    pub fn with_pod_affinity(mut self, pod_affinity: PodAffinity) -> Self {
        self.pod_affinity = Some(pod_affinity);
        self
    }

    pub fn with_pod_anti_affinity(mut self, pod_anti_affinity: PodAntiAffinity) -> Self {
        self.pod_anti_affinity = Some(pod_anti_affinity);
        self
    }

    pub fn from_toml_str(content: &str) -> AffinityResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> AffinityResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl Materialize for Affinity {
    type Wire = wire::Affinity;

    fn materialize(&self) -> Option<Self::Wire> {
        let wire = collapse(wire::Affinity {
            node_affinity: materialize_opt(self.node_affinity.as_ref()),
            pod_affinity: materialize_opt(self.pod_affinity.as_ref()),
            pod_anti_affinity: materialize_opt(self.pod_anti_affinity.as_ref()),
        });
        if wire.is_none() {
            debug!("affinity has no constraints to submit");
        }
        wire
    }
}
