//! Scheduling terms: topology-scoped pod rules and weighted preferences.

use std::fmt;

use serde::Deserialize;

use crate::error::{AffinityError, AffinityResult};
use crate::materialize::{Materialize, materialize_opt};
use crate::selector::{LabelSelector, NodeSelectorTerm, node_selector};
use crate::wire;

/// Well-known topology key for per-node scoping.
pub const HOSTNAME_TOPOLOGY_KEY: &str = "kubernetes.io/hostname";

/// Well-known topology key for per-zone scoping.
pub const ZONE_TOPOLOGY_KEY: &str = "topology.kubernetes.io/zone";

/// Node label key that defines the co-location domain of a pod rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct TopologyKey(String);

impl TopologyKey {
    pub fn new(key: impl Into<String>) -> AffinityResult<Self> {
        Self::try_from(key.into())
    }

    pub fn hostname() -> Self {
        Self(HOSTNAME_TOPOLOGY_KEY.to_string())
    }

    pub fn zone() -> Self {
        Self(ZONE_TOPOLOGY_KEY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TopologyKey {
    type Error = AffinityError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        if key.trim().is_empty() {
            return Err(AffinityError::EmptyTopologyKey);
        }
        Ok(Self(key))
    }
}

impl fmt::Display for TopologyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Pod affinity term ───────────────────────────────────────────────

/// Co-locate with (or away from) pods matching the selectors, within the
/// domain named by the topology key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PodAffinityTerm {
    topology_key: TopologyKey,
    label_selector: Option<LabelSelector>,
    namespace_selector: Option<LabelSelector>,
    namespaces: Option<Vec<String>>,
}

impl PodAffinityTerm {
    pub fn new(topology_key: impl Into<String>) -> AffinityResult<Self> {
        Ok(Self::with_topology(TopologyKey::new(topology_key)?))
    }

    pub fn with_topology(topology_key: TopologyKey) -> Self {
        Self {
            topology_key,
            label_selector: None,
            namespace_selector: None,
            namespaces: None,
        }
    }

    pub fn with_label_selector(mut self, selector: LabelSelector) -> Self {
        self.label_selector = Some(selector);
        self
    }

    pub fn with_namespace_selector(mut self, selector: LabelSelector) -> Self {
        self.namespace_selector = Some(selector);
        self
    }

    pub fn with_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespaces = Some(namespaces.into_iter().map(Into::into).collect());
        self
    }

    pub fn topology_key(&self) -> &TopologyKey {
        &self.topology_key
    }

    /// The topology key is mandatory, so this record is never absent.
    pub fn to_wire(&self) -> wire::PodAffinityTerm {
        wire::PodAffinityTerm {
            topology_key: self.topology_key.to_string(),
            label_selector: materialize_opt(self.label_selector.as_ref()),
            namespace_selector: materialize_opt(self.namespace_selector.as_ref()),
            namespaces: self.namespaces.clone(),
        }
    }
}

impl Materialize for PodAffinityTerm {
    type Wire = wire::PodAffinityTerm;

    fn materialize(&self) -> Option<Self::Wire> {
        Some(self.to_wire())
    }
}

// ── Weighted preferences ────────────────────────────────────────────

/// A soft pod-affinity rule. Weight is conventionally 1..=100 and is passed
/// through unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightedPodAffinityTerm {
    weight: i32,
    pod_affinity_term: PodAffinityTerm,
}

impl WeightedPodAffinityTerm {
    pub fn new(weight: i32, pod_affinity_term: PodAffinityTerm) -> Self {
        Self {
            weight,
            pod_affinity_term,
        }
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    pub fn to_wire(&self) -> wire::WeightedPodAffinityTerm {
        wire::WeightedPodAffinityTerm {
            weight: self.weight,
            pod_affinity_term: self.pod_affinity_term.to_wire(),
        }
    }
}

impl Materialize for WeightedPodAffinityTerm {
    type Wire = wire::WeightedPodAffinityTerm;

    fn materialize(&self) -> Option<Self::Wire> {
        Some(self.to_wire())
    }
}

/// A soft node preference. The weight applies to the whole term list, which
/// is OR'd into a single node selector.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreferredSchedulingTerm {
    weight: i32,
    node_selector_terms: Vec<NodeSelectorTerm>,
}

impl PreferredSchedulingTerm {
    pub fn new(weight: i32, node_selector_terms: Vec<NodeSelectorTerm>) -> Self {
        Self {
            weight,
            node_selector_terms,
        }
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    pub fn to_wire(&self) -> wire::PreferredSchedulingTerm {
        wire::PreferredSchedulingTerm {
            weight: self.weight,
            preference: node_selector(&self.node_selector_terms),
        }
    }
}

impl Materialize for PreferredSchedulingTerm {
    type Wire = wire::PreferredSchedulingTerm;

    fn materialize(&self) -> Option<Self::Wire> {
        Some(self.to_wire())
    }
}
