//! Affinity categories: node affinity, pod affinity, pod anti-affinity.
//!
//! Each category holds a soft ("preferred") and a hard ("required") bucket.
//! A category is absent when both buckets materialize to nothing.

use serde::Deserialize;

use crate::materialize::{Materialize, collapse, materialize_opt_list};
use crate::selector::{NodeSelectorTerm, node_selector};
use crate::term::{PodAffinityTerm, PreferredSchedulingTerm, WeightedPodAffinityTerm};
use crate::wire;

/// Constraints on which nodes a workload may land on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeAffinity {
    #[serde(alias = "preferred_during_scheduling_ignored_during_execution")]
    preferred: Option<Vec<PreferredSchedulingTerm>>,
    /// Terms OR'd into one node selector.
    #[serde(alias = "required_during_scheduling_ignored_during_execution")]
    required: Option<Vec<NodeSelectorTerm>>,
}

impl NodeAffinity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferred(mut self, term: PreferredSchedulingTerm) -> Self {
        self.preferred.get_or_insert_with(Vec::new).push(term);
        self
    }

    /// Add a term to the required selector. A node must match at least one
    /// required term.
    pub fn with_required(mut self, term: NodeSelectorTerm) -> Self {
        self.required.get_or_insert_with(Vec::new).push(term);
        self
    }
}

impl Materialize for NodeAffinity {
    type Wire = wire::NodeAffinity;

    fn materialize(&self) -> Option<Self::Wire> {
        let required = self
            .required
            .as_deref()
            .map(node_selector)
            .filter(|selector| !selector.node_selector_terms.is_empty());

        collapse(wire::NodeAffinity {
            preferred: materialize_opt_list(self.preferred.as_deref()),
            required,
        })
    }
}

/// Buckets shared by pod affinity and pod anti-affinity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct PodRules {
    #[serde(alias = "preferred_during_scheduling_ignored_during_execution")]
    preferred: Option<Vec<WeightedPodAffinityTerm>>,
    /// Independent terms; each one must hold.
    #[serde(alias = "required_during_scheduling_ignored_during_execution")]
    required: Option<Vec<PodAffinityTerm>>,
}

type PodRulesWire = (
    Option<Vec<wire::WeightedPodAffinityTerm>>,
    Option<Vec<wire::PodAffinityTerm>>,
);

impl PodRules {
    fn push_preferred(&mut self, term: WeightedPodAffinityTerm) {
        self.preferred.get_or_insert_with(Vec::new).push(term);
    }

    fn push_required(&mut self, term: PodAffinityTerm) {
        self.required.get_or_insert_with(Vec::new).push(term);
    }

    fn materialize_parts(&self) -> PodRulesWire {
        (
            materialize_opt_list(self.preferred.as_deref()),
            materialize_opt_list(self.required.as_deref()),
        )
    }
}

/// Schedule near pods matching the given terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PodAffinity(PodRules);

impl PodAffinity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferred(mut self, term: WeightedPodAffinityTerm) -> Self {
        self.0.push_preferred(term);
        self
    }

    pub fn with_required(mut self, term: PodAffinityTerm) -> Self {
        self.0.push_required(term);
        self
    }
}

impl Materialize for PodAffinity {
    type Wire = wire::PodAffinity;

    fn materialize(&self) -> Option<Self::Wire> {
        let (preferred, required) = self.0.materialize_parts();
        collapse(wire::PodAffinity { preferred, required })
    }
}

/// Schedule away from pods matching the given terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PodAntiAffinity(PodRules);

impl PodAntiAffinity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferred(mut self, term: WeightedPodAffinityTerm) -> Self {
        self.0.push_preferred(term);
        self
    }

    pub fn with_required(mut self, term: PodAffinityTerm) -> Self {
        self.0.push_required(term);
        self
    }
}

impl Materialize for PodAntiAffinity {
    type Wire = wire::PodAntiAffinity;

    fn materialize(&self) -> Option<Self::Wire> {
        let (preferred, required) = self.0.materialize_parts();
        collapse(wire::PodAntiAffinity { preferred, required })
    }
}
