//! argonaut-core — typed scheduling constraints for Argo workflows.
//!
//! Callers describe node affinity, pod affinity and pod anti-affinity with
//! small builder types, then [`Materialize::materialize`] the tree into the
//! [`wire`] records the Argo API expects. Empty branches are pruned on the
//! way up: a node that produced nothing is left out of its parent, and a
//! tree with no constraints at all materializes to `None`.
//!
//! # Components
//!
//! - **`requirement`** — match clauses and their operators
//! - **`selector`** — node selector terms and label selectors
//! - **`term`** — pod affinity terms and weighted preferences
//! - **`category`** — node / pod / pod-anti affinity buckets
//! - **`affinity`** — the root, loadable from TOML
//! - **`workflow`** — the workflow manifest the affinity is attached to

pub mod affinity;
pub mod category;
pub mod error;
pub mod materialize;
pub mod requirement;
pub mod selector;
pub mod term;
pub mod wire;
pub mod workflow;

pub use affinity::Affinity;
pub use category::{NodeAffinity, PodAffinity, PodAntiAffinity};
pub use error::{AffinityError, AffinityResult};
pub use materialize::Materialize;
pub use requirement::{
    LabelKey, LabelOperator, LabelSelectorRequirement, NodeSelectorOperator, SelectorRequirement,
};
pub use selector::{LabelSelector, NodeSelectorTerm};
pub use term::{
    HOSTNAME_TOPOLOGY_KEY, PodAffinityTerm, PreferredSchedulingTerm, TopologyKey,
    WeightedPodAffinityTerm, ZONE_TOPOLOGY_KEY,
};
pub use workflow::{ObjectMeta, Workflow, WorkflowCreateRequest, WorkflowSpec};
