//! Selector terms: conjunctions of requirements.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::materialize::{Materialize, collapse, materialize_opt_list};
use crate::requirement::{LabelSelectorRequirement, SelectorRequirement};
use crate::wire;

/// A conjunction of node-matching clauses.
///
/// Label clauses and field clauses live in separate slots; the slot decides
/// whether a [`SelectorRequirement`] is emitted as `matchExpressions` or
/// `matchFields`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSelectorTerm {
    match_expressions: Option<Vec<SelectorRequirement>>,
    match_fields: Option<Vec<SelectorRequirement>>,
}

impl NodeSelectorTerm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause on node labels.
    pub fn with_expression(mut self, requirement: SelectorRequirement) -> Self {
        self.match_expressions.get_or_insert_with(Vec::new).push(requirement);
        self
    }

    /// Add a clause on node fields (e.g. `metadata.name`).
    pub fn with_field(mut self, requirement: SelectorRequirement) -> Self {
        self.match_fields.get_or_insert_with(Vec::new).push(requirement);
        self
    }

    pub fn expressions(&self) -> Option<&[SelectorRequirement]> {
        self.match_expressions.as_deref()
    }

    pub fn fields(&self) -> Option<&[SelectorRequirement]> {
        self.match_fields.as_deref()
    }
}

impl Materialize for NodeSelectorTerm {
    type Wire = wire::NodeSelectorTerm;

    fn materialize(&self) -> Option<Self::Wire> {
        collapse(wire::NodeSelectorTerm {
            match_expressions: materialize_opt_list(self.match_expressions.as_deref()),
            match_fields: materialize_opt_list(self.match_fields.as_deref()),
        })
    }
}

/// OR together a list of node selector terms. Absent terms are skipped.
pub(crate) fn node_selector(terms: &[NodeSelectorTerm]) -> wire::NodeSelector {
    wire::NodeSelector {
        node_selector_terms: terms.iter().filter_map(Materialize::materialize).collect(),
    }
}

/// A conjunction of pod label clauses.
///
/// `match_labels` is shorthand for a set of `key In (value)` clauses and is
/// forwarded to the wire record alongside `match_expressions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelSelector {
    match_expressions: Option<Vec<LabelSelectorRequirement>>,
    match_labels: Option<BTreeMap<String, String>>,
}

impl LabelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expression(mut self, requirement: LabelSelectorRequirement) -> Self {
        self.match_expressions.get_or_insert_with(Vec::new).push(requirement);
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.match_labels
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_labels<I, K, V>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = self.match_labels.get_or_insert_with(BTreeMap::new);
        map.extend(labels.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn labels(&self) -> Option<&BTreeMap<String, String>> {
        self.match_labels.as_ref()
    }
}

impl Materialize for LabelSelector {
    type Wire = wire::LabelSelector;

    fn materialize(&self) -> Option<Self::Wire> {
        collapse(wire::LabelSelector {
            match_expressions: materialize_opt_list(self.match_expressions.as_deref()),
            match_labels: self.match_labels.clone().filter(|labels| !labels.is_empty()),
        })
    }
}
