//! Primitive match clauses: node selector and label selector requirements.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AffinityError, AffinityResult};
use crate::materialize::Materialize;
use crate::wire;

/// Operator for a pod label selector requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelOperator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

impl LabelOperator {
    /// The literal wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelOperator::In => "In",
            LabelOperator::NotIn => "NotIn",
            LabelOperator::Exists => "Exists",
            LabelOperator::DoesNotExist => "DoesNotExist",
        }
    }
}

impl fmt::Display for LabelOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator for a node selector requirement.
///
/// Superset of [`LabelOperator`]: node selectors can also compare a label
/// value numerically with `Gt` / `Lt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeSelectorOperator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
    Gt,
    Lt,
}

impl NodeSelectorOperator {
    /// The literal wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeSelectorOperator::In => "In",
            NodeSelectorOperator::NotIn => "NotIn",
            NodeSelectorOperator::Exists => "Exists",
            NodeSelectorOperator::DoesNotExist => "DoesNotExist",
            NodeSelectorOperator::Gt => "Gt",
            NodeSelectorOperator::Lt => "Lt",
        }
    }

    /// Whether a clause with this operator is meaningless without values.
    pub fn takes_values(&self) -> bool {
        !matches!(self, NodeSelectorOperator::Exists | NodeSelectorOperator::DoesNotExist)
    }
}

impl fmt::Display for NodeSelectorOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LabelOperator> for NodeSelectorOperator {
    fn from(op: LabelOperator) -> Self {
        match op {
            LabelOperator::In => NodeSelectorOperator::In,
            LabelOperator::NotIn => NodeSelectorOperator::NotIn,
            LabelOperator::Exists => NodeSelectorOperator::Exists,
            LabelOperator::DoesNotExist => NodeSelectorOperator::DoesNotExist,
        }
    }
}

/// A non-empty label (or field) key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct LabelKey(String);

impl LabelKey {
    pub fn new(key: impl Into<String>) -> AffinityResult<Self> {
        Self::try_from(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LabelKey {
    type Error = AffinityError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        if key.trim().is_empty() {
            return Err(AffinityError::EmptyKey);
        }
        Ok(Self(key))
    }
}

impl fmt::Display for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Node selector requirement ───────────────────────────────────────

/// One match clause of a [`NodeSelectorTerm`](crate::NodeSelectorTerm).
///
/// Whether it matches node labels or node fields is decided by the slot of
/// the term it is placed in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectorRequirement {
    key: LabelKey,
    operator: NodeSelectorOperator,
    values: Option<Vec<String>>,
}

impl SelectorRequirement {
    /// A requirement without values. Only `Exists` / `DoesNotExist` produce
    /// output in this state; other operators stay absent until values are set.
    pub fn new(key: impl Into<String>, operator: NodeSelectorOperator) -> AffinityResult<Self> {
        Ok(Self {
            key: LabelKey::new(key)?,
            operator,
            values: None,
        })
    }

    /// `key In (values...)`.
    pub fn is_in<I, S>(key: impl Into<String>, values: I) -> AffinityResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::new(key, NodeSelectorOperator::In)?.with_values(values))
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn key(&self) -> &LabelKey {
        &self.key
    }

    pub fn operator(&self) -> NodeSelectorOperator {
        self.operator
    }

    pub fn values(&self) -> Option<&[String]> {
        self.values.as_deref()
    }
}

impl Materialize for SelectorRequirement {
    type Wire = wire::NodeSelectorRequirement;

    fn materialize(&self) -> Option<Self::Wire> {
        if self.values.is_none() && self.operator.takes_values() {
            return None;
        }
        Some(wire::NodeSelectorRequirement {
            key: self.key.to_string(),
            operator: self.operator,
            values: self.values.clone(),
        })
    }
}

// ── Label selector requirement ──────────────────────────────────────

/// A key/operator/values clause matching pod labels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelSelectorRequirement {
    key: LabelKey,
    operator: LabelOperator,
    values: Option<Vec<String>>,
}

impl LabelSelectorRequirement {
    pub fn new(key: impl Into<String>, operator: LabelOperator) -> AffinityResult<Self> {
        Ok(Self {
            key: LabelKey::new(key)?,
            operator,
            values: None,
        })
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn key(&self) -> &LabelKey {
        &self.key
    }

    pub fn operator(&self) -> LabelOperator {
        self.operator
    }

    /// Key and operator are mandatory, so this record is never absent.
    pub fn to_wire(&self) -> wire::LabelSelectorRequirement {
        wire::LabelSelectorRequirement {
            key: self.key.to_string(),
            operator: self.operator,
            values: self.values.clone(),
        }
    }
}

impl Materialize for LabelSelectorRequirement {
    type Wire = wire::LabelSelectorRequirement;

    fn materialize(&self) -> Option<Self::Wire> {
        Some(self.to_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_operators_serialize_to_literals() {
        let cases = [
            (LabelOperator::In, "In"),
            (LabelOperator::NotIn, "NotIn"),
            (LabelOperator::Exists, "Exists"),
            (LabelOperator::DoesNotExist, "DoesNotExist"),
        ];
        for (op, literal) in cases {
            assert_eq!(serde_json::to_value(op).unwrap(), serde_json::json!(literal));
            assert_eq!(op.as_str(), literal);
            assert_eq!(op.to_string(), literal);
        }
    }

    #[test]
    fn node_operators_include_numeric_comparisons() {
        assert_eq!(serde_json::to_value(NodeSelectorOperator::Gt).unwrap(), "Gt");
        assert_eq!(serde_json::to_value(NodeSelectorOperator::Lt).unwrap(), "Lt");
        assert_eq!(NodeSelectorOperator::from(LabelOperator::NotIn), NodeSelectorOperator::NotIn);
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(
            SelectorRequirement::new("", NodeSelectorOperator::Exists),
            Err(AffinityError::EmptyKey)
        ));
        assert!(matches!(
            LabelSelectorRequirement::new("  ", LabelOperator::In),
            Err(AffinityError::EmptyKey)
        ));
    }

    #[test]
    fn selector_requirement_without_values_is_absent() {
        let req = SelectorRequirement::new("zone", NodeSelectorOperator::In).unwrap();
        assert!(req.materialize().is_none());
    }

    #[test]
    fn selector_requirement_carries_values() {
        let req = SelectorRequirement::is_in("zone", ["zone-a", "zone-b"]).unwrap();
        let wire = req.materialize().unwrap();
        assert_eq!(wire.key, "zone");
        assert_eq!(wire.operator, NodeSelectorOperator::In);
        assert_eq!(wire.values, Some(vec!["zone-a".to_string(), "zone-b".to_string()]));
    }

    #[test]
    fn existence_check_needs_no_values() {
        let req = SelectorRequirement::new("gpu", NodeSelectorOperator::Exists).unwrap();
        let json = serde_json::to_value(req.materialize().unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"key": "gpu", "operator": "Exists"}));
    }

    #[test]
    fn label_requirement_is_always_present() {
        let req = LabelSelectorRequirement::new("app", LabelOperator::NotIn)
            .unwrap()
            .with_values(["db"]);
        let json = serde_json::to_value(req.materialize().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"key": "app", "operator": "NotIn", "values": ["db"]})
        );

        let bare = LabelSelectorRequirement::new("app", LabelOperator::Exists).unwrap();
        assert!(bare.materialize().is_some());
    }

    #[test]
    fn deserializes_from_toml() {
        let req: LabelSelectorRequirement = toml::from_str(
            r#"
key = "tier"
operator = "In"
values = ["frontend"]
"#,
        )
        .unwrap();
        assert_eq!(req.key().as_str(), "tier");
        assert_eq!(req.operator(), LabelOperator::In);
    }

    #[test]
    fn deserializing_empty_key_fails() {
        let result: Result<LabelSelectorRequirement, _> = toml::from_str(
            r#"
key = ""
operator = "Exists"
"#,
        );
        assert!(result.is_err());
    }
}
