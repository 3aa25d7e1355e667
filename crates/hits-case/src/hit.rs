//! Flag records produced by rule-set matching

use crate::EntityId;
use serde::{Deserialize, Serialize};

/// Attribute type of a hit record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// `value` is the rule-set name and `context` its description
    SetName,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitAttribute {
    pub kind: AttributeKind,
    pub value: String,
    #[serde(default)]
    pub context: String,
}

/// One flag record: an entity flagged by zero or more rule-sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitRecord {
    pub artifact_id: u64,
    pub file_id: EntityId,
    #[serde(default)]
    pub attributes: Vec<HitAttribute>,
}

impl HitRecord {
    /// Build a record carrying a single set-name attribute.
    pub fn flagged(
        artifact_id: u64,
        file_id: EntityId,
        set_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            artifact_id,
            file_id,
            attributes: vec![HitAttribute {
                kind: AttributeKind::SetName,
                value: set_name.into(),
                context: description.into(),
            }],
        }
    }

    /// `(name, description)` of every set-name attribute, in record order.
    pub fn set_names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .filter(|attr| attr.kind == AttributeKind::SetName)
            .map(|attr| (attr.value.as_str(), attr.context.as_str()))
    }
}
