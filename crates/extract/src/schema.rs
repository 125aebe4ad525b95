use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A typed, identified node to be merged into the graph.
///
/// `label` comes from the document class's closed label set; `id` is the
/// model-assigned lowercase token used to reference this entity from
/// relationship triples. Everything else the model emitted for the entity
/// lands in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub label: String,
    pub id: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

/// A directed, typed edge reference between two entity ids.
///
/// Serializes as the wire form the model produces: `source|REL_TYPE|target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    pub source: String,
    pub rel_type: String,
    pub target: String,
}

impl Triple {
    /// Parse the `head|RELATION|tail` wire form. Exactly three non-empty
    /// fields are required.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split('|');
        let source = parts.next()?.trim();
        let rel_type = parts.next()?.trim();
        let target = parts.next()?.trim();
        if parts.next().is_some() || source.is_empty() || rel_type.is_empty() || target.is_empty()
        {
            return None;
        }
        Some(Self {
            source: source.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        })
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}|{}", self.source, self.rel_type, self.target)
    }
}

impl Serialize for Triple {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Triple {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Triple::parse(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid relationship triple: {raw:?}")))
    }
}

/// Validated output of one document's extraction. Created once by the
/// validator, persisted as the per-document artifact, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Triple>,
}
