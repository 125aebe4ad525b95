//! Boundary validation for raw model output. The parsed JSON is untrusted:
//! required keys, the class's label enum and relation-type enum are all
//! checked before anything enters the typed model.

use std::collections::BTreeMap;

use crate::classes::ClassSchema;
use crate::error::ExtractError;
use crate::schema::{Entity, Extraction, Triple};

/// Parse one model response into a validated [`Extraction`].
///
/// Any violation fails the whole document with `Malformed`; the caller logs
/// it and moves on to the next document.
pub fn parse_extraction(raw: &str, schema: &ClassSchema) -> Result<Extraction, ExtractError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| ExtractError::Malformed(format!("response is not valid JSON: {e}")))?;

    let object = value
        .as_object()
        .ok_or_else(|| ExtractError::Malformed("response is not a JSON object".to_string()))?;

    let entities_value = object
        .get("entities")
        .and_then(|v| v.as_array())
        .ok_or_else(|| ExtractError::Malformed("missing `entities` array".to_string()))?;

    let relationships_value = object
        .get("relationships")
        .and_then(|v| v.as_array())
        .ok_or_else(|| ExtractError::Malformed("missing `relationships` array".to_string()))?;

    let mut entities = Vec::with_capacity(entities_value.len());
    for entity_value in entities_value {
        entities.push(parse_entity(entity_value, schema)?);
    }

    let mut relationships = Vec::with_capacity(relationships_value.len());
    for rel_value in relationships_value {
        let raw_triple = rel_value.as_str().ok_or_else(|| {
            ExtractError::Malformed(format!("relationship is not a string: {rel_value}"))
        })?;
        let triple = Triple::parse(raw_triple).ok_or_else(|| {
            ExtractError::Malformed(format!(
                "relationship {raw_triple:?} is not a head|TYPE|tail triple"
            ))
        })?;
        if !schema.relation_types.contains(&triple.rel_type.as_str()) {
            return Err(ExtractError::Malformed(format!(
                "relationship type {:?} is not in the {} schema",
                triple.rel_type, schema.class
            )));
        }
        relationships.push(triple);
    }

    Ok(Extraction {
        entities,
        relationships,
    })
}

fn parse_entity(value: &serde_json::Value, schema: &ClassSchema) -> Result<Entity, ExtractError> {
    let object = value
        .as_object()
        .ok_or_else(|| ExtractError::Malformed(format!("entity is not an object: {value}")))?;

    let label = object
        .get("label")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExtractError::Malformed("entity has no string `label`".to_string()))?;
    if !schema.entity_labels.contains(&label) {
        return Err(ExtractError::Malformed(format!(
            "entity label {:?} is not in the {} schema",
            label, schema.class
        )));
    }

    let id = object
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExtractError::Malformed("entity has no string `id`".to_string()))?;
    if id.trim().is_empty() {
        return Err(ExtractError::Malformed("entity has an empty `id`".to_string()));
    }

    // Attribute vocabulary is trusted from the model; only string-valued
    // fields are kept. Referential integrity is enforced later by the
    // statement compiler.
    let mut attributes = BTreeMap::new();
    for (key, attr_value) in object {
        if key == "label" || key == "id" {
            continue;
        }
        if let Some(s) = attr_value.as_str() {
            attributes.insert(key.clone(), s.to_string());
        }
    }

    Ok(Entity {
        label: label.to_string(),
        id: id.to_string(),
        attributes,
    })
}
