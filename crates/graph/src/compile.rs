//! Batch compilation of validated extractions into graph statements.
//!
//! Two global passes over the whole batch: every entity across every document
//! is indexed before any relationship is resolved, because a triple may
//! reference an entity declared in a different document of the same batch.

use std::collections::HashMap;

use tracing::warn;

use extract::Extraction;

use crate::error::GraphError;
use crate::statement::Statement;

/// Output of one compilation run. `statements` holds every node statement
/// followed by every edge statement; `unresolved` holds the triples whose
/// endpoints never appeared as entities in the batch.
#[derive(Debug, Default)]
pub struct Compiled {
    pub statements: Vec<Statement>,
    pub unresolved: Vec<GraphError>,
}

impl Compiled {
    pub fn node_count(&self) -> usize {
        self.statements.iter().filter(|s| s.is_node()).count()
    }

    pub fn edge_count(&self) -> usize {
        self.statements.len() - self.node_count()
    }
}

/// Strip hyphen/underscore separators from an id. Lowercasing is the model's
/// job, enforced by the prompt; normalization here only collapses the
/// separator variants (`proj-101`, `proj_101`, `proj101`) to one token.
pub fn normalize_id(id: &str) -> String {
    id.chars().filter(|c| *c != '-' && *c != '_').collect()
}

/// Compile a full extraction batch into an ordered statement list.
///
/// Duplicate `(label, id)` entities across documents produce duplicate node
/// statements; they are emitted anyway since MERGE makes them harmless, and
/// the audit artifact should show everything the batch declared.
pub fn compile(batch: &[Extraction]) -> Compiled {
    let mut node_statements = Vec::new();
    let mut edge_statements = Vec::new();
    let mut unresolved = Vec::new();

    // Pass 1: entities. Builds the batch-scoped id -> label index relationship
    // resolution depends on.
    let mut label_index: HashMap<String, String> = HashMap::new();
    for extraction in batch {
        for entity in &extraction.entities {
            let id = normalize_id(&entity.id);
            node_statements.push(Statement::MergeNode {
                label: entity.label.clone(),
                id: id.clone(),
                on_create: entity
                    .attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            });
            label_index.insert(id, entity.label.clone());
        }
    }

    // Pass 2: relationships. A missing endpoint fails that triple only, and
    // loudly; defaulting a label here would corrupt the graph silently.
    for extraction in batch {
        for triple in &extraction.relationships {
            let source_id = normalize_id(&triple.source);
            let target_id = normalize_id(&triple.target);

            let missing = if !label_index.contains_key(&source_id) {
                Some(source_id.clone())
            } else if !label_index.contains_key(&target_id) {
                Some(target_id.clone())
            } else {
                None
            };

            if let Some(missing) = missing {
                let err = GraphError::UnresolvedEndpoint {
                    triple: triple.to_string(),
                    missing,
                };
                warn!(error = %err, "Dropping unresolvable relationship");
                unresolved.push(err);
                continue;
            }

            edge_statements.push(Statement::MergeEdge {
                source_label: label_index[&source_id].clone(),
                source_id,
                rel_type: triple.rel_type.clone(),
                target_label: label_index[&target_id].clone(),
                target_id,
            });
        }
    }

    let mut statements = node_statements;
    statements.extend(edge_statements);

    Compiled {
        statements,
        unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract::{Entity, Triple};
    use std::collections::BTreeMap;

    fn entity(label: &str, id: &str, attrs: &[(&str, &str)]) -> Entity {
        Entity {
            label: label.to_string(),
            id: id.to_string(),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn triple(source: &str, rel: &str, target: &str) -> Triple {
        Triple {
            source: source.to_string(),
            rel_type: rel.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn normalization_strips_separators_deterministically() {
        assert_eq!(normalize_id("proj-101"), "proj101");
        assert_eq!(normalize_id("proj_101"), "proj101");
        assert_eq!(normalize_id("proj101"), "proj101");
        assert_eq!(normalize_id("a-b_c"), "abc");
    }

    #[test]
    fn acme_scenario_compiles_four_nodes_then_three_edges() {
        let extraction = Extraction {
            entities: vec![
                entity("Project", "smartcity", &[("name", "Smart City")]),
                entity("Technology", "ai", &[("name", "AI")]),
                entity("Technology", "iot", &[("name", "IoT")]),
                entity("Client", "acmecorp", &[("name", "Acme Corp")]),
            ],
            relationships: vec![
                triple("smartcity", "USES_TECH", "ai"),
                triple("smartcity", "USES_TECH", "iot"),
                triple("smartcity", "HAS_CLIENT", "acmecorp"),
            ],
        };

        let compiled = compile(&[extraction]);
        assert_eq!(compiled.node_count(), 4);
        assert_eq!(compiled.edge_count(), 3);
        assert!(compiled.unresolved.is_empty());

        let edge = compiled.statements[4].to_cypher();
        assert_eq!(
            edge,
            "MERGE (a:Project {id: \"smartcity\"}) MERGE (b:Technology {id: \"ai\"}) MERGE (a)-[:USES_TECH]->(b)"
        );
    }

    #[test]
    fn all_nodes_precede_all_edges_across_documents() {
        let first = Extraction {
            entities: vec![entity("Person", "alice", &[])],
            relationships: vec![triple("alice", "HAS_SKILLS", "rust")],
        };
        let second = Extraction {
            entities: vec![entity("Technology", "rust", &[])],
            relationships: vec![],
        };

        let compiled = compile(&[first, second]);
        let first_edge = compiled
            .statements
            .iter()
            .position(|s| !s.is_node())
            .unwrap();
        assert!(compiled.statements[..first_edge].iter().all(|s| s.is_node()));
        assert!(compiled.statements[first_edge..].iter().all(|s| !s.is_node()));
    }

    #[test]
    fn cross_document_references_resolve() {
        // The triple lives in the first document; its target entity is only
        // declared in the second.
        let first = Extraction {
            entities: vec![entity("Project", "apigateway", &[])],
            relationships: vec![triple("apigateway", "HAS_PEOPLE", "bobsmith")],
        };
        let second = Extraction {
            entities: vec![entity("Person", "bob_smith", &[])],
            relationships: vec![],
        };

        let compiled = compile(&[first, second]);
        assert_eq!(compiled.edge_count(), 1);
        assert!(compiled.unresolved.is_empty());
    }

    #[test]
    fn unresolved_endpoint_drops_the_triple_and_records_it() {
        let extraction = Extraction {
            entities: vec![entity("Project", "p1", &[])],
            relationships: vec![
                triple("p1", "USES_TECH", "ghost"),
                triple("p1", "HAS_CLIENT", "p1"),
            ],
        };

        let compiled = compile(&[extraction]);
        assert_eq!(compiled.edge_count(), 1);
        assert_eq!(compiled.unresolved.len(), 1);
        match &compiled.unresolved[0] {
            GraphError::UnresolvedEndpoint { missing, .. } => assert_eq!(missing, "ghost"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_entities_are_emitted_for_every_occurrence() {
        let first = Extraction {
            entities: vec![entity("Technology", "ai", &[("name", "AI")])],
            relationships: vec![],
        };
        let second = Extraction {
            entities: vec![entity("Technology", "ai", &[])],
            relationships: vec![],
        };

        let compiled = compile(&[first, second]);
        assert_eq!(compiled.node_count(), 2);
    }

    #[test]
    fn endpoint_ids_are_normalized_before_lookup() {
        let extraction = Extraction {
            entities: vec![
                entity("Project", "proj-101", &[]),
                entity("Technology", "ai", &[]),
            ],
            relationships: vec![triple("proj_101", "USES_TECH", "ai")],
        };

        let compiled = compile(&[extraction]);
        assert_eq!(compiled.edge_count(), 1);
        assert!(compiled.statements.iter().any(
            |s| s.to_cypher().contains("a:Project {id: \"proj101\"}")
        ));
    }
}
