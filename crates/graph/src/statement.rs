//! Idempotent graph mutation statements. Every statement renders as a single
//! line of Cypher built entirely from MERGE clauses, so replaying a statement
//! (or a whole batch) leaves the graph unchanged.

/// One upsert against the graph store.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Merge a node by `(label, id)`. Attributes are set only on first
    /// creation, so a later re-extraction never overwrites an earlier,
    /// possibly more complete one.
    MergeNode {
        label: String,
        id: String,
        on_create: Vec<(String, String)>,
    },
    /// Merge both endpoint nodes by `(label, id)` (no attributes) and the
    /// typed edge between them.
    MergeEdge {
        source_label: String,
        source_id: String,
        rel_type: String,
        target_label: String,
        target_id: String,
    },
}

impl Statement {
    /// Render as one line of Cypher for execution and for the audit artifact.
    pub fn to_cypher(&self) -> String {
        match self {
            Statement::MergeNode {
                label,
                id,
                on_create,
            } => {
                let mut cypher = format!("MERGE (n:{} {{id: \"{}\"}})", label, escape(id));
                if !on_create.is_empty() {
                    let props = on_create
                        .iter()
                        .map(|(key, value)| {
                            format!("n.{} = \"{}\"", render_key(key), escape(value))
                        })
                        .collect::<Vec<_>>()
                        .join(", ");
                    cypher.push_str(&format!(" ON CREATE SET {props}"));
                }
                cypher
            }
            Statement::MergeEdge {
                source_label,
                source_id,
                rel_type,
                target_label,
                target_id,
            } => format!(
                "MERGE (a:{} {{id: \"{}\"}}) MERGE (b:{} {{id: \"{}\"}}) MERGE (a)-[:{}]->(b)",
                source_label,
                escape(source_id),
                target_label,
                escape(target_id),
                rel_type
            ),
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Statement::MergeNode { .. })
    }
}

/// Render an attribute key as a Cypher property name. Keys come from model
/// output, so anything that is not a plain identifier gets backtick-quoted
/// (with embedded backticks doubled) instead of breaking the statement.
fn render_key(key: &str) -> String {
    let plain = !key.is_empty()
        && !key.starts_with(|c: char| c.is_ascii_digit())
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        key.to_string()
    } else {
        format!("`{}`", key.replace('`', "``"))
    }
}

/// Escape a value for embedding in a double-quoted Cypher string literal.
/// Newlines become `\n` so rendered statements stay one per line in the
/// audit file.
fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
