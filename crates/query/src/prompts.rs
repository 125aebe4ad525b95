//! Prompt templates for the question-answering side. The Cypher generation
//! prompt is constrained to the labels and relationship types the ingestion
//! pipeline produces; the model is never asked to invent schema.

/// Node labels and relationship types of the ingested graph, rendered into
/// the Cypher generation prompt.
pub const GRAPH_SCHEMA: &str = "\
Nodes:
  (:Project {id, name, summary})
  (:Technology {id, name})
  (:Client {id, name, industry})
  (:Person {id, name})
  (:SlackMessage {id, text})
Relationships:
  (Project)-[:USES_TECH]->(Technology)
  (Project)-[:HAS_CLIENT]->(Client)
  (Person)-[:HAS_SKILLS]->(Technology)
  (Project)-[:HAS_PEOPLE]->(Person)
  (Person)-[:SENT]->(SlackMessage)";

pub fn build_classifier_prompt(question: &str) -> String {
    format!(
        r#"You are a classifier that determines whether a user's question requires querying a Neo4j database.
If the question is about people, projects, technologies, skills, or Slack messages in the workplace, respond with "QUERY".
If the question is general, conversational, or doesn't require data lookup, respond with "NOQUERY".
Only respond with "QUERY" or "NOQUERY".

Question: {question}
Answer:"#
    )
}

pub fn build_cypher_prompt(question: &str) -> String {
    format!(
        r#"You are an expert Neo4j Cypher translator who converts English to Cypher based on the Neo4j Schema provided, following the instructions below:
1. Generate Cypher query compatible ONLY for Neo4j Version 5
2. Do not use EXISTS, SIZE, or HAVING keywords in the cypher. Use alias when using the WITH keyword
3. Use only Nodes and relationships mentioned in the schema
4. Always do a case-insensitive and fuzzy search for any properties related search. Eg: to search for a Client, use `toLower(client.id) CONTAINS 'neo4j'`. To search for Slack Messages, use `toLower(m.text) CONTAINS 'neo4j'`. To search for a project, use `toLower(project.summary) CONTAINS 'logistics platform' OR toLower(project.name) CONTAINS 'logistics platform'`.
5. Never use relationships that are not mentioned in the given schema
6. Always wrap nodes in parentheses in MATCH and OPTIONAL MATCH patterns, for every direction of relationship:
   - (a)-[:REL]->(b)
   - (a)<-[:REL]-(b)
   - (a)-[:REL]-(b)

schema:
{GRAPH_SCHEMA}

Use the following examples to guide your Cypher query generation:

1. People and their skills:
MATCH (p:Person)-[:HAS_SKILLS]->(t:Technology)
RETURN p.name, t.name

2. Projects and their people or clients:
MATCH (pr:Project)-[:HAS_PEOPLE]->(p:Person)
RETURN pr.name, p.name

MATCH (pr:Project)-[:HAS_CLIENT]->(c:Client)
RETURN pr.name, c.name

3. Slack messages about a topic:
MATCH (m:SlackMessage)
WHERE toLower(m.text) CONTAINS 'deadline'
RETURN m.text

4. Technologies of a specific person:
MATCH (p:Person)-[:HAS_SKILLS]->(t:Technology)
WHERE toLower(p.name) CONTAINS 'liam thompson'
RETURN p.name, t.name

Do not return anything but the Cypher query.

Question: {question}
"#
    )
}

pub fn build_answer_prompt(question: &str, context: &str) -> String {
    format!(
        r#"You are an assistant that helps to form nice and human understandable answers based on the question: {question}.

this is a response:
{context}

your job is to deliver this answer in a human readable way.
"#
    )
}

pub fn build_conversational_prompt(question: &str) -> String {
    format!("Respond conversationally to: {question}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cypher_prompt_carries_the_schema_and_question() {
        let prompt = build_cypher_prompt("who knows rust?");
        assert!(prompt.contains("HAS_SKILLS"));
        assert!(prompt.contains("SlackMessage"));
        assert!(prompt.contains("who knows rust?"));
    }

    #[test]
    fn classifier_prompt_only_allows_two_answers() {
        let prompt = build_classifier_prompt("hello there");
        assert!(prompt.contains("\"QUERY\" or \"NOQUERY\""));
    }
}
