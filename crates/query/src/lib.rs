pub mod prompts;

use neo4rs::{Graph, Query};
use tracing::{debug, info};

use extract::{ExtractError, OllamaClient};

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Model(#[from] ExtractError),

    #[error("cypher execution failed: {0}")]
    Cypher(String),
}

/// Whether a question needs a graph lookup at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Route {
    Query,
    Conversational,
}

impl Route {
    /// Parse the classifier's reply. Anything that isn't a clear "QUERY" is
    /// treated as conversational; a misroute then costs one bland answer
    /// instead of a broken Cypher attempt.
    pub fn parse(reply: &str) -> Self {
        if reply.trim().to_uppercase().starts_with("QUERY") {
            Route::Query
        } else {
            Route::Conversational
        }
    }
}

/// A question answered end to end, with the intermediate steps kept for
/// display alongside the answer.
#[derive(Debug)]
pub struct Answer {
    pub text: String,
    pub cypher: Option<String>,
    pub rows: Option<String>,
}

/// Answers natural-language questions over the ingested graph. Depends only
/// on the graph's final schema and data, not on the ingestion pipeline.
pub struct GraphAssistant {
    llm: OllamaClient,
    graph: Graph,
}

impl GraphAssistant {
    pub fn new(llm: OllamaClient, graph: Graph) -> Self {
        Self { llm, graph }
    }

    pub async fn answer(&self, question: &str) -> Result<Answer, QueryError> {
        let classification = self
            .llm
            .generate(&prompts::build_classifier_prompt(question))
            .await?;
        let route = Route::parse(&classification);
        debug!(?route, "Classified question");

        match route {
            Route::Query => self.answer_from_graph(question).await,
            Route::Conversational => {
                let text = self
                    .llm
                    .generate(&prompts::build_conversational_prompt(question))
                    .await?;
                Ok(Answer {
                    text,
                    cypher: None,
                    rows: None,
                })
            }
        }
    }

    async fn answer_from_graph(&self, question: &str) -> Result<Answer, QueryError> {
        let raw = self
            .llm
            .generate(&prompts::build_cypher_prompt(question))
            .await?;
        let cypher = strip_code_fences(&raw);
        info!(cypher = %cypher, "Generated Cypher");

        let rows = self.run_cypher(&cypher).await?;
        let text = self
            .llm
            .generate(&prompts::build_answer_prompt(question, &rows))
            .await?;

        Ok(Answer {
            text,
            cypher: Some(cypher),
            rows: Some(rows),
        })
    }

    /// Execute generated Cypher and render the rows as a JSON array for the
    /// answer prompt.
    async fn run_cypher(&self, cypher: &str) -> Result<String, QueryError> {
        let mut result = self
            .graph
            .execute(Query::new(cypher.to_string()))
            .await
            .map_err(|e| QueryError::Cypher(e.to_string()))?;

        let mut rows = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| QueryError::Cypher(e.to_string()))?
        {
            match row.to::<serde_json::Value>() {
                Ok(value) => rows.push(value),
                Err(e) => return Err(QueryError::Cypher(e.to_string())),
            }
        }

        Ok(serde_json::Value::Array(rows).to_string())
    }
}

/// Models often wrap Cypher in markdown fences despite instructions; strip
/// them before execution.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```cypher")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let without_close = without_open.strip_suffix("```").unwrap_or(without_open);
    without_close.trim().to_string()
}
