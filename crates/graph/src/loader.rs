use std::path::{Path, PathBuf};

use async_trait::async_trait;
use neo4rs::{Graph, Query};
use serde::{Deserialize, Serialize};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::error::GraphError;
use crate::statement::Statement;

/// Explicit graph store connection settings, passed in at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
        }
    }
}

/// Seam between the loader and the store. The production implementation is
/// `neo4rs::Graph`; tests drive the loader with a scripted executor.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    async fn execute(&self, cypher: &str) -> Result<(), GraphError>;
}

#[async_trait]
impl StatementExecutor for Graph {
    async fn execute(&self, cypher: &str) -> Result<(), GraphError> {
        self.run(Query::new(cypher.to_string()))
            .await
            .map_err(|e| GraphError::StatementExecution {
                statement: cypher.to_string(),
                message: e.to_string(),
            })
    }
}

/// One statement that failed during load, with the error it produced.
#[derive(Debug, Clone, Serialize)]
pub struct StatementFailure {
    pub statement: String,
    pub error: String,
}

/// Result of one load run: the union of applied statements is the final graph
/// state, failures are surfaced for replay.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub applied: usize,
    pub failures: Vec<StatementFailure>,
}

/// Append-only record of failed statements, one `statement - Exception: error`
/// line each. Append (rather than truncate) so no failure within a run, or
/// across reruns, is ever lost.
pub struct FailureLog {
    path: PathBuf,
    file: tokio::fs::File,
}

impl FailureLog {
    pub async fn open(path: &Path) -> Result<Self, GraphError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn record(&mut self, statement: &str, error: &str) -> Result<(), GraphError> {
        let line = format!("{statement} - Exception: {error}\n");
        self.file.write_all(line.as_bytes()).await?;
        self.file.flush().await?;
        Ok(())
    }
}

/// Executes compiled statements against the store, one statement per unit of
/// work, best effort.
pub struct GraphLoader {
    executor: Box<dyn StatementExecutor>,
}

impl GraphLoader {
    pub async fn connect(config: &Neo4jConfig) -> Result<Self, GraphError> {
        let graph = Graph::new(config.uri.as_str(), config.user.as_str(), config.password.as_str())
            .await
            .map_err(|e| GraphError::Connect(e.to_string()))?;
        Ok(Self::new(graph))
    }

    pub fn new(graph: Graph) -> Self {
        Self {
            executor: Box::new(graph),
        }
    }

    pub fn with_executor(executor: Box<dyn StatementExecutor>) -> Self {
        Self { executor }
    }

    /// Run every statement sequentially. A failure is recorded to the failure
    /// log and the report; statements after it are always still attempted.
    pub async fn load(
        &self,
        statements: &[Statement],
        failure_log: &mut FailureLog,
    ) -> LoadReport {
        let mut report = LoadReport::default();

        for (i, statement) in statements.iter().enumerate() {
            let cypher = statement.to_cypher();
            info!(statement = i + 1, total = statements.len(), "Executing statement");

            match self.executor.execute(&cypher).await {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    let message = match &err {
                        GraphError::StatementExecution { message, .. } => message.clone(),
                        other => other.to_string(),
                    };
                    warn!(error = %err, "Statement failed, continuing");
                    if let Err(log_err) = failure_log.record(&cypher, &message).await {
                        // The load must not stop because the log is sick; the
                        // failure is still in the report.
                        warn!(error = %log_err, "Could not write failure log entry");
                    }
                    report.failures.push(StatementFailure {
                        statement: cypher,
                        error: message,
                    });
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails exactly one statement (1-based position), succeeds otherwise.
    struct FlakyExecutor {
        fail_at: usize,
        calls: AtomicUsize,
    }

    impl FlakyExecutor {
        fn new(fail_at: usize) -> Self {
            Self {
                fail_at,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl StatementExecutor for FlakyExecutor {
        async fn execute(&self, cypher: &str) -> Result<(), GraphError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.fail_at {
                Err(GraphError::StatementExecution {
                    statement: cypher.to_string(),
                    message: "constraint violation".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn node_statements(count: usize) -> Vec<Statement> {
        (0..count)
            .map(|i| Statement::MergeNode {
                label: "Technology".to_string(),
                id: format!("tech{i}"),
                on_create: vec![],
            })
            .collect()
    }

    #[tokio::test]
    async fn one_failing_statement_does_not_stop_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = FailureLog::open(&dir.path().join("failed_statements.txt"))
            .await
            .unwrap();

        let statements = node_statements(10);
        let loader = GraphLoader::with_executor(Box::new(FlakyExecutor::new(5)));
        let report = loader.load(&statements, &mut log).await;

        assert_eq!(report.applied, 9);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].statement.contains("tech4"));

        // Recorded exactly once in the durable log.
        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("tech4"));
        assert!(lines[0].contains("Exception: constraint violation"));
    }

    #[tokio::test]
    async fn all_statements_succeeding_reports_no_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = FailureLog::open(&dir.path().join("failed_statements.txt"))
            .await
            .unwrap();

        let statements = node_statements(3);
        let loader = GraphLoader::with_executor(Box::new(FlakyExecutor::new(0)));
        let report = loader.load(&statements, &mut log).await;

        assert_eq!(report.applied, 3);
        assert!(report.failures.is_empty());
        assert_eq!(std::fs::read_to_string(log.path()).unwrap(), "");
    }

    #[tokio::test]
    async fn failure_log_appends_rather_than_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failed_statements.txt");

        {
            let mut log = FailureLog::open(&path).await.unwrap();
            log.record("MERGE (n:Project {id: \"a\"})", "boom").await.unwrap();
        }
        {
            let mut log = FailureLog::open(&path).await.unwrap();
            log.record("MERGE (n:Project {id: \"b\"})", "bang").await.unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("- Exception: boom"));
        assert!(lines[1].contains("id: \"b\""));
    }
}
