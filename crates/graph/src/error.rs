/// Failures on the graph side of the pipeline. Unresolved endpoints are
/// per-triple, execution failures per-statement; neither aborts a run.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("relationship {triple} references id {missing:?} never declared as an entity in this batch")]
    UnresolvedEndpoint { triple: String, missing: String },

    #[error("statement failed: {statement} - {message}")]
    StatementExecution { statement: String, message: String },

    #[error("failed to connect to graph store: {0}")]
    Connect(String),

    #[error("failure log i/o error: {0}")]
    FailureLog(#[from] std::io::Error),
}
