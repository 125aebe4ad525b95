use serde::Serialize;

use graph::StatementFailure;

/// Aggregate outcome of one pipeline run. Every isolated failure is carried
/// here so the operator sees all of them, not just counts.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub documents_processed: usize,
    pub documents_failed: usize,
    pub entities_extracted: usize,
    pub relationships_extracted: usize,
    pub relationships_unresolved: usize,
    pub statements_compiled: usize,
    pub statements_applied: usize,
    pub statements_failed: usize,
    pub elapsed_secs: f64,

    pub document_failures: Vec<DocumentFailure>,
    pub unresolved_relationships: Vec<String>,
    pub statement_failures: Vec<StatementFailure>,
}

/// One document that could not be extracted; the batch continued without it.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentFailure {
    pub class: String,
    pub source: String,
    pub error: String,
}

impl RunReport {
    pub fn record_document_failure(&mut self, class: &str, source: &str, error: impl ToString) {
        self.documents_failed += 1;
        self.document_failures.push(DocumentFailure {
            class: class.to_string(),
            source: source.to_string(),
            error: error.to_string(),
        });
    }
}
