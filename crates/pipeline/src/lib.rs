pub mod artifacts;
pub mod config;
pub mod report;

pub use config::{ModelConfig, PipelineConfig};
pub use report::{DocumentFailure, RunReport};

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};

use artifacts::ArtifactStore;
use corpus::Document;
use extract::{ClassSchema, ExtractError, Extraction, ExtractionModel, Extractor, schema_for_class};
use graph::{FailureLog, GraphLoader};

/// Drives document classes through extraction, compilation and loading.
/// Failures isolate to their unit of work; only setup problems (missing
/// corpus, unknown class, unwritable artifacts dir) abort a run.
pub struct Pipeline {
    config: PipelineConfig,
    extractor: Extractor,
    artifacts: ArtifactStore,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, model: Box<dyn ExtractionModel>) -> Self {
        let artifacts = ArtifactStore::new(&config.artifacts_dir);
        Self {
            config,
            extractor: Extractor::new(model),
            artifacts,
        }
    }

    /// Extraction phase: every class, every document, one model call each
    /// (unless a reusable artifact exists). Returns the batch of validated
    /// extractions in deterministic order.
    pub async fn extract_all(&self, report: &mut RunReport) -> Result<Vec<Extraction>> {
        self.artifacts.ensure_dir().await?;

        let mut batch = Vec::new();
        for class in &self.config.classes {
            let schema = schema_for_class(class)
                .with_context(|| format!("no builtin schema for document class {class:?}"))?;
            let documents = corpus::read_class_dir(&self.config.corpus_dir, class)
                .await
                .context("failed to read corpus")?;
            info!(class, documents = documents.len(), "Running extraction for class");

            for document in documents {
                info!(source = %document.source.display(), "Extracting entities and relationships");
                match self.extract_document(&schema, &document).await {
                    Ok(extraction) => {
                        report.documents_processed += 1;
                        report.entities_extracted += extraction.entities.len();
                        report.relationships_extracted += extraction.relationships.len();
                        batch.push(extraction);
                    }
                    Err(e) => {
                        warn!(source = %document.source.display(), error = %e, "Document failed, continuing batch");
                        report.record_document_failure(
                            class,
                            &document.source.display().to_string(),
                            e,
                        );
                    }
                }
            }
        }

        Ok(batch)
    }

    async fn extract_document(
        &self,
        schema: &ClassSchema,
        document: &Document,
    ) -> Result<Extraction, ExtractError> {
        if self.config.reuse_artifacts {
            if let Some(prior) = self.artifacts.read_extraction(&document.stem).await {
                info!(stem = %document.stem, "Reusing extraction artifact, skipping model call");
                return Ok(prior);
            }
        }

        let extraction = self.extractor.extract(schema, &document.text).await?;

        // Persisted before compilation: a crash downstream replays from here
        // instead of re-calling the model.
        if let Err(e) = self
            .artifacts
            .write_extraction(&document.stem, &extraction)
            .await
        {
            warn!(stem = %document.stem, error = %e, "Could not persist extraction artifact");
        }

        Ok(extraction)
    }

    /// Full run: extract, compile, persist the statement artifact, load.
    pub async fn run(&self, loader: &GraphLoader) -> Result<RunReport> {
        let start = Instant::now();
        let mut report = RunReport::default();

        let batch = self.extract_all(&mut report).await?;

        let compiled = graph::compile(&batch);
        report.statements_compiled = compiled.statements.len();
        report.relationships_unresolved = compiled.unresolved.len();
        report.unresolved_relationships =
            compiled.unresolved.iter().map(|e| e.to_string()).collect();

        let statement_path = self.artifacts.write_statements(&compiled.statements).await?;
        info!(
            path = %statement_path.display(),
            statements = compiled.statements.len(),
            "Wrote compiled statement artifact"
        );

        let mut failure_log = FailureLog::open(&self.artifacts.failure_log_path()).await?;
        let load = loader.load(&compiled.statements, &mut failure_log).await;
        report.statements_applied = load.applied;
        report.statements_failed = load.failures.len();
        report.statement_failures = load.failures;

        report.elapsed_secs = start.elapsed().as_secs_f64();
        info!(
            documents = report.documents_processed,
            document_failures = report.documents_failed,
            entities = report.entities_extracted,
            relationships = report.relationships_extracted,
            statements_applied = report.statements_applied,
            statements_failed = report.statements_failed,
            elapsed_secs = report.elapsed_secs,
            "Pipeline completed"
        );

        Ok(report)
    }
}
