//! Durable intermediate artifacts. Extraction results are written per
//! document before compilation (the replay boundary), the compiled statement
//! list before loading, so a crash downstream never forces re-calling the
//! model for work already done.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::debug;

use extract::Extraction;
use graph::Statement;

pub const STATEMENTS_FILE: &str = "cyphers.txt";
pub const FAILURE_LOG_FILE: &str = "failed_statements.txt";

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create artifacts dir {:?}", self.dir))
    }

    /// Per-document extraction artifact: `<stem>_output.json`.
    pub fn extraction_path(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}_output.json"))
    }

    pub async fn write_extraction(&self, stem: &str, extraction: &Extraction) -> Result<()> {
        let path = self.extraction_path(stem);
        let json = serde_json::to_vec_pretty(extraction)?;
        fs::write(&path, json)
            .await
            .with_context(|| format!("failed to write extraction artifact {path:?}"))?;
        debug!(path = %path.display(), "Wrote extraction artifact");
        Ok(())
    }

    /// Read a previously written extraction artifact. Returns `None` when the
    /// file is missing or no longer deserializes; the caller then re-extracts.
    pub async fn read_extraction(&self, stem: &str) -> Option<Extraction> {
        let path = self.extraction_path(stem);
        let bytes = fs::read(&path).await.ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Write the full compiled statement list, one Cypher statement per line,
    /// in execution order. This is the human-auditable upsert script.
    pub async fn write_statements(&self, statements: &[Statement]) -> Result<PathBuf> {
        let path = self.dir.join(STATEMENTS_FILE);
        let mut contents = statements
            .iter()
            .map(Statement::to_cypher)
            .collect::<Vec<_>>()
            .join("\n");
        contents.push('\n');
        fs::write(&path, contents)
            .await
            .with_context(|| format!("failed to write statement artifact {path:?}"))?;
        Ok(path)
    }

    pub fn failure_log_path(&self) -> PathBuf {
        self.dir.join(FAILURE_LOG_FILE)
    }
}
