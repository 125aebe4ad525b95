use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use graph::Neo4jConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Corpus root; each document class is a subdirectory of plain-text files.
    pub corpus_dir: PathBuf,
    /// Where extraction artifacts, the compiled statement file and the
    /// failure log are written.
    pub artifacts_dir: PathBuf,
    /// Document classes to process, in order. Each must have a builtin schema.
    pub classes: Vec<String>,
    /// Reuse an existing `<stem>_output.json` instead of re-calling the model.
    pub reuse_artifacts: bool,
    pub neo4j: Neo4jConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub base_url: String,
    pub model: String,
    /// Fixed post-call delay, the pipeline's only rate limiting.
    pub cooldown_secs: u64,
}

impl ModelConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("./data"),
            artifacts_dir: PathBuf::from("./artifacts"),
            classes: vec![
                "project_briefs".to_string(),
                "people_profiles".to_string(),
                "slack_messages".to_string(),
            ],
            reuse_artifacts: false,
            neo4j: Neo4jConfig::default(),
            model: ModelConfig {
                base_url: "http://localhost:11434".to_string(),
                model: "phi4".to_string(),
                cooldown_secs: 8,
            },
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by environment variables where set.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("WHOKNOWS_CORPUS_DIR") {
            config.corpus_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("WHOKNOWS_ARTIFACTS_DIR") {
            config.artifacts_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("WHOKNOWS_REUSE_ARTIFACTS") {
            config.reuse_artifacts = v == "1" || v.eq_ignore_ascii_case("true");
        }
        if let Ok(v) = std::env::var("NEO4J_CONNECTION_URL") {
            config.neo4j.uri = v;
        }
        if let Ok(v) = std::env::var("NEO4J_USER") {
            config.neo4j.user = v;
        }
        if let Ok(v) = std::env::var("NEO4J_PASSWORD") {
            config.neo4j.password = v;
        }
        if let Ok(v) = std::env::var("OLLAMA_URL") {
            config.model.base_url = v;
        }
        if let Ok(v) = std::env::var("OLLAMA_MODEL") {
            config.model.model = v;
        }
        if let Ok(v) = std::env::var("OLLAMA_COOLDOWN_SECS") {
            if let Ok(secs) = v.parse() {
                config.model.cooldown_secs = secs;
            }
        }

        config
    }
}
