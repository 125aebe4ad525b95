use anyhow::{Context, Result};

use extract::OllamaClient;
use graph::GraphLoader;
use pipeline::{Pipeline, PipelineConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = PipelineConfig::from_env();
    tracing::info!(
        corpus = %config.corpus_dir.display(),
        artifacts = %config.artifacts_dir.display(),
        model = %config.model.model,
        "Starting ingestion pipeline"
    );

    let model = OllamaClient::new(
        config.model.base_url.clone(),
        config.model.model.clone(),
        config.model.cooldown(),
    );

    let loader = GraphLoader::connect(&config.neo4j)
        .await
        .context("could not connect to Neo4j")?;

    let pipeline = Pipeline::new(config, Box::new(model));
    let report = pipeline.run(&loader).await?;

    // Full report on stdout for operators; isolated failures are inside it,
    // they never fail the process.
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
