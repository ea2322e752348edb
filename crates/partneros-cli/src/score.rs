//! Offline scoring of a single item against an objectives file.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use partneros_core::{AppConfig, RawSignal};
use partneros_insights::{MemoryStore, Pipeline, PipelineConfig, PipelineStores};
use uuid::Uuid;

/// Classify, summarize, and score one item and print the insight draft as JSON.
///
/// Nothing is persisted; the in-memory store only satisfies the pipeline's
/// storage seams.
///
/// # Errors
///
/// Returns an error if the objectives or content file cannot be read.
pub(crate) async fn run_score(
    config: &AppConfig,
    objectives_path: &Path,
    title: String,
    url: String,
    content_file: Option<&Path>,
    published_at: Option<DateTime<Utc>>,
) -> anyhow::Result<()> {
    let objectives = partneros_core::load_objectives(objectives_path)?.into_objectives(Uuid::nil());
    let content = match content_file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?,
        None => String::new(),
    };

    let raw = RawSignal {
        partner_id: Uuid::nil(),
        title,
        url,
        content,
        published_at,
        facets: None,
    };

    let pipeline = Pipeline::new(
        crate::services::text_services(config)?,
        PipelineStores::shared(Arc::new(MemoryStore::new())),
        PipelineConfig::from_app_config(config),
    );

    let draft = pipeline
        .classify_and_summarize_and_score(&raw, &objectives, None, Utc::now())
        .await
        .ok_or_else(|| anyhow::anyhow!("no objectives to score against"))?;

    println!("{}", serde_json::to_string_pretty(&draft)?);
    Ok(())
}
