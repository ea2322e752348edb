//! Text-service wiring shared by the commands that score items.

use std::sync::Arc;

use partneros_core::AppConfig;
use partneros_insights::TextServices;
use partneros_llm::{OfflineTextService, OpenAiClient, OpenAiConfig};

/// Build the OpenAI-backed services, or the offline fallbacks when no API
/// key is configured.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub(crate) fn text_services(config: &AppConfig) -> anyhow::Result<TextServices> {
    match OpenAiConfig::from_app_config(config) {
        Some(openai) => {
            let client = OpenAiClient::new(openai)
                .map_err(|e| anyhow::anyhow!("failed to build OpenAI client: {e}"))?;
            Ok(TextServices::shared(Arc::new(client)))
        }
        None => {
            tracing::warn!("OPENAI_API_KEY is not set; using deterministic fallbacks");
            Ok(TextServices::shared(Arc::new(OfflineTextService)))
        }
    }
}
