use async_trait::async_trait;

use crate::error::LlmError;
use crate::types::{SynthesisRequest, SynthesisResponse};

/// Maps a title and body prefix to a category label.
///
/// Implementations return the raw label; callers validate it.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, title: &str, body_prefix: &str) -> Result<String, LlmError>;
}

/// Condenses body text into an analyst-style digest.
#[async_trait]
pub trait TextSummarizer: Send + Sync {
    async fn summarize(&self, body_prefix: &str) -> Result<String, LlmError>;
}

/// Produces the explanation, semantic score, and outreach copy for an insight.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest)
        -> Result<SynthesisResponse, LlmError>;
}
