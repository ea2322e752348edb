use async_trait::async_trait;

use crate::error::LlmError;
use crate::service::{InsightGenerator, TextClassifier, TextSummarizer};
use crate::types::{SynthesisRequest, SynthesisResponse};

/// Text service used when no API key is configured.
///
/// Every call fails with [`LlmError::Disabled`], so callers take their
/// deterministic fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTextService;

#[async_trait]
impl TextClassifier for OfflineTextService {
    async fn classify(&self, _title: &str, _body_prefix: &str) -> Result<String, LlmError> {
        Err(LlmError::Disabled)
    }
}

#[async_trait]
impl TextSummarizer for OfflineTextService {
    async fn summarize(&self, _body_prefix: &str) -> Result<String, LlmError> {
        Err(LlmError::Disabled)
    }
}

#[async_trait]
impl InsightGenerator for OfflineTextService {
    async fn synthesize(
        &self,
        _request: &SynthesisRequest,
    ) -> Result<SynthesisResponse, LlmError> {
        Err(LlmError::Disabled)
    }
}
