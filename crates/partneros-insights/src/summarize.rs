use std::time::Duration;

use partneros_llm::TextSummarizer;

use crate::text::truncate_chars;

pub const SUMMARIZE_INPUT_CHARS: usize = 4000;
pub const SUMMARY_FALLBACK_CHARS: usize = 500;

/// Summarize `text`, falling back to its first 500 characters.
///
/// The result is non-empty whenever `text` is non-empty.
pub async fn summarize_content(
    summarizer: &dyn TextSummarizer,
    text: &str,
    timeout: Duration,
) -> String {
    let input = truncate_chars(text, SUMMARIZE_INPUT_CHARS);
    let fallback = || truncate_chars(text, SUMMARY_FALLBACK_CHARS).to_owned();

    match tokio::time::timeout(timeout, summarizer.summarize(input)).await {
        Ok(Ok(summary)) if !summary.trim().is_empty() => summary.trim().to_owned(),
        Ok(Ok(_)) => {
            tracing::warn!("summarizer returned empty text; truncating input");
            fallback()
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "summarization failed; truncating input");
            fallback()
        }
        Err(_) => {
            tracing::warn!(
                timeout_secs = timeout.as_secs(),
                "summarization timed out; truncating input"
            );
            fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use partneros_llm::{LlmError, OfflineTextService};

    use super::*;

    struct Fixed(&'static str);

    #[async_trait]
    impl TextSummarizer for Fixed {
        async fn summarize(&self, _body: &str) -> Result<String, LlmError> {
            Ok(self.0.to_owned())
        }
    }

    struct Slow;

    #[async_trait]
    impl TextSummarizer for Slow {
        async fn summarize(&self, _body: &str) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("late".to_owned())
        }
    }

    const T: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn returns_trimmed_summary() {
        let summary = summarize_content(&Fixed("  - one\n- two \n"), "body", T).await;
        assert_eq!(summary, "- one\n- two");
    }

    #[tokio::test]
    async fn failure_truncates_to_500_chars() {
        let text = "x".repeat(2000);
        let summary = summarize_content(&OfflineTextService, &text, T).await;
        assert_eq!(summary.len(), SUMMARY_FALLBACK_CHARS);
    }

    #[tokio::test]
    async fn blank_response_falls_back() {
        let summary = summarize_content(&Fixed("   "), "short body", T).await;
        assert_eq!(summary, "short body");
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_falls_back() {
        let summary = summarize_content(&Slow, "body text", Duration::from_secs(1)).await;
        assert_eq!(summary, "body text");
    }
}
