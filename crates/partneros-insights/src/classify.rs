use std::time::Duration;

use partneros_core::SignalType;
use partneros_llm::TextClassifier;

use crate::text::truncate_chars;

pub const CLASSIFY_BODY_CHARS: usize = 1000;

/// Classify an item into a [`SignalType`], falling back to `Blog`.
///
/// Never fails: errors, timeouts, and unrecognized labels all yield `Blog`.
pub async fn classify_signal(
    classifier: &dyn TextClassifier,
    title: &str,
    body: &str,
    timeout: Duration,
) -> SignalType {
    let body_prefix = truncate_chars(body, CLASSIFY_BODY_CHARS);

    let label = match tokio::time::timeout(timeout, classifier.classify(title, body_prefix)).await
    {
        Ok(Ok(label)) => label,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, title, "classification failed; using blog");
            return SignalType::Blog;
        }
        Err(_) => {
            tracing::warn!(
                timeout_secs = timeout.as_secs(),
                title,
                "classification timed out; using blog"
            );
            return SignalType::Blog;
        }
    };

    match normalize_label(&label).parse::<SignalType>() {
        Ok(signal_type) => signal_type,
        Err(e) => {
            tracing::warn!(error = %e, title, "unrecognized classification; using blog");
            SignalType::Blog
        }
    }
}

fn normalize_label(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| (c.is_ascii_punctuation() && c != '_') || c.is_whitespace())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use partneros_llm::LlmError;

    use super::*;

    struct Fixed(Result<&'static str, ()>);

    #[async_trait]
    impl TextClassifier for Fixed {
        async fn classify(&self, _title: &str, _body: &str) -> Result<String, LlmError> {
            self.0
                .map(str::to_owned)
                .map_err(|()| LlmError::EmptyResponse)
        }
    }

    struct Slow;

    #[async_trait]
    impl TextClassifier for Slow {
        async fn classify(&self, _title: &str, _body: &str) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("funding".to_owned())
        }
    }

    struct CaptureLen(std::sync::Mutex<usize>);

    #[async_trait]
    impl TextClassifier for CaptureLen {
        async fn classify(&self, _title: &str, body: &str) -> Result<String, LlmError> {
            *self.0.lock().unwrap() = body.chars().count();
            Ok("launch".to_owned())
        }
    }

    const T: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn accepts_valid_label() {
        assert_eq!(
            classify_signal(&Fixed(Ok("marketplace")), "t", "b", T).await,
            SignalType::Marketplace
        );
    }

    #[tokio::test]
    async fn normalizes_case_whitespace_and_quotes() {
        assert_eq!(
            classify_signal(&Fixed(Ok("  \"Funding\".\n")), "t", "b", T).await,
            SignalType::Funding
        );
    }

    #[tokio::test]
    async fn unknown_label_falls_back_to_blog() {
        assert_eq!(
            classify_signal(&Fixed(Ok("partnership announcement")), "t", "b", T).await,
            SignalType::Blog
        );
    }

    #[tokio::test]
    async fn error_falls_back_to_blog() {
        assert_eq!(
            classify_signal(&Fixed(Err(())), "t", "b", T).await,
            SignalType::Blog
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_falls_back_to_blog() {
        assert_eq!(
            classify_signal(&Slow, "t", "b", Duration::from_secs(1)).await,
            SignalType::Blog
        );
    }

    #[tokio::test]
    async fn body_is_truncated() {
        let capture = CaptureLen(std::sync::Mutex::new(0));
        let body = "é".repeat(5000);
        classify_signal(&capture, "t", &body, T).await;
        assert_eq!(*capture.0.lock().unwrap(), CLASSIFY_BODY_CHARS);
    }
}
