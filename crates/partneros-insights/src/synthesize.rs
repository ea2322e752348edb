//! Insight synthesis: deterministic base score plus a bounded LLM adjustment.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use partneros_core::{InsightDraft, Objective, PreferenceWeights, Signal, SuggestedAction};
use partneros_llm::{InsightGenerator, SynthesisRequest, SynthesisResponse};
use partneros_scoring::{calculate_base_score, final_score, llm_adjustment, BaseScore, ScoringConfig};

use crate::draft::{default_outreach_draft, format_outreach_draft};

pub const FALLBACK_RECOMMENDATION: &str = "Consider reaching out to explore opportunities.";

pub struct InsightSynthesizer {
    generator: Arc<dyn InsightGenerator>,
    scoring: ScoringConfig,
    call_timeout: Duration,
}

impl InsightSynthesizer {
    #[must_use]
    pub fn new(
        generator: Arc<dyn InsightGenerator>,
        scoring: ScoringConfig,
        call_timeout: Duration,
    ) -> Self {
        Self {
            generator,
            scoring,
            call_timeout,
        }
    }

    /// Score `signal` against the highest-priority objective and enrich it.
    ///
    /// Returns `None` only when `objectives` is empty. Generator failures,
    /// timeouts, and malformed output produce a deterministic draft scored
    /// with the unmodified base score.
    pub async fn synthesize(
        &self,
        signal: &Signal,
        objectives: &[Objective],
        prefs: Option<&PreferenceWeights>,
        now: DateTime<Utc>,
    ) -> Option<InsightDraft> {
        let primary = objectives.iter().min_by_key(|o| o.priority)?;
        let base = calculate_base_score(
            signal.signal_type,
            signal.published_at,
            primary,
            prefs,
            now,
        );

        let request = SynthesisRequest::new(signal, objectives);
        let draft = match tokio::time::timeout(
            self.call_timeout,
            self.generator.synthesize(&request),
        )
        .await
        {
            Ok(Ok(response)) => self.enriched(primary, &base, response),
            Ok(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    signal_id = %signal.id,
                    objective_id = %primary.id,
                    "insight synthesis failed; using fallback"
                );
                fallback(signal, primary, &base)
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.call_timeout.as_secs(),
                    signal_id = %signal.id,
                    objective_id = %primary.id,
                    "insight synthesis timed out; using fallback"
                );
                fallback(signal, primary, &base)
            }
        };

        Some(draft)
    }

    fn enriched(
        &self,
        primary: &Objective,
        base: &BaseScore,
        response: SynthesisResponse,
    ) -> InsightDraft {
        let adjustment = llm_adjustment(
            response.score,
            base.score,
            self.scoring.llm_adjustment_bound,
        );
        let scored = final_score(base, adjustment);
        tracing::debug!(
            base = base.score,
            llm = response.score,
            adjustment,
            "blended insight score"
        );

        InsightDraft {
            objective_id: Some(primary.id),
            score: scored.rounded(),
            breakdown: scored.breakdown,
            why: response.why,
            recommendation: response.recommendation,
            actions: response.actions,
            outreach_draft: format_outreach_draft(&response.outreach_draft),
        }
    }
}

fn fallback(signal: &Signal, primary: &Objective, base: &BaseScore) -> InsightDraft {
    InsightDraft {
        objective_id: Some(primary.id),
        score: base.rounded(),
        breakdown: base.breakdown,
        why: format!(
            "This {} signal aligns with your {} objective.",
            signal.signal_type,
            primary.objective_type.label()
        ),
        recommendation: FALLBACK_RECOMMENDATION.to_owned(),
        actions: vec![SuggestedAction::reach_out()],
        outreach_draft: format_outreach_draft(&default_outreach_draft(signal)),
    }
}

#[cfg(test)]
#[path = "synthesize_test.rs"]
mod tests;
