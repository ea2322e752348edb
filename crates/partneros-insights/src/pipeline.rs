//! Per-item ingestion: dedupe, summarize, classify, persist, synthesize.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use partneros_core::{
    compute_dedupe_key, AppConfig, InsightDraft, NewSignal, Objective, PreferenceWeights,
    RawSignal, Signal,
};
use partneros_llm::{InsightGenerator, TextClassifier, TextSummarizer};
use partneros_scoring::ScoringConfig;
use uuid::Uuid;

use crate::classify::classify_signal;
use crate::error::{InsightError, StoreError};
use crate::store::{FeedPartner, InsertOutcome, InsightStore, SignalStore, WeightStore};
use crate::summarize::summarize_content;
use crate::synthesize::InsightSynthesizer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Upper bound on every external text-service call.
    pub call_timeout: Duration,
    pub scoring: ScoringConfig,
}

impl PipelineConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            call_timeout: Duration::from_secs(config.llm_timeout_secs),
            scoring: ScoringConfig {
                llm_adjustment_bound: config.llm_adjustment_bound,
            },
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(30),
            scoring: ScoringConfig::default(),
        }
    }
}

/// The three text collaborators the pipeline calls out to.
#[derive(Clone)]
pub struct TextServices {
    pub classifier: Arc<dyn TextClassifier>,
    pub summarizer: Arc<dyn TextSummarizer>,
    pub generator: Arc<dyn InsightGenerator>,
}

impl TextServices {
    /// Use one service for every role.
    pub fn shared<T>(service: Arc<T>) -> Self
    where
        T: TextClassifier + TextSummarizer + InsightGenerator + 'static,
    {
        Self {
            classifier: service.clone(),
            summarizer: service.clone(),
            generator: service,
        }
    }
}

#[derive(Clone)]
pub struct PipelineStores {
    pub signals: Arc<dyn SignalStore>,
    pub insights: Arc<dyn InsightStore>,
    pub weights: Arc<dyn WeightStore>,
}

impl PipelineStores {
    /// Use one backend for every table.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: SignalStore + InsightStore + WeightStore + 'static,
    {
        Self {
            signals: store.clone(),
            insights: store.clone(),
            weights: store,
        }
    }
}

/// Per-objective insight counts for one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsightTally {
    pub created: usize,
    /// Already stored, or inserted concurrently by another writer.
    pub skipped: usize,
    /// Store failures; the objective is retried on the next run.
    pub failed: usize,
}

/// Result of ingesting one feed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The item's fingerprint was already stored. Only insights missing for
    /// the stored signal were written.
    Duplicate {
        signal_id: Uuid,
        insights: InsightTally,
    },
    Ingested {
        signal_id: Uuid,
        insights: InsightTally,
    },
}

impl ItemOutcome {
    #[must_use]
    pub fn signal_id(&self) -> Uuid {
        match self {
            ItemOutcome::Duplicate { signal_id, .. } | ItemOutcome::Ingested { signal_id, .. } => {
                *signal_id
            }
        }
    }

    #[must_use]
    pub fn insights(&self) -> InsightTally {
        match self {
            ItemOutcome::Duplicate { insights, .. } | ItemOutcome::Ingested { insights, .. } => {
                *insights
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub partner_id: Uuid,
    pub items_seen: usize,
    pub items_too_old: usize,
    pub signals_created: usize,
    pub duplicates: usize,
    pub insights_created: usize,
    pub insights_skipped: usize,
    pub insights_failed: usize,
    pub failures: usize,
}

pub struct Pipeline {
    classifier: Arc<dyn TextClassifier>,
    summarizer: Arc<dyn TextSummarizer>,
    synthesizer: InsightSynthesizer,
    stores: PipelineStores,
    call_timeout: Duration,
}

impl Pipeline {
    #[must_use]
    pub fn new(services: TextServices, stores: PipelineStores, config: PipelineConfig) -> Self {
        Self {
            classifier: services.classifier,
            summarizer: services.summarizer,
            synthesizer: InsightSynthesizer::new(
                services.generator,
                config.scoring,
                config.call_timeout,
            ),
            stores,
            call_timeout: config.call_timeout,
        }
    }

    /// Summarize and classify a raw item into its insertable form.
    pub async fn prepare_signal(&self, raw: &RawSignal) -> NewSignal {
        let text = if raw.content.trim().is_empty() {
            raw.title.as_str()
        } else {
            raw.content.as_str()
        };
        let summary = summarize_content(self.summarizer.as_ref(), text, self.call_timeout).await;
        let signal_type = classify_signal(
            self.classifier.as_ref(),
            &raw.title,
            &raw.content,
            self.call_timeout,
        )
        .await;

        NewSignal {
            partner_id: raw.partner_id,
            signal_type,
            title: raw.title.clone(),
            source_url: raw.url.clone(),
            summary,
            facets: raw.facets.clone(),
            published_at: raw.published_at,
            dedupe_hash: compute_dedupe_key(&raw.url, &raw.title),
        }
    }

    /// Score a raw item without persisting anything.
    ///
    /// Returns `None` only when `objectives` is empty.
    pub async fn classify_and_summarize_and_score(
        &self,
        raw: &RawSignal,
        objectives: &[Objective],
        prefs: Option<&PreferenceWeights>,
        now: DateTime<Utc>,
    ) -> Option<InsightDraft> {
        if objectives.is_empty() {
            return None;
        }
        let new = self.prepare_signal(raw).await;
        let signal = Signal::from_new(Uuid::new_v4(), new, now);
        self.synthesizer
            .synthesize(&signal, objectives, prefs, now)
            .await
    }

    /// Persist one item and one insight per objective, skipping anything
    /// already stored.
    ///
    /// An item whose fingerprint is already stored is not summarized or
    /// classified again; insights still missing for its stored signal are
    /// filled in. A store failure on one objective is logged and counted
    /// without stopping the others.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::Store`] when a signal-level store call fails.
    /// Text-service failures never surface here.
    pub async fn ingest_item(
        &self,
        raw: &RawSignal,
        objectives: &[Objective],
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ItemOutcome, InsightError> {
        let dedupe_hash = compute_dedupe_key(&raw.url, &raw.title);
        if self.stores.signals.signal_exists(&dedupe_hash).await? {
            tracing::debug!(url = %raw.url, "signal already ingested; filling missing insights");
            return self
                .fill_missing_insights(&dedupe_hash, objectives, user_id, now)
                .await;
        }

        let new = self.prepare_signal(raw).await;
        let signal = match self.stores.signals.insert_signal(&new).await? {
            InsertOutcome::Inserted(signal) => signal,
            InsertOutcome::Duplicate => {
                tracing::debug!(
                    url = %raw.url,
                    "signal inserted concurrently; filling missing insights"
                );
                return self
                    .fill_missing_insights(&dedupe_hash, objectives, user_id, now)
                    .await;
            }
        };

        let insights = self.write_insights(&signal, objectives, user_id, now).await?;
        Ok(ItemOutcome::Ingested {
            signal_id: signal.id,
            insights,
        })
    }

    async fn fill_missing_insights(
        &self,
        dedupe_hash: &str,
        objectives: &[Objective],
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ItemOutcome, InsightError> {
        let signal = self
            .stores
            .signals
            .find_signal_by_hash(dedupe_hash)
            .await?
            .ok_or_else(|| {
                StoreError::Corrupt(format!("signal {dedupe_hash} reported stored but not found"))
            })?;
        let insights = self.write_insights(&signal, objectives, user_id, now).await?;
        Ok(ItemOutcome::Duplicate {
            signal_id: signal.id,
            insights,
        })
    }

    async fn write_insights(
        &self,
        signal: &Signal,
        objectives: &[Objective],
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<InsightTally, InsightError> {
        let mut tally = InsightTally::default();
        if objectives.is_empty() {
            return Ok(tally);
        }
        let weights = self.stores.weights.get_weights(user_id).await?;

        for objective in objectives {
            match self.write_insight(signal, objective, &weights, now).await {
                Ok(true) => tally.created += 1,
                Ok(false) => tally.skipped += 1,
                Err(e) => {
                    tally.failed += 1;
                    tracing::warn!(
                        error = %e,
                        signal_id = %signal.id,
                        objective_id = %objective.id,
                        "failed to store insight"
                    );
                }
            }
        }
        Ok(tally)
    }

    /// Returns `true` when a new insight was stored.
    async fn write_insight(
        &self,
        signal: &Signal,
        objective: &Objective,
        weights: &PreferenceWeights,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        if self
            .stores
            .insights
            .insight_exists(signal.id, objective.id)
            .await?
        {
            return Ok(false);
        }

        let Some(draft) = self
            .synthesizer
            .synthesize(signal, std::slice::from_ref(objective), Some(weights), now)
            .await
        else {
            return Ok(false);
        };

        match self.stores.insights.insert_insight(signal.id, &draft).await? {
            InsertOutcome::Inserted(insight) => {
                tracing::debug!(
                    insight_id = %insight.id,
                    objective_id = %objective.id,
                    score = insight.score,
                    "created insight"
                );
                Ok(true)
            }
            InsertOutcome::Duplicate => Ok(false),
        }
    }

    /// Ingest a partner's feed items in order.
    ///
    /// Items published before `cutoff` are skipped; undated items are kept.
    /// A failing item is logged and counted without aborting the rest.
    pub async fn ingest_partner(
        &self,
        partner: &FeedPartner,
        items: &[RawSignal],
        objectives: &[Objective],
        cutoff: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> IngestReport {
        let mut report = IngestReport {
            partner_id: partner.id,
            items_seen: items.len(),
            ..IngestReport::default()
        };

        for item in items {
            if let (Some(cutoff), Some(published)) = (cutoff, item.published_at) {
                if published < cutoff {
                    report.items_too_old += 1;
                    continue;
                }
            }

            match self.ingest_item(item, objectives, partner.user_id, now).await {
                Ok(outcome) => {
                    match outcome {
                        ItemOutcome::Duplicate { .. } => report.duplicates += 1,
                        ItemOutcome::Ingested { .. } => report.signals_created += 1,
                    }
                    let insights = outcome.insights();
                    report.insights_created += insights.created;
                    report.insights_skipped += insights.skipped;
                    report.insights_failed += insights.failed;
                }
                Err(e) => {
                    report.failures += 1;
                    tracing::warn!(
                        error = %e,
                        partner = %partner.name,
                        url = %item.url,
                        "failed to ingest feed item"
                    );
                }
            }
        }

        tracing::info!(
            partner = %partner.name,
            seen = report.items_seen,
            too_old = report.items_too_old,
            signals = report.signals_created,
            duplicates = report.duplicates,
            insights = report.insights_created,
            insight_failures = report.insights_failed,
            failures = report.failures,
            "partner ingest complete"
        );
        report
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
