//! In-process store used by tests and offline runs.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use partneros_core::{
    FeedbackTag, Insight, InsightDraft, InsightStatus, NewSignal, Objective, PreferenceWeights,
    Signal, WeightKey,
};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{
    CatalogStore, FeedPartner, InsertOutcome, InsightStore, OwnedInsight, RankedInsight,
    SignalStore, StatusUpdate, WeightStore,
};

/// Mutex-guarded tables mirroring the relational schema.
///
/// Uniqueness checks and weight updates happen under a single lock, so
/// concurrent writers see first-writer-wins semantics.
#[derive(Debug, Default)]
pub struct MemoryStore {
    partners: Mutex<Vec<FeedPartner>>,
    objectives: Mutex<Vec<Objective>>,
    signals: Mutex<Vec<Signal>>,
    insights: Mutex<Vec<Insight>>,
    weights: Mutex<HashMap<Uuid, PreferenceWeights>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_partner(&self, user_id: Uuid, name: &str, rss_url: &str) -> FeedPartner {
        let partner = FeedPartner {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_owned(),
            rss_url: rss_url.to_owned(),
        };
        lock(&self.partners).push(partner.clone());
        partner
    }

    pub fn add_objective(&self, objective: Objective) {
        lock(&self.objectives).push(objective);
    }

    /// Delete an objective, orphaning its insights.
    pub fn remove_objective(&self, objective_id: Uuid) {
        lock(&self.objectives).retain(|o| o.id != objective_id);
        for insight in lock(&self.insights).iter_mut() {
            if insight.objective_id == Some(objective_id) {
                insight.objective_id = None;
            }
        }
    }

    #[must_use]
    pub fn signals(&self) -> Vec<Signal> {
        lock(&self.signals).clone()
    }

    #[must_use]
    pub fn insights(&self) -> Vec<Insight> {
        lock(&self.insights).clone()
    }

    #[must_use]
    pub fn insight(&self, id: Uuid) -> Option<Insight> {
        lock(&self.insights).iter().find(|i| i.id == id).cloned()
    }

    fn signal_owner(&self, signal_id: Uuid) -> Option<(Signal, FeedPartner)> {
        let signal = lock(&self.signals)
            .iter()
            .find(|s| s.id == signal_id)
            .cloned()?;
        let partner = lock(&self.partners)
            .iter()
            .find(|p| p.id == signal.partner_id)
            .cloned()?;
        Some((signal, partner))
    }

    fn owns_insight(&self, insight: &Insight, user_id: Uuid) -> bool {
        self.signal_owner(insight.signal_id)
            .is_some_and(|(_, partner)| partner.user_id == user_id)
    }
}

#[async_trait]
impl SignalStore for MemoryStore {
    async fn signal_exists(&self, dedupe_hash: &str) -> Result<bool, StoreError> {
        Ok(lock(&self.signals)
            .iter()
            .any(|s| s.dedupe_hash == dedupe_hash))
    }

    async fn find_signal_by_hash(&self, dedupe_hash: &str) -> Result<Option<Signal>, StoreError> {
        Ok(lock(&self.signals)
            .iter()
            .find(|s| s.dedupe_hash == dedupe_hash)
            .cloned())
    }

    async fn insert_signal(&self, signal: &NewSignal) -> Result<InsertOutcome<Signal>, StoreError> {
        let mut signals = lock(&self.signals);
        if signals.iter().any(|s| s.dedupe_hash == signal.dedupe_hash) {
            return Ok(InsertOutcome::Duplicate);
        }
        let stored = Signal::from_new(Uuid::new_v4(), signal.clone(), Utc::now());
        signals.push(stored.clone());
        Ok(InsertOutcome::Inserted(stored))
    }
}

#[async_trait]
impl InsightStore for MemoryStore {
    async fn insight_exists(
        &self,
        signal_id: Uuid,
        objective_id: Uuid,
    ) -> Result<bool, StoreError> {
        Ok(lock(&self.insights)
            .iter()
            .any(|i| i.signal_id == signal_id && i.objective_id == Some(objective_id)))
    }

    async fn insert_insight(
        &self,
        signal_id: Uuid,
        draft: &InsightDraft,
    ) -> Result<InsertOutcome<Insight>, StoreError> {
        let mut insights = lock(&self.insights);
        let duplicate = draft.objective_id.is_some()
            && insights
                .iter()
                .any(|i| i.signal_id == signal_id && i.objective_id == draft.objective_id);
        if duplicate {
            return Ok(InsertOutcome::Duplicate);
        }
        let stored = Insight::from_draft(Uuid::new_v4(), signal_id, draft.clone(), Utc::now());
        insights.push(stored.clone());
        Ok(InsertOutcome::Inserted(stored))
    }

    async fn find_owned(
        &self,
        insight_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<OwnedInsight>, StoreError> {
        let Some(insight) = self.insight(insight_id) else {
            return Ok(None);
        };
        let Some((signal, partner)) = self.signal_owner(insight.signal_id) else {
            return Ok(None);
        };
        if partner.user_id != user_id {
            return Ok(None);
        }
        let objective_type = insight.objective_id.and_then(|objective_id| {
            lock(&self.objectives)
                .iter()
                .find(|o| o.id == objective_id)
                .map(|o| o.objective_type)
        });
        Ok(Some(OwnedInsight {
            insight,
            signal_type: signal.signal_type,
            objective_type,
        }))
    }

    async fn set_feedback(&self, insight_id: Uuid, tag: FeedbackTag) -> Result<(), StoreError> {
        if let Some(insight) = lock(&self.insights).iter_mut().find(|i| i.id == insight_id) {
            insight.feedback = Some(tag);
            insight.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn advance_status(
        &self,
        user_id: Uuid,
        ids: &[Uuid],
        target: InsightStatus,
    ) -> Result<StatusUpdate, StoreError> {
        let owned_ids: Vec<Uuid> = self
            .insights()
            .into_iter()
            .filter(|i| ids.contains(&i.id) && self.owns_insight(i, user_id))
            .map(|i| i.id)
            .collect();

        let mut update = StatusUpdate {
            owned: owned_ids.len(),
            updated: 0,
        };
        let now = Utc::now();
        for insight in lock(&self.insights)
            .iter_mut()
            .filter(|i| owned_ids.contains(&i.id))
        {
            if let Ok(next) = insight.status.advance_to(target) {
                if next != insight.status {
                    insight.status = next;
                    insight.updated_at = now;
                    update.updated += 1;
                }
            }
        }
        Ok(update)
    }

    async fn top_insights(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<RankedInsight>, StoreError> {
        let mut ranked: Vec<RankedInsight> = self
            .insights()
            .into_iter()
            .filter_map(|insight| {
                let (signal, partner) = self.signal_owner(insight.signal_id)?;
                (partner.user_id == user_id).then(|| RankedInsight {
                    insight,
                    partner_name: partner.name,
                    signal_title: signal.title,
                    signal_url: signal.source_url,
                })
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.insight
                .score
                .cmp(&a.insight.score)
                .then_with(|| b.insight.created_at.cmp(&a.insight.created_at))
        });
        ranked.truncate(limit);
        Ok(ranked)
    }
}

#[async_trait]
impl WeightStore for MemoryStore {
    async fn get_weights(&self, user_id: Uuid) -> Result<PreferenceWeights, StoreError> {
        Ok(lock(&self.weights)
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn apply_adjustment(
        &self,
        user_id: Uuid,
        key: WeightKey,
        delta: f64,
    ) -> Result<f64, StoreError> {
        Ok(lock(&self.weights)
            .entry(user_id)
            .or_default()
            .apply(key, delta))
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_feed_partners(
        &self,
        user_id: Option<Uuid>,
        limit: usize,
    ) -> Result<Vec<FeedPartner>, StoreError> {
        Ok(lock(&self.partners)
            .iter()
            .filter(|p| !p.rss_url.trim().is_empty())
            .filter(|p| user_id.map_or(true, |u| p.user_id == u))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_objectives(&self, user_id: Uuid) -> Result<Vec<Objective>, StoreError> {
        let mut objectives: Vec<Objective> = lock(&self.objectives)
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        objectives.sort_by_key(|o| o.priority);
        Ok(objectives)
    }
}
