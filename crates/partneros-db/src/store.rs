//! Postgres implementation of the pipeline's storage traits.

use async_trait::async_trait;
use partneros_core::{
    FeedbackTag, Insight, InsightDraft, InsightStatus, NewSignal, Objective, PreferenceWeights,
    Signal, WeightKey,
};
use partneros_insights::{
    CatalogStore, FeedPartner, InsertOutcome, InsightStore, OwnedInsight, RankedInsight,
    SignalStore, StatusUpdate, StoreError, WeightStore,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{catalog, insights, preferences, signals, DbError};

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Corrupt(detail) => StoreError::Corrupt(detail),
            other => StoreError::backend(other),
        }
    }
}

fn to_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SignalStore for PgStore {
    async fn signal_exists(&self, dedupe_hash: &str) -> Result<bool, StoreError> {
        Ok(signals::signal_exists(&self.pool, dedupe_hash).await?)
    }

    async fn find_signal_by_hash(&self, dedupe_hash: &str) -> Result<Option<Signal>, StoreError> {
        signals::find_signal_by_hash(&self.pool, dedupe_hash)
            .await?
            .map(Signal::try_from)
            .transpose()
            .map_err(StoreError::from)
    }

    async fn insert_signal(&self, signal: &NewSignal) -> Result<InsertOutcome<Signal>, StoreError> {
        match signals::insert_signal(&self.pool, signal).await? {
            Some(row) => Ok(InsertOutcome::Inserted(Signal::try_from(row)?)),
            None => Ok(InsertOutcome::Duplicate),
        }
    }
}

#[async_trait]
impl InsightStore for PgStore {
    async fn insight_exists(
        &self,
        signal_id: Uuid,
        objective_id: Uuid,
    ) -> Result<bool, StoreError> {
        Ok(insights::insight_exists(&self.pool, signal_id, objective_id).await?)
    }

    async fn insert_insight(
        &self,
        signal_id: Uuid,
        draft: &InsightDraft,
    ) -> Result<InsertOutcome<Insight>, StoreError> {
        match insights::insert_insight(&self.pool, signal_id, draft).await? {
            Some(row) => Ok(InsertOutcome::Inserted(Insight::try_from(row)?)),
            None => Ok(InsertOutcome::Duplicate),
        }
    }

    async fn find_owned(
        &self,
        insight_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<OwnedInsight>, StoreError> {
        insights::find_owned_insight(&self.pool, insight_id, user_id)
            .await?
            .map(OwnedInsight::try_from)
            .transpose()
            .map_err(StoreError::from)
    }

    async fn set_feedback(&self, insight_id: Uuid, tag: FeedbackTag) -> Result<(), StoreError> {
        Ok(insights::set_feedback(&self.pool, insight_id, tag).await?)
    }

    async fn advance_status(
        &self,
        user_id: Uuid,
        ids: &[Uuid],
        target: InsightStatus,
    ) -> Result<StatusUpdate, StoreError> {
        Ok(insights::advance_insight_status(&self.pool, user_id, ids, target).await?)
    }

    async fn top_insights(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<RankedInsight>, StoreError> {
        insights::top_insights(&self.pool, user_id, to_limit(limit))
            .await?
            .into_iter()
            .map(|row| RankedInsight::try_from(row).map_err(StoreError::from))
            .collect()
    }
}

#[async_trait]
impl WeightStore for PgStore {
    async fn get_weights(&self, user_id: Uuid) -> Result<PreferenceWeights, StoreError> {
        let rows = preferences::list_weights(&self.pool, user_id).await?;
        Ok(preferences::weights_from_rows(rows)?)
    }

    async fn apply_adjustment(
        &self,
        user_id: Uuid,
        key: WeightKey,
        delta: f64,
    ) -> Result<f64, StoreError> {
        Ok(preferences::apply_weight_adjustment(&self.pool, user_id, key, delta).await?)
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn list_feed_partners(
        &self,
        user_id: Option<Uuid>,
        limit: usize,
    ) -> Result<Vec<FeedPartner>, StoreError> {
        let rows = catalog::list_feed_partners(&self.pool, user_id, to_limit(limit)).await?;
        Ok(rows.into_iter().map(FeedPartner::from).collect())
    }

    async fn list_objectives(&self, user_id: Uuid) -> Result<Vec<Objective>, StoreError> {
        catalog::list_objectives(&self.pool, user_id)
            .await?
            .into_iter()
            .map(|row| Objective::try_from(row).map_err(StoreError::from))
            .collect()
    }
}
