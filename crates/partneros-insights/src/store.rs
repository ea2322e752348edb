//! Storage seams used by the pipeline.
//!
//! Uniqueness conflicts are reported as [`InsertOutcome::Duplicate`], never as
//! errors: the backing store decides which concurrent writer wins.

use async_trait::async_trait;
use partneros_core::{
    FeedbackTag, Insight, InsightDraft, InsightStatus, NewSignal, Objective, ObjectiveType,
    PreferenceWeights, Signal, SignalType, WeightKey,
};
use uuid::Uuid;

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome<T> {
    Inserted(T),
    Duplicate,
}

impl<T> InsertOutcome<T> {
    #[must_use]
    pub fn inserted(self) -> Option<T> {
        match self {
            InsertOutcome::Inserted(value) => Some(value),
            InsertOutcome::Duplicate => None,
        }
    }
}

/// A partner with a feed to ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPartner {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub rss_url: String,
}

/// An insight together with the context needed to learn from feedback on it.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedInsight {
    pub insight: Insight,
    pub signal_type: SignalType,
    /// `None` when the objective has since been deleted.
    pub objective_type: Option<ObjectiveType>,
}

/// An insight joined with its signal and partner for ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedInsight {
    pub insight: Insight,
    pub partner_name: String,
    pub signal_title: String,
    pub signal_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusUpdate {
    /// Requested ids that belong to the caller.
    pub owned: usize,
    /// Owned ids whose status actually moved.
    pub updated: usize,
}

#[async_trait]
pub trait SignalStore: Send + Sync {
    async fn signal_exists(&self, dedupe_hash: &str) -> Result<bool, StoreError>;

    async fn find_signal_by_hash(&self, dedupe_hash: &str) -> Result<Option<Signal>, StoreError>;

    async fn insert_signal(&self, signal: &NewSignal) -> Result<InsertOutcome<Signal>, StoreError>;
}

#[async_trait]
pub trait InsightStore: Send + Sync {
    async fn insight_exists(&self, signal_id: Uuid, objective_id: Uuid)
        -> Result<bool, StoreError>;

    async fn insert_insight(
        &self,
        signal_id: Uuid,
        draft: &InsightDraft,
    ) -> Result<InsertOutcome<Insight>, StoreError>;

    /// Fetch an insight only if its signal's partner belongs to `user_id`.
    async fn find_owned(
        &self,
        insight_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<OwnedInsight>, StoreError>;

    async fn set_feedback(&self, insight_id: Uuid, tag: FeedbackTag) -> Result<(), StoreError>;

    /// Move the caller's insights among `ids` forward to `target`.
    ///
    /// Insights already at or past `target` are left untouched.
    async fn advance_status(
        &self,
        user_id: Uuid,
        ids: &[Uuid],
        target: InsightStatus,
    ) -> Result<StatusUpdate, StoreError>;

    /// The caller's insights, highest score first, newest first on ties.
    async fn top_insights(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<RankedInsight>, StoreError>;
}

#[async_trait]
pub trait WeightStore: Send + Sync {
    /// Missing keys read as neutral 1.0.
    async fn get_weights(&self, user_id: Uuid) -> Result<PreferenceWeights, StoreError>;

    /// Atomically add `delta` to one weight, clamping to `[0.5, 2.0]`.
    ///
    /// Returns the stored value.
    async fn apply_adjustment(
        &self,
        user_id: Uuid,
        key: WeightKey,
        delta: f64,
    ) -> Result<f64, StoreError>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Partners with a feed URL, optionally restricted to one user.
    async fn list_feed_partners(
        &self,
        user_id: Option<Uuid>,
        limit: usize,
    ) -> Result<Vec<FeedPartner>, StoreError>;

    /// A user's objectives ordered by ascending priority number.
    async fn list_objectives(&self, user_id: Uuid) -> Result<Vec<Objective>, StoreError>;
}
