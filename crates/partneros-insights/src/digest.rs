use serde::Serialize;
use uuid::Uuid;

use crate::error::InsightError;
use crate::store::{InsightStore, RankedInsight};

pub const DEFAULT_DIGEST_LIMIT: usize = 10;

const DEFAULT_ACTION: &str = "Reach out";

/// One line of a user's insight digest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestItem {
    pub insight_id: Uuid,
    pub partner: String,
    pub signal_title: String,
    pub signal_url: String,
    pub score: u8,
    pub why: String,
    pub recommendation: String,
    pub action: String,
    pub outreach_draft: String,
}

impl From<RankedInsight> for DigestItem {
    fn from(ranked: RankedInsight) -> Self {
        let action = ranked
            .insight
            .actions
            .first()
            .map_or_else(|| DEFAULT_ACTION.to_owned(), |a| a.label.clone());
        Self {
            insight_id: ranked.insight.id,
            partner: ranked.partner_name,
            signal_title: ranked.signal_title,
            signal_url: ranked.signal_url,
            score: ranked.insight.score,
            why: ranked.insight.why,
            recommendation: ranked.insight.recommendation,
            action,
            outreach_draft: ranked.insight.outreach_draft,
        }
    }
}

/// The user's highest-scoring insights, newest first among equal scores.
///
/// # Errors
///
/// Returns [`InsightError::Store`] on backend failure.
pub async fn build_digest(
    insights: &dyn InsightStore,
    user_id: Uuid,
    limit: usize,
) -> Result<Vec<DigestItem>, InsightError> {
    let ranked = insights.top_insights(user_id, limit).await?;
    tracing::debug!(%user_id, items = ranked.len(), "built insight digest");
    Ok(ranked.into_iter().map(DigestItem::from).collect())
}
