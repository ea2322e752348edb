use partneros_core::{FeedbackTag, WeightKey};
use uuid::Uuid;

use crate::error::InsightError;
use crate::store::{InsightStore, WeightStore};

/// Weights after a feedback submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackOutcome {
    pub signal_type_weight: f64,
    /// `None` when the insight's objective no longer exists.
    pub objective_type_weight: Option<f64>,
}

/// Record `tag` on the caller's insight and nudge their preference weights.
///
/// # Errors
///
/// Returns [`InsightError::NotFound`] before any write when the insight does
/// not exist or belongs to another user, and [`InsightError::Store`] on
/// backend failure.
pub async fn record_feedback(
    insights: &dyn InsightStore,
    weights: &dyn WeightStore,
    insight_id: Uuid,
    tag: FeedbackTag,
    user_id: Uuid,
) -> Result<FeedbackOutcome, InsightError> {
    let owned = insights
        .find_owned(insight_id, user_id)
        .await?
        .ok_or(InsightError::NotFound(insight_id))?;

    insights.set_feedback(insight_id, tag).await?;

    let delta = tag.weight_delta();
    let signal_type_weight = weights
        .apply_adjustment(user_id, WeightKey::Signal(owned.signal_type), delta)
        .await?;

    let objective_type_weight = match owned.objective_type {
        Some(objective_type) => Some(
            weights
                .apply_adjustment(user_id, WeightKey::Objective(objective_type), delta)
                .await?,
        ),
        None => None,
    };

    tracing::info!(
        %insight_id,
        %user_id,
        feedback = %tag,
        signal_type_weight,
        ?objective_type_weight,
        "recorded insight feedback"
    );

    Ok(FeedbackOutcome {
        signal_type_weight,
        objective_type_weight,
    })
}
