use partneros_core::InsightStatus;
use uuid::Uuid;

use crate::error::InsightError;
use crate::store::{InsightStore, StatusUpdate};

pub const MAX_BATCH_IDS: usize = 50;

/// Advance the caller's insights to `target`.
///
/// Ids belonging to other users are ignored; insights already at or past
/// `target` keep their status.
///
/// # Errors
///
/// - [`InsightError::InvalidRequest`] for an empty or oversized batch, or a
///   `Pending` target.
/// - [`InsightError::NoneOwned`] when no id belongs to the caller.
/// - [`InsightError::Store`] on backend failure.
pub async fn advance_status(
    insights: &dyn InsightStore,
    ids: &[Uuid],
    target: InsightStatus,
    user_id: Uuid,
) -> Result<StatusUpdate, InsightError> {
    if ids.is_empty() {
        return Err(InsightError::InvalidRequest(
            "at least one insight id is required".to_owned(),
        ));
    }
    if ids.len() > MAX_BATCH_IDS {
        return Err(InsightError::InvalidRequest(format!(
            "at most {MAX_BATCH_IDS} insights can be updated at once"
        )));
    }
    if target == InsightStatus::Pending {
        return Err(InsightError::InvalidRequest(
            "insights cannot be moved back to pending".to_owned(),
        ));
    }

    let update = insights.advance_status(user_id, ids, target).await?;
    if update.owned == 0 {
        return Err(InsightError::NoneOwned);
    }

    tracing::info!(
        %user_id,
        status = %target,
        requested = ids.len(),
        owned = update.owned,
        updated = update.updated,
        "advanced insight status"
    );
    Ok(update)
}
