//! Feedback, approval, and digest command handlers.
//!
//! All three act on behalf of an explicit `--user`; insights owned by other
//! users are reported as not found.

use partneros_core::{FeedbackTag, InsightStatus};
use partneros_db::PgStore;
use uuid::Uuid;

/// # Errors
///
/// Returns an error if the insight is not the user's or the store fails.
pub(crate) async fn run_feedback(
    pool: &sqlx::PgPool,
    user: Uuid,
    insight: Uuid,
    tag: FeedbackTag,
) -> anyhow::Result<()> {
    let store = PgStore::new(pool.clone());
    let outcome = partneros_insights::record_feedback(&store, &store, insight, tag, user).await?;

    match outcome.objective_type_weight {
        Some(objective) => println!(
            "recorded {tag}: signal weight {:.2}, objective weight {objective:.2}",
            outcome.signal_type_weight
        ),
        None => println!(
            "recorded {tag}: signal weight {:.2}",
            outcome.signal_type_weight
        ),
    }
    Ok(())
}

/// # Errors
///
/// Returns an error for an invalid batch, when no id is the user's, or when
/// the store fails.
pub(crate) async fn run_approve(
    pool: &sqlx::PgPool,
    user: Uuid,
    status: InsightStatus,
    ids: &[Uuid],
) -> anyhow::Result<()> {
    let store = PgStore::new(pool.clone());
    let update = partneros_insights::advance_status(&store, ids, status, user).await?;
    println!(
        "moved {} of {} insights to {status}",
        update.updated, update.owned
    );
    Ok(())
}

/// # Errors
///
/// Returns an error if the store fails or the digest cannot be serialized.
pub(crate) async fn run_digest(
    pool: &sqlx::PgPool,
    user: Uuid,
    limit: usize,
    json: bool,
) -> anyhow::Result<()> {
    let store = PgStore::new(pool.clone());
    let digest = partneros_insights::build_digest(&store, user, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&digest)?);
        return Ok(());
    }

    if digest.is_empty() {
        println!("no insights yet");
        return Ok(());
    }
    for (rank, item) in digest.iter().enumerate() {
        println!(
            "{}. [{}] {} - {}\n   {}\n   next: {}\n   {}",
            rank + 1,
            item.score,
            item.partner,
            item.signal_title,
            item.why,
            item.action,
            item.signal_url
        );
    }
    Ok(())
}
