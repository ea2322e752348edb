use partneros_core::Objective;
use partneros_insights::FeedPartner;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{parse_column, DbError};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PartnerRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub rss_url: String,
}

impl From<PartnerRow> for FeedPartner {
    fn from(row: PartnerRow) -> Self {
        FeedPartner {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            rss_url: row.rss_url,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ObjectiveRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub objective_type: String,
    pub detail: Option<String>,
    pub priority: i16,
}

impl TryFrom<ObjectiveRow> for Objective {
    type Error = DbError;

    fn try_from(row: ObjectiveRow) -> Result<Self, Self::Error> {
        Ok(Objective {
            id: row.id,
            user_id: row.user_id,
            objective_type: parse_column("objective_type", &row.objective_type)?,
            detail: row.detail,
            priority: row.priority,
        })
    }
}

/// Partners that have a non-empty feed URL, optionally for one user.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn list_feed_partners(
    pool: &PgPool,
    user_id: Option<Uuid>,
    limit: i64,
) -> Result<Vec<PartnerRow>, DbError> {
    Ok(sqlx::query_as::<_, PartnerRow>(
        "SELECT id, user_id, name, rss_url FROM partners \
         WHERE rss_url IS NOT NULL AND btrim(rss_url) <> '' \
           AND ($1::UUID IS NULL OR user_id = $1) \
         ORDER BY created_at, id \
         LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?)
}

/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn list_objectives(pool: &PgPool, user_id: Uuid) -> Result<Vec<ObjectiveRow>, DbError> {
    Ok(sqlx::query_as::<_, ObjectiveRow>(
        "SELECT id, user_id, objective_type::TEXT, detail, priority FROM objectives \
         WHERE user_id = $1 \
         ORDER BY priority, created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}
