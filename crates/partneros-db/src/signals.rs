use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use partneros_core::{NewSignal, Signal};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{parse_column, DbError};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SignalRow {
    pub id: Uuid,
    pub partner_id: Uuid,
    pub signal_type: String,
    pub title: String,
    pub source_url: String,
    pub summary: String,
    pub facets: Option<Json<BTreeMap<String, serde_json::Value>>>,
    pub published_at: Option<DateTime<Utc>>,
    pub dedupe_hash: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SignalRow> for Signal {
    type Error = DbError;

    fn try_from(row: SignalRow) -> Result<Self, Self::Error> {
        Ok(Signal {
            id: row.id,
            partner_id: row.partner_id,
            signal_type: parse_column("signal_type", &row.signal_type)?,
            title: row.title,
            source_url: row.source_url,
            summary: row.summary,
            facets: row.facets.map(|Json(facets)| facets),
            published_at: row.published_at,
            dedupe_hash: row.dedupe_hash,
            created_at: row.created_at,
        })
    }
}

/// Whether a signal with this dedupe fingerprint is already stored.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn signal_exists(pool: &PgPool, dedupe_hash: &str) -> Result<bool, DbError> {
    Ok(sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM signals WHERE dedupe_hash = $1)",
    )
    .bind(dedupe_hash)
    .fetch_one(pool)
    .await?)
}

/// Fetch the stored signal holding this dedupe fingerprint.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn find_signal_by_hash(
    pool: &PgPool,
    dedupe_hash: &str,
) -> Result<Option<SignalRow>, DbError> {
    let row = sqlx::query_as::<_, SignalRow>(
        "SELECT id, partner_id, signal_type::TEXT AS signal_type, title, source_url, summary, \
                facets, published_at, dedupe_hash, created_at \
         FROM signals \
         WHERE dedupe_hash = $1",
    )
    .bind(dedupe_hash)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert a signal. Returns `None` when another row already holds its
/// `dedupe_hash`.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn insert_signal(
    pool: &PgPool,
    signal: &NewSignal,
) -> Result<Option<SignalRow>, DbError> {
    let row = sqlx::query_as::<_, SignalRow>(
        "INSERT INTO signals \
           (partner_id, signal_type, title, source_url, summary, facets, published_at, dedupe_hash) \
         VALUES ($1, $2::signal_type, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (dedupe_hash) DO NOTHING \
         RETURNING id, partner_id, signal_type::TEXT, title, source_url, summary, facets, \
                   published_at, dedupe_hash, created_at",
    )
    .bind(signal.partner_id)
    .bind(signal.signal_type.as_str())
    .bind(&signal.title)
    .bind(&signal.source_url)
    .bind(&signal.summary)
    .bind(signal.facets.as_ref().map(Json))
    .bind(signal.published_at)
    .bind(&signal.dedupe_hash)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
