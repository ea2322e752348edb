use partneros_core::{PreferenceWeights, WeightKey, WEIGHT_CEILING, WEIGHT_FLOOR};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{parse_column, DbError};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WeightRow {
    pub weight_kind: String,
    pub weight_key: String,
    pub weight: f64,
}

/// Fold stored rows into a weight map. Missing keys stay neutral.
///
/// # Errors
///
/// Returns [`DbError::Corrupt`] for an unknown kind or key.
pub fn weights_from_rows(rows: Vec<WeightRow>) -> Result<PreferenceWeights, DbError> {
    let mut weights = PreferenceWeights::default();
    for row in rows {
        match row.weight_kind.as_str() {
            "signal_type" => {
                let key = parse_column("weight_key", &row.weight_key)?;
                weights.signal_type_weights.insert(key, row.weight);
            }
            "objective_type" => {
                let key = parse_column("weight_key", &row.weight_key)?;
                weights.objective_type_weights.insert(key, row.weight);
            }
            other => {
                return Err(DbError::Corrupt(format!("weight_kind: {other}")));
            }
        }
    }
    Ok(weights)
}

/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn list_weights(pool: &PgPool, user_id: Uuid) -> Result<Vec<WeightRow>, DbError> {
    Ok(sqlx::query_as::<_, WeightRow>(
        "SELECT weight_kind, weight_key, weight FROM user_preference_weights \
         WHERE user_id = $1 \
         ORDER BY weight_kind, weight_key",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Add `delta` to one weight in a single statement and return the stored,
/// clamped value. A missing row starts from neutral 1.0.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn apply_weight_adjustment(
    pool: &PgPool,
    user_id: Uuid,
    key: WeightKey,
    delta: f64,
) -> Result<f64, DbError> {
    Ok(sqlx::query_scalar::<_, f64>(
        "INSERT INTO user_preference_weights (user_id, weight_kind, weight_key, weight) \
         VALUES ($1, $2, $3, LEAST($5, GREATEST($4, 1.0 + $6))) \
         ON CONFLICT (user_id, weight_kind, weight_key) DO UPDATE SET \
           weight = LEAST($5, GREATEST($4, user_preference_weights.weight + $6)), \
           updated_at = NOW() \
         RETURNING weight",
    )
    .bind(user_id)
    .bind(key.kind())
    .bind(key.name())
    .bind(WEIGHT_FLOOR)
    .bind(WEIGHT_CEILING)
    .bind(delta)
    .fetch_one(pool)
    .await?)
}
