use chrono::{DateTime, Utc};
use partneros_core::{
    FeedbackTag, Insight, InsightDraft, InsightStatus, ScoreBreakdown, SuggestedAction,
};
use partneros_insights::{OwnedInsight, RankedInsight, StatusUpdate};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{parse_column, DbError};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InsightRow {
    pub id: Uuid,
    pub signal_id: Uuid,
    pub objective_id: Option<Uuid>,
    pub score: i16,
    pub score_breakdown: Json<ScoreBreakdown>,
    pub why: String,
    pub recommendation: String,
    pub actions: Json<Vec<SuggestedAction>>,
    pub outreach_draft: String,
    pub feedback: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<InsightRow> for Insight {
    type Error = DbError;

    fn try_from(row: InsightRow) -> Result<Self, Self::Error> {
        let score = u8::try_from(row.score)
            .ok()
            .filter(|s| *s <= 100)
            .ok_or_else(|| DbError::Corrupt(format!("score out of range: {}", row.score)))?;
        let feedback = row
            .feedback
            .as_deref()
            .map(|f| parse_column::<FeedbackTag>("feedback", f))
            .transpose()?;

        Ok(Insight {
            id: row.id,
            signal_id: row.signal_id,
            objective_id: row.objective_id,
            score,
            breakdown: row.score_breakdown.0,
            why: row.why,
            recommendation: row.recommendation,
            actions: row.actions.0,
            outreach_draft: row.outreach_draft,
            feedback,
            status: parse_column("status", &row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnedInsightRow {
    #[sqlx(flatten)]
    pub insight: InsightRow,
    pub signal_type: String,
    pub objective_type: Option<String>,
}

impl TryFrom<OwnedInsightRow> for OwnedInsight {
    type Error = DbError;

    fn try_from(row: OwnedInsightRow) -> Result<Self, Self::Error> {
        Ok(OwnedInsight {
            insight: row.insight.try_into()?,
            signal_type: parse_column("signal_type", &row.signal_type)?,
            objective_type: row
                .objective_type
                .as_deref()
                .map(|t| parse_column("objective_type", t))
                .transpose()?,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RankedInsightRow {
    #[sqlx(flatten)]
    pub insight: InsightRow,
    pub partner_name: String,
    pub signal_title: String,
    pub signal_url: String,
}

impl TryFrom<RankedInsightRow> for RankedInsight {
    type Error = DbError;

    fn try_from(row: RankedInsightRow) -> Result<Self, Self::Error> {
        Ok(RankedInsight {
            insight: row.insight.try_into()?,
            partner_name: row.partner_name,
            signal_title: row.signal_title,
            signal_url: row.signal_url,
        })
    }
}

/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn insight_exists(
    pool: &PgPool,
    signal_id: Uuid,
    objective_id: Uuid,
) -> Result<bool, DbError> {
    Ok(sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS ( \
             SELECT 1 FROM insights WHERE signal_id = $1 AND objective_id = $2 \
         )",
    )
    .bind(signal_id)
    .bind(objective_id)
    .fetch_one(pool)
    .await?)
}

/// Insert an insight for `signal_id`. Returns `None` when the
/// (signal, objective) pair already has one.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn insert_insight(
    pool: &PgPool,
    signal_id: Uuid,
    draft: &InsightDraft,
) -> Result<Option<InsightRow>, DbError> {
    let row = sqlx::query_as::<_, InsightRow>(
        "INSERT INTO insights \
           (signal_id, objective_id, score, score_breakdown, why, recommendation, \
            actions, outreach_draft) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (signal_id, objective_id) DO NOTHING \
         RETURNING id, signal_id, objective_id, score, score_breakdown, why, recommendation, \
                   actions, outreach_draft, feedback::TEXT, status::TEXT, created_at, updated_at",
    )
    .bind(signal_id)
    .bind(draft.objective_id)
    .bind(i16::from(draft.score))
    .bind(Json(&draft.breakdown))
    .bind(&draft.why)
    .bind(&draft.recommendation)
    .bind(Json(&draft.actions))
    .bind(&draft.outreach_draft)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Fetch an insight only if its signal's partner belongs to `user_id`.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn find_owned_insight(
    pool: &PgPool,
    insight_id: Uuid,
    user_id: Uuid,
) -> Result<Option<OwnedInsightRow>, DbError> {
    let row = sqlx::query_as::<_, OwnedInsightRow>(
        "SELECT i.id, i.signal_id, i.objective_id, i.score, i.score_breakdown, i.why, \
                i.recommendation, i.actions, i.outreach_draft, i.feedback::TEXT, \
                i.status::TEXT, i.created_at, i.updated_at, \
                s.signal_type::TEXT AS signal_type, \
                o.objective_type::TEXT AS objective_type \
         FROM insights i \
         JOIN signals s ON s.id = i.signal_id \
         JOIN partners p ON p.id = s.partner_id \
         LEFT JOIN objectives o ON o.id = i.objective_id \
         WHERE i.id = $1 AND p.user_id = $2",
    )
    .bind(insight_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn set_feedback(pool: &PgPool, insight_id: Uuid, tag: FeedbackTag) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE insights SET feedback = $2::feedback_tag, updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(insight_id)
    .bind(tag.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

/// Move the caller's insights among `ids` forward to `target`.
///
/// `insight_status` is declared in workflow order, so `status < target`
/// selects exactly the rows that would move forward.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn advance_insight_status(
    pool: &PgPool,
    user_id: Uuid,
    ids: &[Uuid],
    target: InsightStatus,
) -> Result<StatusUpdate, DbError> {
    let mut tx = pool.begin().await?;

    let owned = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM insights i \
         JOIN signals s ON s.id = i.signal_id \
         JOIN partners p ON p.id = s.partner_id \
         WHERE i.id = ANY($1) AND p.user_id = $2",
    )
    .bind(ids)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    let updated = sqlx::query(
        "UPDATE insights i SET status = $3::insight_status, updated_at = NOW() \
         FROM signals s, partners p \
         WHERE s.id = i.signal_id AND p.id = s.partner_id \
           AND i.id = ANY($1) AND p.user_id = $2 \
           AND i.status < $3::insight_status",
    )
    .bind(ids)
    .bind(user_id)
    .bind(target.as_str())
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;

    Ok(StatusUpdate {
        owned: usize::try_from(owned).unwrap_or(0),
        updated: usize::try_from(updated).unwrap_or(0),
    })
}

/// The caller's insights joined with signal and partner, highest score first.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn top_insights(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<RankedInsightRow>, DbError> {
    let rows = sqlx::query_as::<_, RankedInsightRow>(
        "SELECT i.id, i.signal_id, i.objective_id, i.score, i.score_breakdown, i.why, \
                i.recommendation, i.actions, i.outreach_draft, i.feedback::TEXT, \
                i.status::TEXT, i.created_at, i.updated_at, \
                p.name AS partner_name, s.title AS signal_title, s.source_url AS signal_url \
         FROM insights i \
         JOIN signals s ON s.id = i.signal_id \
         JOIN partners p ON p.id = s.partner_id \
         WHERE p.user_id = $1 \
         ORDER BY i.score DESC, i.created_at DESC \
         LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use partneros_core::{ObjectiveType, SignalType};

    use super::*;

    fn row(score: i16, feedback: Option<&str>, status: &str) -> InsightRow {
        InsightRow {
            id: Uuid::new_v4(),
            signal_id: Uuid::new_v4(),
            objective_id: None,
            score,
            score_breakdown: Json(ScoreBreakdown::new(40.0, 1.0, 1.5, 30.0, 40.0, 45.0)),
            why: "Listed on AWS.".to_string(),
            recommendation: "Reach out.".to_string(),
            actions: Json(vec![SuggestedAction::reach_out()]),
            outreach_draft: "Hi there,".to_string(),
            feedback: feedback.map(str::to_string),
            status: status.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn maps_row_into_insight() {
        let insight = Insight::try_from(row(85, Some("thumbs_up"), "approved")).unwrap();
        assert_eq!(insight.score, 85);
        assert_eq!(insight.feedback, Some(FeedbackTag::ThumbsUp));
        assert_eq!(insight.status, InsightStatus::Approved);
        assert_eq!(insight.actions, vec![SuggestedAction::reach_out()]);
    }

    #[test]
    fn out_of_range_score_is_corrupt() {
        assert!(matches!(
            Insight::try_from(row(101, None, "pending")),
            Err(DbError::Corrupt(_))
        ));
        assert!(matches!(
            Insight::try_from(row(-1, None, "pending")),
            Err(DbError::Corrupt(_))
        ));
    }

    #[test]
    fn owned_row_keeps_missing_objective_type() {
        let owned = OwnedInsight::try_from(OwnedInsightRow {
            insight: row(50, None, "pending"),
            signal_type: "hire".to_string(),
            objective_type: None,
        })
        .unwrap();
        assert_eq!(owned.signal_type, SignalType::Hire);
        assert_eq!(owned.objective_type, None);

        let owned = OwnedInsight::try_from(OwnedInsightRow {
            insight: row(50, None, "pending"),
            signal_type: "hire".to_string(),
            objective_type: Some("co_sell".to_string()),
        })
        .unwrap();
        assert_eq!(owned.objective_type, Some(ObjectiveType::CoSell));
    }
}
