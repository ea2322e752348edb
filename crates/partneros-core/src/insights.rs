use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreError;

/// Itemized account of how an insight score was produced.
///
/// Built once by the base scorer; the only derived form is the blended
/// breakdown returned by [`ScoreBreakdown::with_llm_adjustment`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    base_score: f64,
    recency_multiplier: f64,
    priority_multiplier: f64,
    objective_match_bonus: f64,
    llm_adjustment: f64,
    signal_strength: f64,
    objective_fit: f64,
}

impl ScoreBreakdown {
    /// `base_score` is the preference-weighted category weight.
    #[must_use]
    pub fn new(
        base_score: f64,
        recency_multiplier: f64,
        priority_multiplier: f64,
        objective_match_bonus: f64,
        signal_strength: f64,
        objective_fit: f64,
    ) -> Self {
        Self {
            base_score,
            recency_multiplier,
            priority_multiplier,
            objective_match_bonus,
            llm_adjustment: 0.0,
            signal_strength,
            objective_fit,
        }
    }

    #[must_use]
    pub fn with_llm_adjustment(self, llm_adjustment: f64) -> Self {
        Self {
            llm_adjustment,
            ..self
        }
    }

    #[must_use]
    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    #[must_use]
    pub fn recency_multiplier(&self) -> f64 {
        self.recency_multiplier
    }

    #[must_use]
    pub fn priority_multiplier(&self) -> f64 {
        self.priority_multiplier
    }

    #[must_use]
    pub fn objective_match_bonus(&self) -> f64 {
        self.objective_match_bonus
    }

    #[must_use]
    pub fn llm_adjustment(&self) -> f64 {
        self.llm_adjustment
    }

    #[must_use]
    pub fn signal_strength(&self) -> f64 {
        self.signal_strength
    }

    #[must_use]
    pub fn objective_fit(&self) -> f64 {
        self.objective_fit
    }
}

/// A suggested follow-up step attached to an insight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedAction {
    pub label: String,
    pub owner_hint: String,
    pub due_in_days: u32,
}

impl SuggestedAction {
    /// The action used whenever no better suggestion is available.
    #[must_use]
    pub fn reach_out() -> Self {
        Self {
            label: "Reach out to partner".to_string(),
            owner_hint: "Partner Manager".to_string(),
            due_in_days: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTag {
    ThumbsUp,
    ThumbsDown,
    Na,
}

impl FeedbackTag {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackTag::ThumbsUp => "thumbs_up",
            FeedbackTag::ThumbsDown => "thumbs_down",
            FeedbackTag::Na => "na",
        }
    }

    /// Additive adjustment applied to the user's preference weights.
    #[must_use]
    pub fn weight_delta(self) -> f64 {
        match self {
            FeedbackTag::ThumbsUp => 0.10,
            FeedbackTag::ThumbsDown => -0.10,
            FeedbackTag::Na => -0.15,
        }
    }
}

impl std::fmt::Display for FeedbackTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackTag {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thumbs_up" => Ok(FeedbackTag::ThumbsUp),
            "thumbs_down" => Ok(FeedbackTag::ThumbsDown),
            "na" => Ok(FeedbackTag::Na),
            other => Err(CoreError::UnknownFeedbackTag(other.to_string())),
        }
    }
}

/// Workflow status. Variants are declared in workflow order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InsightStatus {
    #[default]
    Pending,
    ReadyToSend,
    Approved,
    Sent,
}

impl InsightStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            InsightStatus::Pending => "pending",
            InsightStatus::ReadyToSend => "ready_to_send",
            InsightStatus::Approved => "approved",
            InsightStatus::Sent => "sent",
        }
    }

    /// Move to `target`, which may skip steps but never go backward.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidStatusTransition`] if `target` precedes `self`.
    pub fn advance_to(self, target: InsightStatus) -> Result<InsightStatus, CoreError> {
        if target < self {
            return Err(CoreError::InvalidStatusTransition {
                from: self,
                to: target,
            });
        }
        Ok(target)
    }
}

impl std::fmt::Display for InsightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsightStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InsightStatus::Pending),
            "ready_to_send" => Ok(InsightStatus::ReadyToSend),
            "approved" => Ok(InsightStatus::Approved),
            "sent" => Ok(InsightStatus::Sent),
            other => Err(CoreError::UnknownInsightStatus(other.to_string())),
        }
    }
}

/// Synthesizer output for one (signal, objective) pair, not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightDraft {
    pub objective_id: Option<Uuid>,
    /// Final blended score, 0..=100.
    pub score: u8,
    pub breakdown: ScoreBreakdown,
    pub why: String,
    pub recommendation: String,
    pub actions: Vec<SuggestedAction>,
    pub outreach_draft: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: Uuid,
    pub signal_id: Uuid,
    /// `None` once the objective has been deleted.
    pub objective_id: Option<Uuid>,
    pub score: u8,
    pub breakdown: ScoreBreakdown,
    pub why: String,
    pub recommendation: String,
    pub actions: Vec<SuggestedAction>,
    pub outreach_draft: String,
    pub feedback: Option<FeedbackTag>,
    pub status: InsightStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Insight {
    /// Materialize a freshly stored insight from a synthesizer draft.
    #[must_use]
    pub fn from_draft(
        id: Uuid,
        signal_id: Uuid,
        draft: InsightDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            signal_id,
            objective_id: draft.objective_id,
            score: draft.score,
            breakdown: draft.breakdown,
            why: draft.why,
            recommendation: draft.recommendation,
            actions: draft.actions,
            outreach_draft: draft.outreach_draft,
            feedback: None,
            status: InsightStatus::Pending,
            created_at,
            updated_at: created_at,
        }
    }
}
