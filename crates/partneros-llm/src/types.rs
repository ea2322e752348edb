use std::collections::BTreeMap;

use partneros_core::{Objective, Signal, SuggestedAction};
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Objective as presented to the generator: formatted label and priority word.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectiveContext {
    #[serde(rename = "type")]
    pub objective_type: String,
    pub detail: Option<String>,
    pub priority: String,
}

impl From<&Objective> for ObjectiveContext {
    fn from(objective: &Objective) -> Self {
        Self {
            objective_type: objective.objective_type.label().to_string(),
            detail: objective.detail.clone(),
            priority: objective.priority_label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalContext {
    pub title: String,
    #[serde(rename = "type")]
    pub signal_type: String,
    pub summary: String,
    pub url: String,
    pub facets: Option<BTreeMap<String, serde_json::Value>>,
}

impl From<&Signal> for SignalContext {
    fn from(signal: &Signal) -> Self {
        Self {
            title: signal.title.clone(),
            signal_type: signal.signal_type.to_string(),
            summary: signal.summary.clone(),
            url: signal.source_url.clone(),
            facets: signal.facets.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisRequest {
    pub objectives: Vec<ObjectiveContext>,
    pub signal: SignalContext,
}

impl SynthesisRequest {
    #[must_use]
    pub fn new(signal: &Signal, objectives: &[Objective]) -> Self {
        Self {
            objectives: objectives.iter().map(ObjectiveContext::from).collect(),
            signal: SignalContext::from(signal),
        }
    }
}

/// Validated generator output.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResponse {
    pub why: String,
    /// Semantic relevance in `[0, 100]`.
    pub score: f64,
    pub recommendation: String,
    /// Never empty.
    pub actions: Vec<SuggestedAction>,
    pub outreach_draft: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSynthesis {
    why: Option<String>,
    score: Option<f64>,
    recommendation: Option<String>,
    actions: Option<Vec<RawAction>>,
    outreach_draft: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAction {
    label: Option<String>,
    owner_hint: Option<String>,
    due_in_days: Option<f64>,
}

impl SynthesisResponse {
    /// Parse generator output defensively.
    ///
    /// Every field must be present and non-empty; `actions` must hold at
    /// least one complete entry. Out-of-range scores are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MalformedResponse`] naming the first problem found.
    pub fn parse(content: &str) -> Result<Self, LlmError> {
        let raw: RawSynthesis = serde_json::from_str(content.trim())
            .map_err(|e| LlmError::MalformedResponse(format!("invalid JSON: {e}")))?;

        let why = required_text(raw.why, "why")?;
        let recommendation = required_text(raw.recommendation, "recommendation")?;
        let outreach_draft = required_text(raw.outreach_draft, "outreachDraft")?;

        let score = raw
            .score
            .filter(|s| s.is_finite())
            .ok_or_else(|| LlmError::MalformedResponse("missing numeric score".to_string()))?
            .clamp(0.0, 100.0);

        let actions = raw
            .actions
            .filter(|a| !a.is_empty())
            .ok_or_else(|| LlmError::MalformedResponse("missing actions".to_string()))?
            .into_iter()
            .map(RawAction::validate)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            why,
            score,
            recommendation,
            actions,
            outreach_draft,
        })
    }
}

impl RawAction {
    fn validate(self) -> Result<SuggestedAction, LlmError> {
        let label = required_text(self.label, "actions[].label")?;
        let owner_hint = required_text(self.owner_hint, "actions[].ownerHint")?;
        let due = self
            .due_in_days
            .filter(|d| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| {
                LlmError::MalformedResponse("missing or negative actions[].dueInDays".to_string())
            })?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let due_in_days = due.round().min(f64::from(u32::MAX)) as u32;

        Ok(SuggestedAction {
            label,
            owner_hint,
            due_in_days,
        })
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String, LlmError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| LlmError::MalformedResponse(format!("missing {field}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "why": "The new marketplace listing matches your Marketplace objective.",
        "score": 72,
        "recommendation": "Propose a joint listing.",
        "actions": [{"label": "Email the partner team", "ownerHint": "Partner Manager", "dueInDays": 3}],
        "outreachDraft": "Hi there,\n\nI noticed your launch."
    }"#;

    #[test]
    fn parses_complete_response() {
        let parsed = SynthesisResponse::parse(VALID).unwrap();
        assert!((parsed.score - 72.0).abs() < f64::EPSILON);
        assert_eq!(parsed.actions.len(), 1);
        assert_eq!(parsed.actions[0].owner_hint, "Partner Manager");
        assert_eq!(parsed.actions[0].due_in_days, 3);
    }

    #[test]
    fn clamps_out_of_range_score() {
        let content = VALID.replace("\"score\": 72", "\"score\": 140");
        let parsed = SynthesisResponse::parse(&content).unwrap();
        assert!((parsed.score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rounds_fractional_due_days() {
        let content = VALID.replace("\"dueInDays\": 3", "\"dueInDays\": 2.6");
        let parsed = SynthesisResponse::parse(&content).unwrap();
        assert_eq!(parsed.actions[0].due_in_days, 3);
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            SynthesisResponse::parse("Sure! Here is the JSON you asked for"),
            Err(LlmError::MalformedResponse(_))
        ));
    }

    #[test]
    fn rejects_missing_score() {
        let content = VALID.replace("\"score\": 72,", "");
        assert!(matches!(
            SynthesisResponse::parse(&content),
            Err(LlmError::MalformedResponse(_))
        ));
    }

    #[test]
    fn rejects_string_score() {
        let content = VALID.replace("\"score\": 72", "\"score\": \"high\"");
        assert!(SynthesisResponse::parse(&content).is_err());
    }

    #[test]
    fn rejects_empty_actions() {
        let content = r#"{"why":"w","score":50,"recommendation":"r","actions":[],"outreachDraft":"d"}"#;
        assert!(SynthesisResponse::parse(content).is_err());
    }

    #[test]
    fn rejects_blank_why() {
        let content = VALID.replace(
            "The new marketplace listing matches your Marketplace objective.",
            "  ",
        );
        assert!(SynthesisResponse::parse(&content).is_err());
    }

    #[test]
    fn rejects_incomplete_action() {
        let content = r#"{"why":"w","score":50,"recommendation":"r","actions":[{"label":"Call"}],"outreachDraft":"d"}"#;
        assert!(SynthesisResponse::parse(content).is_err());
    }
}
