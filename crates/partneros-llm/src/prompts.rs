//! Chat-completion request bodies for each collaborator role.

use serde::Serialize;

use crate::error::LlmError;
use crate::types::SynthesisRequest;

/// Labels the classifier may answer with.
pub const CLASSIFY_LABELS: &str = "funding, marketplace, launch, hire, changelog, pr, blog";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[must_use]
pub fn classify_request(model: &str, title: &str, body_prefix: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            Message::system(format!(
                "You are a partner-ops analyst. Classify the content into exactly one of: \
                 {CLASSIFY_LABELS}. Answer with the type name only."
            )),
            Message::user(format!("Title: {title}\n\nContent: {body_prefix}")),
        ],
        temperature: 0.3,
        max_tokens: Some(10),
        response_format: None,
    }
}

#[must_use]
pub fn summarize_request(model: &str, body_prefix: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            Message::system(
                "You are a partner-ops analyst. Summarize the content for a partner manager \
                 in 4-6 short bullets. Name products, teams, and regions where mentioned.",
            ),
            Message::user(format!("TEXT:\n<<<{body_prefix}>>>")),
        ],
        temperature: 0.5,
        max_tokens: Some(300),
        response_format: None,
    }
}

/// Builds the JSON-mode request for insight synthesis.
///
/// # Errors
///
/// Returns [`LlmError::Serialize`] if the request context cannot be encoded.
pub fn synthesis_request(model: &str, request: &SynthesisRequest) -> Result<ChatRequest, LlmError> {
    let objectives = serde_json::to_string(&request.objectives)?;
    let signal = serde_json::to_string(&request.signal)?;

    let prompt = format!(
        "Objectives: {objectives}\n\
         Signal: {signal}\n\n\
         Explain concretely how this signal relates to the objectives. Refer to objective \
         types by the labels shown above (for example \"Co-Marketing\", not \"co_market\").\n\n\
         Respond with a JSON object containing:\n\
         - \"why\": 2-3 sentences on why this signal matters for the objectives, citing the \
         objective label and detail and the specific part of the signal that makes it relevant.\n\
         - \"score\": number 0-100, semantic relevance of the signal to the objectives.\n\
         - \"recommendation\": one sentence.\n\
         - \"actions\": array of {{\"label\": string, \"ownerHint\": string, \"dueInDays\": number}}.\n\
         - \"outreachDraft\": a short ready-to-send email: greeting, the signal title woven into \
         a sentence (never on its own line), a partnership suggestion, a call to action, and a \
         closing. At most four sentences."
    );

    Ok(ChatRequest {
        model: model.to_string(),
        messages: vec![
            Message::system("You are a partnerships strategist. Return valid JSON only."),
            Message::user(prompt),
        ],
        temperature: 0.7,
        max_tokens: None,
        response_format: Some(ResponseFormat {
            kind: "json_object",
        }),
    })
}
