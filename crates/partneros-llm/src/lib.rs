//! External text-understanding collaborators for the scoring core.
//!
//! The insight pipeline depends only on the [`TextClassifier`],
//! [`TextSummarizer`] and [`InsightGenerator`] traits. [`OpenAiClient`]
//! implements all three against an OpenAI-compatible chat-completions API;
//! [`OfflineTextService`] implements them by always failing, which sends
//! every caller down its deterministic fallback path.

pub mod error;
pub mod offline;
pub mod openai;
pub mod prompts;
pub mod service;
pub mod types;

mod retry;

pub use error::LlmError;
pub use offline::OfflineTextService;
pub use openai::{OpenAiClient, OpenAiConfig};
pub use service::{InsightGenerator, TextClassifier, TextSummarizer};
pub use types::{ObjectiveContext, SignalContext, SynthesisRequest, SynthesisResponse};
