use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreError;

/// Category of partner activity a signal represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    Funding,
    Marketplace,
    Launch,
    Hire,
    Changelog,
    Pr,
    Blog,
}

impl SignalType {
    pub const ALL: [SignalType; 7] = [
        SignalType::Funding,
        SignalType::Marketplace,
        SignalType::Launch,
        SignalType::Hire,
        SignalType::Changelog,
        SignalType::Pr,
        SignalType::Blog,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SignalType::Funding => "funding",
            SignalType::Marketplace => "marketplace",
            SignalType::Launch => "launch",
            SignalType::Hire => "hire",
            SignalType::Changelog => "changelog",
            SignalType::Pr => "pr",
            SignalType::Blog => "blog",
        }
    }
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignalType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::UnknownSignalType(s.to_string()))
    }
}

/// A feed item as handed to the pipeline, before classification and summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSignal {
    pub partner_id: Uuid,
    pub title: String,
    pub url: String,
    /// Body text (content, falling back to the feed snippet). May be empty.
    pub content: String,
    pub published_at: Option<DateTime<Utc>>,
    pub facets: Option<BTreeMap<String, serde_json::Value>>,
}

/// A signal ready to be persisted. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSignal {
    pub partner_id: Uuid,
    pub signal_type: SignalType,
    pub title: String,
    pub source_url: String,
    pub summary: String,
    pub facets: Option<BTreeMap<String, serde_json::Value>>,
    pub published_at: Option<DateTime<Utc>>,
    pub dedupe_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: Uuid,
    pub partner_id: Uuid,
    pub signal_type: SignalType,
    pub title: String,
    pub source_url: String,
    pub summary: String,
    pub facets: Option<BTreeMap<String, serde_json::Value>>,
    pub published_at: Option<DateTime<Utc>>,
    pub dedupe_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Signal {
    /// Materialize a stored signal from its insert form.
    #[must_use]
    pub fn from_new(id: Uuid, new: NewSignal, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            partner_id: new.partner_id,
            signal_type: new.signal_type,
            title: new.title,
            source_url: new.source_url,
            summary: new.summary,
            facets: new.facets,
            published_at: new.published_at,
            dedupe_hash: new.dedupe_hash,
            created_at,
        }
    }
}
