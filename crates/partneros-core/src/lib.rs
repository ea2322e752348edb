//! Shared domain types and configuration for the PartnerOS scoring core.

use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod dedupe;
pub mod insights;
pub mod objectives;
pub mod preferences;
pub mod signals;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use dedupe::compute_dedupe_key;
pub use insights::{
    FeedbackTag, Insight, InsightDraft, InsightStatus, ScoreBreakdown, SuggestedAction,
};
pub use objectives::{load_objectives, Objective, ObjectiveConfig, ObjectiveType, ObjectivesFile};
pub use preferences::{adjusted_weight, PreferenceWeights, WeightKey, WEIGHT_CEILING, WEIGHT_FLOOR};
pub use signals::{NewSignal, RawSignal, Signal, SignalType};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read objectives file {path}: {source}")]
    ObjectivesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse objectives file: {0}")]
    ObjectivesFileParse(#[source] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown signal type: {0}")]
    UnknownSignalType(String),

    #[error("unknown objective type: {0}")]
    UnknownObjectiveType(String),

    #[error("unknown feedback tag: {0}")]
    UnknownFeedbackTag(String),

    #[error("unknown insight status: {0}")]
    UnknownInsightStatus(String),

    #[error("cannot move insight from {from} back to {to}")]
    InvalidStatusTransition {
        from: InsightStatus,
        to: InsightStatus,
    },
}
