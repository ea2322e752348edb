//! Deterministic relevance scoring for partner signals.
//!
//! Everything here is pure: no I/O, no clock reads. Callers pass `now`
//! explicitly. The LLM-facing half of insight generation lives in
//! `partneros-insights` and only talks to this crate through
//! [`calculate_base_score`], [`llm_adjustment`] and [`final_score`].

pub mod base;
pub mod blend;
pub mod tables;

pub use base::{calculate_base_score, BaseScore};
pub use blend::{final_score, llm_adjustment, ScoringConfig, DEFAULT_LLM_ADJUSTMENT_BOUND};
pub use tables::{
    objective_match_bonus, priority_multiplier, recency_multiplier, signal_type_weight,
};
