//! Fixed lookup tables for the base scorer.

use chrono::{DateTime, Utc};
use partneros_core::{ObjectiveType, SignalType};

/// Base relevance weight for a signal category.
#[must_use]
pub fn signal_type_weight(signal_type: SignalType) -> f64 {
    match signal_type {
        SignalType::Marketplace => 40.0,
        SignalType::Launch => 35.0,
        SignalType::Funding => 30.0,
        SignalType::Changelog => 25.0,
        SignalType::Blog => 15.0,
        SignalType::Pr => 10.0,
        SignalType::Hire => 5.0,
    }
}

/// Step-function decay on whole elapsed days since publication.
///
/// | days   | multiplier |
/// |--------|------------|
/// | 0      | 1.0        |
/// | 1-3    | 0.9        |
/// | 4-7    | 0.7        |
/// | 8-14   | 0.5        |
/// | 15+    | 0.3        |
/// | none   | 0.5        |
///
/// Future timestamps count as same-day.
#[must_use]
pub fn recency_multiplier(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(published_at) = published_at else {
        return 0.5;
    };

    match (now - published_at).num_days() {
        i64::MIN..=0 => 1.0,
        1..=3 => 0.9,
        4..=7 => 0.7,
        8..=14 => 0.5,
        _ => 0.3,
    }
}

/// Multiplier applied to objective fit. Anything other than 1 or 2 is neutral.
#[must_use]
pub fn priority_multiplier(priority: i16) -> f64 {
    match priority {
        1 => 1.5,
        2 => 1.2,
        _ => 1.0,
    }
}

/// Bonus for thematic alignment between a signal category and an objective type.
#[must_use]
pub fn objective_match_bonus(signal_type: SignalType, objective_type: ObjectiveType) -> f64 {
    match (signal_type, objective_type) {
        (SignalType::Marketplace, ObjectiveType::Marketplace)
        | (SignalType::Launch, ObjectiveType::CoMarket)
        | (SignalType::Changelog, ObjectiveType::Integrations) => 30.0,
        (SignalType::Launch | SignalType::Funding, ObjectiveType::CoSell)
        | (SignalType::Changelog, ObjectiveType::Marketplace) => 15.0,
        _ => 0.0,
    }
}
