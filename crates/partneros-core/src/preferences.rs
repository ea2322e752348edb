//! Per-user learned preference weights.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ObjectiveType, SignalType};

pub const WEIGHT_FLOOR: f64 = 0.5;
pub const WEIGHT_CEILING: f64 = 2.0;
const NEUTRAL_WEIGHT: f64 = 1.0;

/// Identifies one adjustable weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightKey {
    Signal(SignalType),
    Objective(ObjectiveType),
}

impl WeightKey {
    /// Storage discriminator: `signal_type` or `objective_type`.
    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            WeightKey::Signal(_) => "signal_type",
            WeightKey::Objective(_) => "objective_type",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            WeightKey::Signal(t) => t.as_str(),
            WeightKey::Objective(t) => t.as_str(),
        }
    }
}

impl std::fmt::Display for WeightKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.name())
    }
}

/// Apply `delta` to `current` and clamp into `[WEIGHT_FLOOR, WEIGHT_CEILING]`.
#[must_use]
pub fn adjusted_weight(current: f64, delta: f64) -> f64 {
    (current + delta).clamp(WEIGHT_FLOOR, WEIGHT_CEILING)
}

/// Weights keyed by signal type and objective type. Missing keys read as 1.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceWeights {
    #[serde(default)]
    pub signal_type_weights: BTreeMap<SignalType, f64>,
    #[serde(default)]
    pub objective_type_weights: BTreeMap<ObjectiveType, f64>,
}

impl PreferenceWeights {
    #[must_use]
    pub fn signal_weight(&self, signal_type: SignalType) -> f64 {
        self.signal_type_weights
            .get(&signal_type)
            .copied()
            .unwrap_or(NEUTRAL_WEIGHT)
    }

    #[must_use]
    pub fn objective_weight(&self, objective_type: ObjectiveType) -> f64 {
        self.objective_type_weights
            .get(&objective_type)
            .copied()
            .unwrap_or(NEUTRAL_WEIGHT)
    }

    #[must_use]
    pub fn get(&self, key: WeightKey) -> f64 {
        match key {
            WeightKey::Signal(t) => self.signal_weight(t),
            WeightKey::Objective(t) => self.objective_weight(t),
        }
    }

    /// Adjust one weight in place and return its new, clamped value.
    pub fn apply(&mut self, key: WeightKey, delta: f64) -> f64 {
        let updated = adjusted_weight(self.get(key), delta);
        match key {
            WeightKey::Signal(t) => {
                self.signal_type_weights.insert(t, updated);
            }
            WeightKey::Objective(t) => {
                self.objective_type_weights.insert(t, updated);
            }
        }
        updated
    }
}
