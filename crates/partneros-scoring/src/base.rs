use chrono::{DateTime, Utc};
use partneros_core::{Objective, PreferenceWeights, ScoreBreakdown, SignalType};

use crate::tables::{
    objective_match_bonus, priority_multiplier, recency_multiplier, signal_type_weight,
};

/// Deterministic score for one (signal, objective) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseScore {
    /// In `[0.0, 100.0]`.
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

impl BaseScore {
    /// Score rounded to the integer stored on an insight.
    #[must_use]
    pub fn rounded(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = self.score.round().clamp(0.0, 100.0) as u8;
        rounded
    }
}

/// Compute the rule-based relevance score.
///
/// `signal strength = category weight × signal-type preference × recency`
/// `objective fit = match bonus × objective-type preference × priority multiplier`
/// `score = clamp(signal strength + objective fit, 0, 100)`
///
/// Missing preferences (or missing keys within them) read as 1.0.
#[must_use]
pub fn calculate_base_score(
    signal_type: SignalType,
    published_at: Option<DateTime<Utc>>,
    objective: &Objective,
    preferences: Option<&PreferenceWeights>,
    now: DateTime<Utc>,
) -> BaseScore {
    let signal_type_pref = preferences.map_or(1.0, |p| p.signal_weight(signal_type));
    let objective_type_pref =
        preferences.map_or(1.0, |p| p.objective_weight(objective.objective_type));

    let weighted_base = signal_type_weight(signal_type) * signal_type_pref;
    let recency = recency_multiplier(published_at, now);
    let priority = priority_multiplier(objective.priority);
    let match_bonus = objective_match_bonus(signal_type, objective.objective_type);

    let signal_strength = weighted_base * recency;
    let objective_fit = match_bonus * objective_type_pref * priority;
    let score = (signal_strength + objective_fit).clamp(0.0, 100.0);

    BaseScore {
        score,
        breakdown: ScoreBreakdown::new(
            weighted_base,
            recency,
            priority,
            match_bonus,
            signal_strength,
            objective_fit,
        ),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use partneros_core::{ObjectiveType, WeightKey};
    use uuid::Uuid;

    use super::*;

    fn objective(objective_type: ObjectiveType, priority: i16) -> Objective {
        Objective {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            objective_type,
            detail: None,
            priority,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn marketplace_today_priority_one_scores_85() {
        let now = Utc::now();
        let result = calculate_base_score(
            SignalType::Marketplace,
            Some(now),
            &objective(ObjectiveType::Marketplace, 1),
            None,
            now,
        );

        let b = result.breakdown;
        assert!(approx(b.base_score(), 40.0));
        assert!(approx(b.recency_multiplier(), 1.0));
        assert!(approx(b.objective_match_bonus(), 30.0));
        assert!(approx(b.priority_multiplier(), 1.5));
        assert!(approx(b.signal_strength(), 40.0));
        assert!(approx(b.objective_fit(), 45.0));
        assert!(approx(b.llm_adjustment(), 0.0));
        assert!(approx(result.score, 85.0));
        assert_eq!(result.rounded(), 85);
    }

    #[test]
    fn priority_only_scales_objective_fit() {
        let now = Utc::now();
        let p1 = calculate_base_score(
            SignalType::Launch,
            Some(now),
            &objective(ObjectiveType::CoMarket, 1),
            None,
            now,
        );
        let p3 = calculate_base_score(
            SignalType::Launch,
            Some(now),
            &objective(ObjectiveType::CoMarket, 3),
            None,
            now,
        );
        assert!(approx(p1.breakdown.signal_strength(), p3.breakdown.signal_strength()));
        assert!(approx(p1.breakdown.objective_fit(), 45.0));
        assert!(approx(p3.breakdown.objective_fit(), 30.0));
    }

    #[test]
    fn recency_decay_lowers_score() {
        let now = Utc::now();
        let obj = objective(ObjectiveType::Marketplace, 1);
        let fresh = calculate_base_score(SignalType::Marketplace, Some(now), &obj, None, now);
        let stale = calculate_base_score(
            SignalType::Marketplace,
            Some(now - Duration::days(20)),
            &obj,
            None,
            now,
        );
        assert!(stale.score < fresh.score);
        assert!(approx(stale.breakdown.signal_strength(), 12.0));
    }

    #[test]
    fn unmatched_low_weight_signal_scores_near_zero() {
        let now = Utc::now();
        let mut prefs = PreferenceWeights::default();
        prefs.apply(WeightKey::Signal(SignalType::Hire), -1.0);
        let result = calculate_base_score(
            SignalType::Hire,
            Some(now - Duration::days(30)),
            &objective(ObjectiveType::Geography, 3),
            Some(&prefs),
            now,
        );
        // 5 × 0.5 × 0.3
        assert!(approx(result.score, 0.75));
        assert_eq!(result.rounded(), 1);
    }

    #[test]
    fn preferences_scale_both_terms() {
        let now = Utc::now();
        let mut prefs = PreferenceWeights::default();
        prefs.apply(WeightKey::Signal(SignalType::Changelog), 0.5);
        prefs.apply(WeightKey::Objective(ObjectiveType::Integrations), -0.5);
        let result = calculate_base_score(
            SignalType::Changelog,
            Some(now),
            &objective(ObjectiveType::Integrations, 2),
            Some(&prefs),
            now,
        );
        // base 25 × 1.5 = 37.5; fit 30 × 0.5 × 1.2 = 18
        assert!(approx(result.breakdown.base_score(), 37.5));
        assert!(approx(result.breakdown.objective_fit(), 18.0));
        assert!(approx(result.score, 55.5));
    }

    #[test]
    fn score_is_clamped_to_100() {
        let now = Utc::now();
        let mut prefs = PreferenceWeights::default();
        for _ in 0..10 {
            prefs.apply(WeightKey::Signal(SignalType::Marketplace), 0.1);
            prefs.apply(WeightKey::Objective(ObjectiveType::Marketplace), 0.1);
        }
        let result = calculate_base_score(
            SignalType::Marketplace,
            Some(now),
            &objective(ObjectiveType::Marketplace, 1),
            Some(&prefs),
            now,
        );
        // 80 + 90 before the clamp
        assert!(approx(result.score, 100.0));
    }

    #[test]
    fn score_is_always_in_range() {
        let now = Utc::now();
        let ages = [None, Some(0), Some(2), Some(5), Some(10), Some(20), Some(400)];
        let mut low = PreferenceWeights::default();
        let mut high = PreferenceWeights::default();
        for t in SignalType::ALL {
            low.apply(WeightKey::Signal(t), -5.0);
            high.apply(WeightKey::Signal(t), 5.0);
        }
        for t in ObjectiveType::ALL {
            low.apply(WeightKey::Objective(t), -5.0);
            high.apply(WeightKey::Objective(t), 5.0);
        }

        for signal_type in SignalType::ALL {
            for objective_type in ObjectiveType::ALL {
                for priority in 0..=4 {
                    for age in ages {
                        for prefs in [None, Some(&low), Some(&high)] {
                            let published = age.map(|d| now - Duration::days(d));
                            let result = calculate_base_score(
                                signal_type,
                                published,
                                &objective(objective_type, priority),
                                prefs,
                                now,
                            );
                            assert!(
                                (0.0..=100.0).contains(&result.score),
                                "{signal_type}/{objective_type}/{priority}/{age:?} scored {}",
                                result.score
                            );
                        }
                    }
                }
            }
        }
    }
}
