//! Bounded blending of an external semantic score into the base score.

use crate::base::BaseScore;

pub const DEFAULT_LLM_ADJUSTMENT_BOUND: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    /// Largest magnitude the LLM may move the base score, in points.
    pub llm_adjustment_bound: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            llm_adjustment_bound: DEFAULT_LLM_ADJUSTMENT_BOUND,
        }
    }
}

/// `clamp(llm_score - base_score, -bound, bound)`.
///
/// A non-finite `llm_score` yields no adjustment.
#[must_use]
pub fn llm_adjustment(llm_score: f64, base_score: f64, bound: f64) -> f64 {
    if !llm_score.is_finite() {
        return 0.0;
    }
    let bound = bound.abs();
    (llm_score - base_score).clamp(-bound, bound)
}

/// Apply `adjustment` to a base score, clamping the result to `[0, 100]`.
#[must_use]
pub fn final_score(base: &BaseScore, adjustment: f64) -> BaseScore {
    BaseScore {
        score: (base.score + adjustment).clamp(0.0, 100.0),
        breakdown: base.breakdown.with_llm_adjustment(adjustment),
    }
}

#[cfg(test)]
mod tests {
    use partneros_core::ScoreBreakdown;

    use super::*;

    fn base(score: f64) -> BaseScore {
        BaseScore {
            score,
            breakdown: ScoreBreakdown::new(score, 1.0, 1.0, 0.0, score, 0.0),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn adjustment_is_bounded() {
        assert!(approx(llm_adjustment(90.0, 50.0, 20.0), 20.0));
        assert!(approx(llm_adjustment(10.0, 50.0, 20.0), -20.0));
        assert!(approx(llm_adjustment(58.0, 50.0, 20.0), 8.0));
    }

    #[test]
    fn adjustment_respects_configured_bound() {
        assert!(approx(llm_adjustment(90.0, 50.0, 5.0), 5.0));
        assert!(approx(llm_adjustment(90.0, 50.0, 0.0), 0.0));
    }

    #[test]
    fn nan_llm_score_is_ignored() {
        assert!(approx(llm_adjustment(f64::NAN, 50.0, 20.0), 0.0));
    }

    #[test]
    fn final_score_adds_adjustment() {
        let result = final_score(&base(50.0), 10.0);
        assert!(approx(result.score, 60.0));
        assert!(approx(result.breakdown.llm_adjustment(), 10.0));
    }

    #[test]
    fn final_score_caps_at_100() {
        assert!(approx(final_score(&base(95.0), 20.0).score, 100.0));
    }

    #[test]
    fn final_score_floors_at_zero() {
        assert!(approx(final_score(&base(5.0), -10.0).score, 0.0));
    }

    #[test]
    fn final_score_keeps_base_terms() {
        let b = base(42.0);
        let result = final_score(&b, -3.0);
        assert!(approx(
            result.breakdown.signal_strength(),
            b.breakdown.signal_strength()
        ));
    }

    #[test]
    fn default_bound_is_twenty() {
        assert!(approx(ScoringConfig::default().llm_adjustment_bound, 20.0));
    }
}
