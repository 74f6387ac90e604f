//! User-configurable category weights and the weighted aggregate score.

use serde::{Deserialize, Serialize};

use crate::ranking::evaluation::CvEvaluation;

/// Weight per evaluation category. Applied only at aggregation time, never
/// persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeightConfig {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            skills: 0.4,
            experience: 0.4,
            education: 0.2,
        }
    }
}

impl WeightConfig {
    pub fn validate(&self) -> Result<(), String> {
        let weights = [
            ("skills", self.skills),
            ("experience", self.experience),
            ("education", self.education),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("{name} weight must be a non-negative number"));
            }
        }
        if self.total() == 0.0 {
            return Err("at least one weight must be positive".to_string());
        }
        Ok(())
    }

    fn total(&self) -> f64 {
        self.skills + self.experience + self.education
    }

    /// Weighted overall = Σ(weight[c] × score[c]) / Σ(weight[c]) over the
    /// three category scores. Stays in [0,10] for validated inputs.
    pub fn weighted_overall(&self, evaluation: &CvEvaluation) -> f64 {
        let weighted = self.skills * evaluation.skills.score
            + self.experience * evaluation.experience.score
            + self.education * evaluation.education.score;
        weighted / self.total()
    }
}

/// Aggregate score for one CV: the weighted combination when weights are
/// configured, otherwise the model-provided overall score.
pub fn score_for(evaluation: &CvEvaluation, weights: Option<&WeightConfig>) -> f64 {
    match weights {
        Some(w) => w.weighted_overall(evaluation),
        None => evaluation.overall.score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::evaluation::{CategoryEvaluation, OverallEvaluation};

    fn evaluation(skills: f64, experience: f64, education: f64, overall: f64) -> CvEvaluation {
        let category = |score| CategoryEvaluation {
            score,
            reasoning: String::new(),
            strengths: vec![],
            gaps: vec![],
        };
        CvEvaluation {
            skills: category(skills),
            experience: category(experience),
            education: category(education),
            overall: OverallEvaluation {
                score: overall,
                reasoning: String::new(),
            },
        }
    }

    #[test]
    fn test_default_weights_match_original_split() {
        let w = WeightConfig::default();
        assert_eq!((w.skills, w.experience, w.education), (0.4, 0.4, 0.2));
    }

    #[test]
    fn test_equal_weights_give_category_mean() {
        let w = WeightConfig {
            skills: 1.0,
            experience: 1.0,
            education: 1.0,
        };
        let score = w.weighted_overall(&evaluation(9.0, 6.0, 3.0, 0.0));
        assert!((score - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_skills_only_weights_give_skills_score() {
        let w = WeightConfig {
            skills: 1.0,
            experience: 0.0,
            education: 0.0,
        };
        let score = w.weighted_overall(&evaluation(7.0, 2.0, 9.0, 0.0));
        assert_eq!(score, 7.0);
    }

    #[test]
    fn test_weighted_overall_stays_in_score_range() {
        let w = WeightConfig {
            skills: 0.7,
            experience: 0.2,
            education: 0.1,
        };
        for scores in [(0.0, 0.0, 0.0), (10.0, 10.0, 10.0), (10.0, 0.0, 5.0)] {
            let score = w.weighted_overall(&evaluation(scores.0, scores.1, scores.2, 0.0));
            assert!((0.0..=10.0).contains(&score), "score {score} out of range");
        }
    }

    #[test]
    fn test_unnormalized_weights_are_normalized_by_total() {
        let w = WeightConfig {
            skills: 4.0,
            experience: 4.0,
            education: 2.0,
        };
        let normalized = WeightConfig::default();
        let e = evaluation(8.0, 6.0, 4.0, 0.0);
        assert!((w.weighted_overall(&e) - normalized.weighted_overall(&e)).abs() < 1e-9);
    }

    #[test]
    fn test_no_weights_uses_model_overall() {
        let e = evaluation(1.0, 1.0, 1.0, 8.5);
        assert_eq!(score_for(&e, None), 8.5);
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let w = WeightConfig {
            skills: 0.0,
            experience: 0.0,
            education: 0.0,
        };
        assert!(w.validate().is_err());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let w = WeightConfig {
            skills: -0.1,
            experience: 0.5,
            education: 0.5,
        };
        assert!(w.validate().is_err());
    }

    #[test]
    fn test_nan_weight_rejected() {
        let w = WeightConfig {
            skills: f64::NAN,
            experience: 0.5,
            education: 0.5,
        };
        assert!(w.validate().is_err());
    }
}
