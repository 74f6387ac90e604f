//! Serde models for the evaluation JSON the model returns, plus parsing and
//! range validation. A response missing a category, or carrying a score
//! outside [0,10], fails the CV — scores are never defaulted or fabricated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::LlmError;

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 10.0;

/// How much of a malformed raw response is kept for diagnosis.
const SNIPPET_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("malformed evaluation response: {message}")]
    Parse { message: String, raw_snippet: String },

    #[error("CV text is empty")]
    EmptyCv,
}

/// One category record: score, justification, and identified strengths/gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEvaluation {
    pub score: f64,
    pub reasoning: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallEvaluation {
    pub score: f64,
    pub reasoning: String,
}

/// The full structured evaluation for one CV. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvEvaluation {
    pub skills: CategoryEvaluation,
    pub experience: CategoryEvaluation,
    pub education: CategoryEvaluation,
    pub overall: OverallEvaluation,
}

impl CvEvaluation {
    /// Parses and validates a raw JSON payload from the model.
    pub fn parse(raw: &str) -> Result<Self, EvalError> {
        let evaluation: CvEvaluation = serde_json::from_str(raw).map_err(|e| EvalError::Parse {
            message: e.to_string(),
            raw_snippet: snippet(raw),
        })?;
        evaluation.validate(raw)?;
        Ok(evaluation)
    }

    fn validate(&self, raw: &str) -> Result<(), EvalError> {
        let scores = [
            ("skills", self.skills.score),
            ("experience", self.experience.score),
            ("education", self.education.score),
            ("overall", self.overall.score),
        ];
        for (name, score) in scores {
            if !(SCORE_MIN..=SCORE_MAX).contains(&score) {
                return Err(EvalError::Parse {
                    message: format!("{name} score {score} is outside [0, 10]"),
                    raw_snippet: snippet(raw),
                });
            }
        }
        Ok(())
    }
}

/// Truncates a raw response for error reporting.
pub fn snippet(raw: &str) -> String {
    raw.chars().take(SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> String {
        r#"{
            "skills": {"score": 8, "reasoning": "strong Rust background",
                       "strengths": ["Rust", "async"], "gaps": ["Kubernetes"]},
            "experience": {"score": 7.5, "reasoning": "six relevant years",
                           "strengths": ["backend services"], "gaps": []},
            "education": {"score": 6, "reasoning": "BSc in CS",
                          "strengths": [], "gaps": ["no graduate degree"]},
            "overall": {"score": 7, "reasoning": "solid fit"}
        }"#
        .to_string()
    }

    #[test]
    fn test_parse_valid_payload() {
        let evaluation = CvEvaluation::parse(&valid_payload()).unwrap();
        assert_eq!(evaluation.skills.score, 8.0);
        assert_eq!(evaluation.experience.score, 7.5);
        assert_eq!(evaluation.skills.strengths, vec!["Rust", "async"]);
        assert_eq!(evaluation.overall.score, 7.0);
    }

    #[test]
    fn test_missing_category_fails() {
        let payload = r#"{
            "skills": {"score": 8, "reasoning": "ok"},
            "experience": {"score": 7, "reasoning": "ok"},
            "overall": {"score": 7, "reasoning": "ok"}
        }"#;
        let err = CvEvaluation::parse(payload).unwrap_err();
        assert!(matches!(err, EvalError::Parse { .. }));
    }

    #[test]
    fn test_out_of_range_score_fails() {
        let payload = valid_payload().replace("\"score\": 8", "\"score\": 11");
        let err = CvEvaluation::parse(&payload).unwrap_err();
        match err {
            EvalError::Parse { message, .. } => assert!(message.contains("outside")),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_score_fails() {
        let payload = valid_payload().replace("\"score\": 6", "\"score\": -1");
        assert!(CvEvaluation::parse(&payload).is_err());
    }

    #[test]
    fn test_missing_strengths_and_gaps_default_to_empty() {
        let payload = r#"{
            "skills": {"score": 5, "reasoning": "ok"},
            "experience": {"score": 5, "reasoning": "ok"},
            "education": {"score": 5, "reasoning": "ok"},
            "overall": {"score": 5, "reasoning": "ok"}
        }"#;
        let evaluation = CvEvaluation::parse(payload).unwrap();
        assert!(evaluation.skills.strengths.is_empty());
        assert!(evaluation.skills.gaps.is_empty());
    }

    #[test]
    fn test_parse_failure_carries_raw_snippet() {
        let err = CvEvaluation::parse("not json at all").unwrap_err();
        match err {
            EvalError::Parse { raw_snippet, .. } => {
                assert_eq!(raw_snippet, "not json at all");
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_snippet_is_bounded() {
        let long = "x".repeat(10_000);
        assert_eq!(snippet(&long).chars().count(), 500);
    }
}
