//! Export of a ranking outcome: a flat CSV of scores (one row per ranked CV)
//! and a pretty-printed JSON document with the full evaluation detail.

use anyhow::Result;
use serde::Serialize;

use crate::ranking::engine::RankingOutcome;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    rank: usize,
    filename: &'a str,
    weighted_score: f64,
    skills_score: f64,
    experience_score: f64,
    education_score: f64,
    overall_score: f64,
}

/// Renders the ranked entries as CSV. Failed evaluations carry no scores and
/// are deliberately absent; they live in the JSON export.
pub fn to_csv(outcome: &RankingOutcome) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for entry in &outcome.entries {
        writer.serialize(CsvRow {
            rank: entry.rank,
            filename: &entry.filename,
            weighted_score: entry.weighted_score,
            skills_score: entry.evaluation.skills.score,
            experience_score: entry.evaluation.experience.score,
            education_score: entry.evaluation.education.score,
            overall_score: entry.evaluation.overall.score,
        })?;
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

/// Full detail export: summary, every ranked entry with reasoning and
/// strengths/gaps, and the per-CV failures.
pub fn to_json(outcome: &RankingOutcome) -> Result<String> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::engine::{
        EvaluationFailure, RankingEntry, RankingSummary,
    };
    use crate::ranking::evaluation::{CategoryEvaluation, CvEvaluation, OverallEvaluation};

    fn entry(rank: usize, filename: &str, score: f64) -> RankingEntry {
        let category = |s: f64| CategoryEvaluation {
            score: s,
            reasoning: "because".to_string(),
            strengths: vec!["x".to_string()],
            gaps: vec![],
        };
        RankingEntry {
            rank,
            filename: filename.to_string(),
            weighted_score: score,
            evaluation: CvEvaluation {
                skills: category(score),
                experience: category(score),
                education: category(score),
                overall: OverallEvaluation {
                    score,
                    reasoning: "fit".to_string(),
                },
            },
        }
    }

    fn outcome(entries: Vec<RankingEntry>, failures: Vec<EvaluationFailure>) -> RankingOutcome {
        RankingOutcome {
            summary: RankingSummary {
                total_cvs: entries.len() + failures.len(),
                successful_evaluations: entries.len(),
                failed_evaluations: failures.len(),
                average_score: 5.0,
            },
            entries,
            failures,
        }
    }

    #[test]
    fn test_csv_row_count_matches_successes() {
        let outcome = outcome(
            vec![entry(1, "a.pdf", 8.0), entry(2, "b.pdf", 6.0)],
            vec![EvaluationFailure {
                filename: "broken.pdf".to_string(),
                error: "malformed evaluation response".to_string(),
                raw_snippet: None,
            }],
        );
        let csv = to_csv(&outcome).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        // header + one row per successful CV, failures excluded
        assert_eq!(lines.len(), 3);
        assert!(!csv.contains("broken.pdf"));
    }

    #[test]
    fn test_csv_header_and_first_row() {
        let csv = to_csv(&outcome(vec![entry(1, "a.pdf", 7.5)], vec![])).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "rank,filename,weighted_score,skills_score,experience_score,education_score,overall_score"
        );
        assert_eq!(lines.next().unwrap(), "1,a.pdf,7.5,7.5,7.5,7.5,7.5");
    }

    #[test]
    fn test_csv_empty_outcome_is_header_free() {
        let csv = to_csv(&RankingOutcome::empty(0)).unwrap();
        assert!(csv.is_empty());
    }

    #[test]
    fn test_json_export_carries_failures_and_detail() {
        let out = outcome(
            vec![entry(1, "a.pdf", 8.0)],
            vec![EvaluationFailure {
                filename: "broken.pdf".to_string(),
                error: "API error (status 500)".to_string(),
                raw_snippet: Some("oops".to_string()),
            }],
        );
        let json = to_json(&out).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["entries"][0]["filename"], "a.pdf");
        assert_eq!(parsed["entries"][0]["evaluation"]["skills"]["reasoning"], "because");
        assert_eq!(parsed["failures"][0]["filename"], "broken.pdf");
        assert_eq!(parsed["failures"][0]["raw_snippet"], "oops");
        assert_eq!(parsed["summary"]["successful_evaluations"], 1);
    }
}
