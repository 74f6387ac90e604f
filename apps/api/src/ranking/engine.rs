//! Batch evaluation and ranking. Fans one LLM evaluation per CV out through
//! a semaphore-bounded task set, then aggregates: successful evaluations are
//! scored and stably sorted, failures are surfaced per CV and excluded from
//! the ranking. One bad CV never blocks the rest of the batch.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::ingest::CvDocument;
use crate::ranking::evaluation::{CvEvaluation, EvalError};
use crate::ranking::evaluator::CvEvaluator;
use crate::ranking::weights::{score_for, WeightConfig};

/// One row of the ranking: a successfully evaluated CV with its computed
/// aggregate score. Ranks are 1-based and assigned after sorting.
#[derive(Debug, Clone, Serialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub filename: String,
    pub weighted_score: f64,
    pub evaluation: CvEvaluation,
}

/// A CV whose evaluation failed. Listed alongside the ranking, never ranked.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationFailure {
    pub filename: String,
    pub error: String,
    /// Start of the raw model response, when the failure was a parse error.
    pub raw_snippet: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingSummary {
    pub total_cvs: usize,
    pub successful_evaluations: usize,
    pub failed_evaluations: usize,
    /// Mean weighted score across successful evaluations; 0 when none.
    pub average_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingOutcome {
    pub summary: RankingSummary,
    pub entries: Vec<RankingEntry>,
    pub failures: Vec<EvaluationFailure>,
}

impl RankingOutcome {
    pub fn empty(total_cvs: usize) -> Self {
        Self {
            summary: RankingSummary {
                total_cvs,
                successful_evaluations: 0,
                failed_evaluations: 0,
                average_score: 0.0,
            },
            entries: Vec::new(),
            failures: Vec::new(),
        }
    }
}

/// Evaluates every CV against the job description and returns the ranked
/// outcome. An empty job description or CV set yields an empty ranking.
pub async fn rank_cvs(
    evaluator: Arc<dyn CvEvaluator>,
    job_description: &str,
    cvs: &[CvDocument],
    weights: Option<WeightConfig>,
    max_concurrency: usize,
) -> RankingOutcome {
    if job_description.trim().is_empty() || cvs.is_empty() {
        return RankingOutcome::empty(cvs.len());
    }

    info!(
        "ranking {} CVs with max_concurrency={}",
        cvs.len(),
        max_concurrency
    );

    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut set = JoinSet::new();

    for (index, cv) in cvs.iter().cloned().enumerate() {
        let evaluator = Arc::clone(&evaluator);
        let semaphore = Arc::clone(&semaphore);
        let job_description = job_description.to_string();
        set.spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("Semaphore closed");
            let result = evaluator.evaluate(&job_description, &cv.text).await;
            (index, result)
        });
    }

    // Collect results back into upload order; a slot left empty means the
    // task itself did not complete.
    let mut slots: Vec<Option<Result<CvEvaluation, EvalError>>> =
        (0..cvs.len()).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => warn!("evaluation task did not complete: {e}"),
        }
    }

    let mut scored: Vec<(String, f64, CvEvaluation)> = Vec::new();
    let mut failures: Vec<EvaluationFailure> = Vec::new();

    for (cv, slot) in cvs.iter().zip(slots) {
        match slot {
            Some(Ok(evaluation)) => {
                let score = score_for(&evaluation, weights.as_ref());
                scored.push((cv.filename.clone(), score, evaluation));
            }
            Some(Err(err)) => {
                warn!("evaluation of '{}' failed: {err}", cv.filename);
                let raw_snippet = match &err {
                    EvalError::Parse { raw_snippet, .. } => Some(raw_snippet.clone()),
                    _ => None,
                };
                failures.push(EvaluationFailure {
                    filename: cv.filename.clone(),
                    error: err.to_string(),
                    raw_snippet,
                });
            }
            None => failures.push(EvaluationFailure {
                filename: cv.filename.clone(),
                error: "evaluation task did not complete".to_string(),
                raw_snippet: None,
            }),
        }
    }

    // Stable sort: ties keep upload order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let entries: Vec<RankingEntry> = scored
        .into_iter()
        .enumerate()
        .map(|(i, (filename, weighted_score, evaluation))| RankingEntry {
            rank: i + 1,
            filename,
            weighted_score,
            evaluation,
        })
        .collect();

    let successful = entries.len();
    let average_score = if successful > 0 {
        entries.iter().map(|e| e.weighted_score).sum::<f64>() / successful as f64
    } else {
        0.0
    };

    info!(
        "ranking complete: {} succeeded, {} failed",
        successful,
        failures.len()
    );

    RankingOutcome {
        summary: RankingSummary {
            total_cvs: cvs.len(),
            successful_evaluations: successful,
            failed_evaluations: failures.len(),
            average_score,
        },
        entries,
        failures,
    }
}
