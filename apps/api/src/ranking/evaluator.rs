//! The evaluator seam. `AppState` holds an `Arc<dyn CvEvaluator>` so the
//! batch engine and handlers never depend on a concrete backend; tests
//! substitute scripted mocks.

use async_trait::async_trait;
use tracing::debug;

use crate::llm_client::{extract_json_payload, LlmClient, LlmError};
use crate::ranking::evaluation::{CvEvaluation, EvalError};
use crate::ranking::prompts::{render_evaluation_prompt, SYSTEM_PROMPT};

#[async_trait]
pub trait CvEvaluator: Send + Sync {
    /// Evaluates one CV against the job description.
    async fn evaluate(&self, job_description: &str, cv_text: &str)
        -> Result<CvEvaluation, EvalError>;
}

/// Production evaluator: renders the prompt template and asks the
/// chat-completion API for the structured evaluation.
pub struct LlmEvaluator {
    llm: LlmClient,
}

impl LlmEvaluator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl CvEvaluator for LlmEvaluator {
    async fn evaluate(
        &self,
        job_description: &str,
        cv_text: &str,
    ) -> Result<CvEvaluation, EvalError> {
        if cv_text.trim().is_empty() {
            return Err(EvalError::EmptyCv);
        }

        let prompt = render_evaluation_prompt(job_description, cv_text);
        debug!(
            "sending evaluation prompt ({} chars, model {})",
            prompt.len(),
            self.llm.model()
        );

        let response = self.llm.call(SYSTEM_PROMPT, &prompt).await?;
        let raw = response.text().ok_or(LlmError::EmptyContent)?;

        CvEvaluation::parse(extract_json_payload(raw))
    }
}
