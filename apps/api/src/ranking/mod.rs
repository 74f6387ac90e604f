// Ranking pipeline: prompt rendering, LLM evaluation, weighted aggregation,
// export. All LLM calls go through llm_client — no direct API calls here.

pub mod engine;
pub mod evaluation;
pub mod evaluator;
pub mod export;
pub mod handlers;
pub mod prompts;
pub mod weights;
