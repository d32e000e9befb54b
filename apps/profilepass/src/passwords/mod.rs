// Password generation core.
// Implements: keyword extraction, candidate synthesis, policy validation,
// fallback generation, optional external suggestions, batch orchestration.
// All LLM calls go through llm_client — no direct API calls here.

pub mod engine;
pub mod fallback;
pub mod handlers;
pub mod keywords;
pub mod policy;
pub mod prompts;
pub mod suggester;
pub mod synthesizer;
