// Shared prompt fragments.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments.

/// System prompt fragment that enforces a bare single-token answer.
pub const SINGLE_TOKEN_SYSTEM: &str = "You are a terse assistant. \
    Respond with exactly one token of text and nothing else. \
    Do NOT use quotes or markdown code fences. \
    Do NOT include explanations or apologies.";
