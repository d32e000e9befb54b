//! External suggestions — a pluggable source of password guesses.
//!
//! `AppState` holds an `Option<Arc<dyn PasswordSuggester>>`, built at startup
//! when `ENABLE_LLM_SUGGESTER` is set. Whatever a suggester returns is only a
//! candidate: the engine validates it and falls back on any failure.

use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::llm_client::prompts::SINGLE_TOKEN_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::passwords::policy::PasswordPolicy;
use crate::passwords::prompts::{SUGGEST_PROMPT_TEMPLATE, SUGGEST_SYSTEM_PREAMBLE};

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("suggestion was empty after normalization")]
    Empty,
}

#[async_trait]
pub trait PasswordSuggester: Send + Sync {
    /// Short backend name, for logs.
    fn name(&self) -> &str;

    async fn suggest(&self, keywords: &BTreeSet<String>) -> Result<String, SuggestError>;
}

/// Asks the LLM for a password inspired by the keywords.
pub struct LlmSuggester {
    llm: LlmClient,
    policy: PasswordPolicy,
}

impl LlmSuggester {
    pub fn new(llm: LlmClient, policy: PasswordPolicy) -> Self {
        Self { llm, policy }
    }

    fn build_prompt(&self, keywords: &BTreeSet<String>) -> String {
        let keywords_json =
            serde_json::to_string(keywords).unwrap_or_else(|_| String::from("[]"));
        let symbols: String = self.policy.symbols().iter().collect();

        SUGGEST_PROMPT_TEMPLATE
            .replace("{keywords_json}", &keywords_json)
            .replace("{min_len}", &self.policy.min_len().to_string())
            .replace("{max_len}", &self.policy.max_len().to_string())
            .replace("{symbols}", &symbols)
    }
}

#[async_trait]
impl PasswordSuggester for LlmSuggester {
    fn name(&self) -> &str {
        "llm"
    }

    async fn suggest(&self, keywords: &BTreeSet<String>) -> Result<String, SuggestError> {
        let system = format!("{SUGGEST_SYSTEM_PREAMBLE} {SINGLE_TOKEN_SYSTEM}");
        let text = self.llm.call_text(&self.build_prompt(keywords), &system).await?;
        normalize_suggestion(&text).ok_or(SuggestError::Empty)
    }
}

/// Removes wrapping quotes and every whitespace character from a reply.
pub fn normalize_suggestion(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let unquoted = ['"', '\'', '`']
        .iter()
        .find_map(|q| {
            trimmed
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .unwrap_or(trimmed);

    let normalized: String = unquoted.chars().filter(|c| !c.is_whitespace()).collect();
    (!normalized.is_empty()).then_some(normalized)
}
