use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::passwords::engine::{
    EngineConfig, DEFAULT_COUNT, DEFAULT_MIN_PROFILES, DEFAULT_SUGGESTER_TIMEOUT,
};
use crate::passwords::policy::{
    PasswordPolicy, DEFAULT_MAX_LEN, DEFAULT_MIN_LEN, DEFAULT_SYMBOLS,
};

/// Application configuration loaded from environment variables.
/// Startup fails if the password policy is unsatisfiable or the suggester is
/// enabled without an API key.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub anthropic_api_key: Option<String>,
    pub llm_model: String,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let policy = PasswordPolicy::new(
            parse_or(&lookup, "PASSWORD_MIN_LEN", DEFAULT_MIN_LEN)?,
            parse_or(&lookup, "PASSWORD_MAX_LEN", DEFAULT_MAX_LEN)?,
            &lookup("PASSWORD_SYMBOLS").unwrap_or_else(|| DEFAULT_SYMBOLS.to_string()),
        )
        .context("PASSWORD_MIN_LEN, PASSWORD_MAX_LEN and PASSWORD_SYMBOLS must form a satisfiable policy")?;

        let use_suggester = parse_or(&lookup, "ENABLE_LLM_SUGGESTER", false)?;
        let anthropic_api_key = lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty());
        if use_suggester && anthropic_api_key.is_none() {
            anyhow::bail!("ANTHROPIC_API_KEY is required when ENABLE_LLM_SUGGESTER is true");
        }

        let seed = lookup("PASSWORD_SEED")
            .map(|s| s.parse::<u64>())
            .transpose()
            .context("PASSWORD_SEED must be an unsigned integer")?;

        let engine = EngineConfig {
            count: parse_or(&lookup, "PASSWORD_COUNT", DEFAULT_COUNT)?,
            policy,
            seed,
            min_profiles: parse_or(&lookup, "MIN_BATCH_SIZE", DEFAULT_MIN_PROFILES)?,
            use_suggester,
            suggester_timeout: Duration::from_secs(parse_or(
                &lookup,
                "SUGGESTER_TIMEOUT_SECS",
                DEFAULT_SUGGESTER_TIMEOUT.as_secs(),
            )?),
        };

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            anthropic_api_key,
            llm_model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            engine,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
