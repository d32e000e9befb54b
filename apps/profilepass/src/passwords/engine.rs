//! Password Engine — orchestrates generation over a batch of profiles.
//!
//! Flow per profile: resolve key → extract keywords → `count` times
//! (suggest or synthesize → validate → fallback on rejection).
//!
//! Rejected candidates and suggester failures are recovered here and only
//! logged. The only per-run failures are bad batches and a policy that even
//! the fallback path cannot satisfy.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::profile::{BatchEntry, Profile, ProfileBatch, SkippedProfile};
use crate::passwords::fallback::fallback_password;
use crate::passwords::keywords::extract_keywords;
use crate::passwords::policy::PasswordPolicy;
use crate::passwords::suggester::PasswordSuggester;
use crate::passwords::synthesizer::synthesize;

pub const DEFAULT_COUNT: usize = 5;
pub const MAX_COUNT: usize = 100;
pub const DEFAULT_MIN_PROFILES: usize = 1;
pub const DEFAULT_SUGGESTER_TIMEOUT: Duration = Duration::from_secs(10);

/// Fallback attempts per password before the policy is declared unsatisfiable.
const MAX_FALLBACK_ATTEMPTS: u32 = 8;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Problems with the batch as a whole. Nothing is generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("profile batch is empty")]
    Empty,

    #[error("profile batch has {found} records, at least {minimum} required")]
    BelowMinimum { found: usize, minimum: usize },

    #[error("profiles must be an array of objects, found {found}")]
    NotASequence { found: &'static str },

    #[error("count must be between 1 and 100, got {0}")]
    InvalidCount(usize),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Input(#[from] InputError),

    /// The fallback path could not satisfy the policy. Indicates a
    /// misconfigured policy, never bad input.
    #[error("fallback failed to satisfy the password policy after {attempts} attempts")]
    FallbackExhausted { attempts: u32 },
}

// ────────────────────────────────────────────────────────────────────────────
// Configuration & output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Passwords generated per profile.
    pub count: usize,
    pub policy: PasswordPolicy,
    /// Fixed seed for reproducible output. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Batches with fewer records are rejected.
    pub min_profiles: usize,
    /// Route candidates through the external suggester when one is attached.
    pub use_suggester: bool,
    pub suggester_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            policy: PasswordPolicy::default(),
            seed: None,
            min_profiles: DEFAULT_MIN_PROFILES,
            use_suggester: false,
            suggester_timeout: DEFAULT_SUGGESTER_TIMEOUT,
        }
    }
}

/// Where an accepted password came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    Synthesized,
    Suggested,
    Fallback,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub synthesized: usize,
    pub suggested: usize,
    pub fallback: usize,
}

impl GenerationStats {
    fn record(&mut self, source: CandidateSource) {
        match source {
            CandidateSource::Synthesized => self.synthesized += 1,
            CandidateSource::Suggested => self.suggested += 1,
            CandidateSource::Fallback => self.fallback += 1,
        }
    }
}

/// Result of one engine run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    /// Profile key → exactly `count` passwords, in batch order.
    pub passwords: IndexMap<String, Vec<String>>,
    pub skipped: Vec<SkippedProfile>,
    pub stats: GenerationStats,
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

/// Owns the random source for a run. Build one per request (or per task);
/// two engines with the same seed and input produce the same output.
pub struct PasswordEngine {
    config: EngineConfig,
    rng: StdRng,
    suggester: Option<Arc<dyn PasswordSuggester>>,
}

impl PasswordEngine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            suggester: None,
        }
    }

    pub fn with_suggester(mut self, suggester: Arc<dyn PasswordSuggester>) -> Self {
        self.suggester = Some(suggester);
        self
    }

    /// Generates `count` passwords for every usable profile in the batch.
    ///
    /// Malformed records are reported in `skipped`, not treated as failures.
    pub async fn generate(&mut self, batch: ProfileBatch) -> Result<GenerationReport, EngineError> {
        let count = self.config.count;
        if count == 0 || count > MAX_COUNT {
            return Err(InputError::InvalidCount(count).into());
        }
        if batch.is_empty() {
            return Err(InputError::Empty.into());
        }
        if batch.len() < self.config.min_profiles {
            return Err(InputError::BelowMinimum {
                found: batch.len(),
                minimum: self.config.min_profiles,
            }
            .into());
        }

        if self.config.use_suggester && self.suggester.is_none() {
            warn!("Suggester enabled but none attached — using local synthesis");
        }

        info!(
            "Generating {} passwords for each of {} records",
            count,
            batch.len()
        );

        let mut report = GenerationReport::default();

        for (index, entry) in batch.into_entries().into_iter().enumerate() {
            let profile = match entry {
                BatchEntry::Profile(profile) => profile,
                BatchEntry::Malformed(skipped) => {
                    warn!("Skipping record {}: {}", skipped.index, skipped.reason);
                    report.skipped.push(skipped);
                    continue;
                }
            };

            let key = unique_key(&report.passwords, resolve_key(&profile, index));
            let keywords = extract_keywords(&profile);
            if keywords.is_empty() {
                debug!("Profile {key} has no usable keywords");
            }

            let mut passwords = Vec::with_capacity(count);
            for _ in 0..count {
                let (password, source) = self.next_password(&keywords).await?;
                report.stats.record(source);
                passwords.push(password);
            }

            report.passwords.insert(key, passwords);
        }

        info!(
            "Generated passwords for {} profiles ({} skipped): {} synthesized, {} suggested, {} fallback",
            report.passwords.len(),
            report.skipped.len(),
            report.stats.synthesized,
            report.stats.suggested,
            report.stats.fallback
        );

        Ok(report)
    }

    /// Produces one policy-valid password for a keyword set.
    pub async fn next_password(
        &mut self,
        keywords: &BTreeSet<String>,
    ) -> Result<(String, CandidateSource), EngineError> {
        let candidate = match self.active_suggester() {
            Some(suggester) => self
                .suggest(suggester.as_ref(), keywords)
                .await
                .map(|pw| (pw, CandidateSource::Suggested)),
            None => Some((
                synthesize(keywords, &self.config.policy, &mut self.rng),
                CandidateSource::Synthesized,
            )),
        };

        if let Some((password, source)) = candidate {
            let violations = self.config.policy.violations(&password);
            if violations.is_empty() {
                return Ok((password, source));
            }
            debug!("Rejected {:?} candidate: {:?}", source, violations);
        }

        self.fallback(keywords)
    }

    fn active_suggester(&self) -> Option<Arc<dyn PasswordSuggester>> {
        if self.config.use_suggester {
            self.suggester.clone()
        } else {
            None
        }
    }

    /// Asks the suggester under a timeout. Every failure becomes `None`.
    async fn suggest(
        &self,
        suggester: &dyn PasswordSuggester,
        keywords: &BTreeSet<String>,
    ) -> Option<String> {
        match tokio::time::timeout(self.config.suggester_timeout, suggester.suggest(keywords))
            .await
        {
            Ok(Ok(password)) => Some(password),
            Ok(Err(e)) => {
                warn!("Suggester '{}' failed: {e}", suggester.name());
                None
            }
            Err(_) => {
                warn!(
                    "Suggester '{}' timed out after {}ms",
                    suggester.name(),
                    self.config.suggester_timeout.as_millis()
                );
                None
            }
        }
    }

    fn fallback(
        &mut self,
        keywords: &BTreeSet<String>,
    ) -> Result<(String, CandidateSource), EngineError> {
        for attempt in 1..=MAX_FALLBACK_ATTEMPTS {
            let password = fallback_password(keywords, &self.config.policy, &mut self.rng);
            if self.config.policy.is_valid(&password) {
                return Ok((password, CandidateSource::Fallback));
            }
            warn!(
                "Fallback attempt {}/{} produced an invalid password",
                attempt, MAX_FALLBACK_ATTEMPTS
            );
        }

        Err(EngineError::FallbackExhausted {
            attempts: MAX_FALLBACK_ATTEMPTS,
        })
    }
}

/// Identity from the profile, or `profile_<n>` with `n` the 1-based position.
fn resolve_key(profile: &Profile, index: usize) -> String {
    profile
        .identity()
        .unwrap_or_else(|| format!("profile_{}", index + 1))
}

/// Suffixes `_2`, `_3`, ... until the key is free.
fn unique_key(taken: &IndexMap<String, Vec<String>>, key: String) -> String {
    if !taken.contains_key(&key) {
        return key;
    }
    let unique = (2..)
        .map(|n| format!("{key}_{n}"))
        .find(|candidate| !taken.contains_key(candidate))
        .unwrap_or_default();
    warn!("Duplicate profile key '{key}', stored as '{unique}'");
    unique
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
