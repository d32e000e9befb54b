//! Axum route handlers for the Passwords API.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::profile::ProfileBatch;
use crate::passwords::engine::{EngineConfig, GenerationReport, PasswordEngine};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GeneratePasswordsRequest {
    /// Expected to be an array of objects; anything else is a 400.
    pub profiles: Value,
    /// Overrides the configured passwords-per-profile.
    pub count: Option<usize>,
    /// Overrides the configured seed for this request only.
    pub seed: Option<u64>,
}

impl GeneratePasswordsRequest {
    fn engine_config(&self, base: &EngineConfig) -> EngineConfig {
        EngineConfig {
            count: self.count.unwrap_or(base.count),
            seed: self.seed.or(base.seed),
            ..base.clone()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/passwords
///
/// Generates candidate passwords for every profile in the batch.
/// Malformed records are listed under `skipped` instead of failing the call.
pub async fn handle_generate_passwords(
    State(state): State<AppState>,
    Json(request): Json<GeneratePasswordsRequest>,
) -> Result<Json<GenerationReport>, AppError> {
    let config = request.engine_config(&state.config.engine);
    let batch = ProfileBatch::from_json(request.profiles)?;

    let mut engine = PasswordEngine::new(config);
    if let Some(suggester) = &state.suggester {
        engine = engine.with_suggester(suggester.clone());
    }

    let report = engine.generate(batch).await?;
    Ok(Json(report))
}
