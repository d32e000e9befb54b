use std::sync::Arc;

use crate::config::Config;
use crate::passwords::suggester::PasswordSuggester;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// External password suggester. `None` unless `ENABLE_LLM_SUGGESTER` is set.
    pub suggester: Option<Arc<dyn PasswordSuggester>>,
}
