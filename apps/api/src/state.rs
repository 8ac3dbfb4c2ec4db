use std::sync::Arc;

use sqlx::PgPool;

use crate::email::assembler::EmailAssembler;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable email assembler. Default: TemplateAssembler.
    /// Swapped to the LLM-backed assembler via ENABLE_LLM_EMAILS.
    pub assembler: Arc<dyn EmailAssembler>,
}
