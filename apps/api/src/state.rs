use std::sync::Arc;

use crate::llm_client::CompletionService;
use crate::render::DocumentRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Everything here is immutable after startup; requests never share mutable state.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. Production: `LlmClient`; tests swap in a stub.
    pub llm: Arc<dyn CompletionService>,
    /// PDF renderer holding the font loaded at startup.
    pub renderer: DocumentRenderer,
}
