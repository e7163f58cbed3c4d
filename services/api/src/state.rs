//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the resources
//! every connection shares: the generation service client and the compiled
//! view templates. Per-user session state is never stored here; each
//! WebSocket connection owns its own `Session`.

use crate::config::Config;
use commai_core::conversation::ConversationService;
use minijinja::Environment;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub conversation_service: Arc<dyn ConversationService>,
    pub templates: Arc<Environment<'static>>,
    pub config: Arc<Config>,
}
