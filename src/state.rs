use crate::config::{Config, Limits};
use crate::transport::Transport;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// The transport is held behind `Arc<dyn Transport>` so tests can inject a
/// scripted collaborator; each handler call owns its own walk state, the
/// transport itself is stateless and safe to share.
pub struct AppState {
    pub limits: Limits,
    pub transport: Arc<dyn Transport>,
    /// Flag indicating the service is ready to take requests.
    pub ready: AtomicBool,
    #[allow(dead_code)]
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Self {
        let limits = config.limits;
        let state = Self {
            limits,
            transport,
            ready: AtomicBool::new(false),
            config: Arc::new(config),
        };

        // No warmup to run: readiness is configuration-complete state.
        state.ready.store(true, Ordering::SeqCst);
        state
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}
