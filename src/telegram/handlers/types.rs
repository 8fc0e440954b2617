//! Handler types and dependencies

use std::sync::Arc;

use crate::core::config::Config;
use crate::download::StreamProvider;
use crate::search::VideoSearch;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub config: Arc<Config>,
    pub search: Arc<dyn VideoSearch>,
    pub streams: Arc<dyn StreamProvider>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(config: Arc<Config>, search: Arc<dyn VideoSearch>, streams: Arc<dyn StreamProvider>) -> Self {
        Self {
            config,
            search,
            streams,
        }
    }
}
