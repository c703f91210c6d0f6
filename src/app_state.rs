use std::sync::Arc;

use crate::{auth::JwtManager, store::Store};

/// Shared, read-only handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, jwt: JwtManager) -> Self {
        AppState {
            store,
            jwt: Arc::new(jwt),
        }
    }
}
