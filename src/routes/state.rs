use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;

use crate::{db::Store, middleware::TokenKeys, services::MetadataProvider};

/// Shared handles every handler can reach
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub tokens: Arc<TokenKeys>,
    /// Upper bound for each outbound call made while building recommendations
    pub outbound_timeout: Duration,
}

impl FromRef<AppState> for Arc<TokenKeys> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
