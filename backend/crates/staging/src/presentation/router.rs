//! Staging Router

use auth::require_identity;
use axum::{Router, middleware::from_fn_with_state, routing::post};

use crate::domain::repository::BatchWriter;
use crate::presentation::handlers::{self, StagingAppState};

/// Create the staging router. Every route requires an access token.
pub fn staging_router<W>(state: StagingAppState<W>) -> Router
where
    W: BatchWriter + Send + Sync + 'static,
{
    let tokens = state.tokens.clone();

    Router::new()
        .route("/batches", post(handlers::stage_batch::<W>))
        .route("/batches/{data_key}/commit", post(handlers::commit_batch::<W>))
        .route_layer(from_fn_with_state(tokens, require_identity))
        .with_state(state)
}
