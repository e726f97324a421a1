pub mod handlers;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;

use crate::system::cache::SnapshotCache;

/// Two routes: the dashboard page and the JSON feed it polls. State is just
/// the snapshot cache; handlers never touch the sampler.
pub fn router(cache: SnapshotCache) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/system-data", get(handlers::system_data))
        .with_state(cache)
        .layer(CorsLayer::permissive())
}
