// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod catalog;
pub mod config;
pub mod currency;
pub mod fallback;
pub mod history;
pub mod interview;
pub mod metrics;
pub mod pipeline;
pub mod profile;
pub mod recommendation;
pub mod scoring;
pub mod sources;
pub mod taste;
pub mod viability;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::pipeline::{recommend, RecommendRequest};
pub use crate::profile::WebsiteProfile;
pub use crate::recommendation::RecommendationSet;
pub use crate::taste::{derive_taste, TasteProfile};

use once_cell::sync::OnceCell;
use shuttle_axum::axum::Router;

/// Build the application router the way the binary does: collaborators from
/// config, shared state, debug + metrics routes when `DEBUG_ROUTES=1`.
pub async fn app() -> anyhow::Result<Router> {
    let cfg = config::load_sources_config();
    let clients = sources::Collaborators::from_config(&cfg);
    clients.log_probe();

    let state = api::AppState::new(clients);
    let mut router = api::create_router(state);
    if api::debug_routes_enabled() {
        router = router.merge(prometheus().router());
    }
    Ok(router)
}

/// The Prometheus recorder can only be installed once per process; tests
/// build the app repeatedly, so the handle lives behind a `OnceCell`.
fn prometheus() -> &'static metrics::Metrics {
    static RECORDER: OnceCell<metrics::Metrics> = OnceCell::new();
    RECORDER.get_or_init(metrics::Metrics::init)
}
