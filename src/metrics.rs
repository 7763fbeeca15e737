use axum::{routing::get, Router};
use metrics::gauge;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::catalog::Catalog;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder and expose a static gauge for the
    /// embedded catalogue size.
    pub fn init() -> Self {
        // Millisecond buckets, topping out above the per-tier deadline.
        let builder = PrometheusBuilder::new()
            .set_buckets(&[
                5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1_000.0, 2_500.0, 5_000.0, 15_000.0,
            ])
            .expect("prometheus: non-empty bucket list");

        let handle = builder
            .install_recorder()
            .expect("prometheus: install recorder");

        gauge!("catalog_destinations").set(Catalog::global().len() as f64);

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
