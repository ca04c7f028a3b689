//! Readiness check that probes the Vearch cluster.

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use domain_vector::{VectorRepository, VectorService};
use std::sync::Arc;

pub async fn ready_handler<R: VectorRepository + 'static>(
    State(service): State<Arc<VectorService<R>>>,
) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "vearch",
        Box::pin(async {
            service
                .ping()
                .await
                .map_err(|e| format!("Vearch ping failed: {}", e))
        }),
    )];

    run_health_checks(checks).await.into_response()
}

/// `/ready`: 200 while Vearch answers, 503 otherwise
pub fn ready_router<R: VectorRepository + 'static>(service: Arc<VectorService<R>>) -> Router {
    Router::new()
        .route("/ready", get(ready_handler::<R>))
        .with_state(service)
}
