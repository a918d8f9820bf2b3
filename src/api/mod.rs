//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Bin and reporting endpoints are mounted under `/api/v1`; health and
//! configuration live at the root.

pub mod dto;
pub mod handlers;
pub mod openapi;

use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

pub use openapi::ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the served application: routes, Swagger UI when enabled, and
/// the tracing, CORS and timeout layers.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    let router = build_router();

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::domain::EmissionsFactors;
    use crate::persistence::MemoryStore;
    use crate::service::LedgerService;

    async fn app() -> Router {
        let Ok(service) = LedgerService::open(
            Arc::new(MemoryStore::new()),
            EmissionsFactors::default(),
            100.0,
            100.0,
            20,
        )
        .await
        else {
            panic!("memory store opens");
        };
        build_app(AppState::new(service), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn health_is_routed_at_root() {
        let Ok(request) = Request::get("/health").body(Body::empty()) else {
            panic!("valid request");
        };
        let Ok(response) = app().await.oneshot(request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let Ok(request) = Request::get("/api/v1/bins").body(Body::empty()) else {
            panic!("valid request");
        };
        let Ok(response) = app().await.oneshot(request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
