use axum::{
    http::Method,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod recommendations;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route(
            "/v1/recommendations",
            post(recommendations::build_recommendations).get(recommendations::list_recommendations),
        )
        .route("/v1/recommendations/{month}", get(recommendations::get_recommendation))
        .route("/v1/recommendations/{month}/verify", post(recommendations::verify_recommendation))
        .route("/v1/verifications", get(recommendations::list_verifications))
        .route("/v1/trend", post(recommendations::yearly_trend))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
