//! Rutas HTTP
//!
//! Todo lo que cuelga de `/api` exige el token de la API; `/health` queda
//! abierto para los probes.

pub mod authorized_routes;
pub mod export_routes;
pub mod lookup_routes;
pub mod person_routes;
pub mod vehicle_people_routes;
pub mod vehicle_routes;
pub mod visit_routes;

use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::{cors_layer, require_api_token};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

/// Router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .nest("/people", person_routes::create_person_router())
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/vehicle-people", vehicle_people_routes::create_vehicle_people_router())
        .nest("/authorized", authorized_routes::create_authorized_router())
        .nest("/lookup", lookup_routes::create_lookup_router())
        .nest("/visits", visit_routes::create_visit_router())
        .nest("/pdf", export_routes::create_export_router())
        .route_layer(from_fn_with_state(state.clone(), require_api_token));

    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "status": "healthy",
        "service": "gate_control",
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn route_not_found() -> AppError {
    not_found_error("Rota não encontrada.")
}
