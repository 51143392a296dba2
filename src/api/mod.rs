//! API handlers for the club attendance REST endpoints

pub mod access_rules;
pub mod clients;
pub mod health;
pub mod memberships;
pub mod openapi;
pub mod visits;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Clients
        .route("/clients", get(clients::list_clients).post(clients::create_client))
        .route(
            "/clients/:id",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        .route("/clients/:id/block", put(clients::set_block_status))
        .route("/clients/:id/active", get(clients::get_client_activity))
        .route(
            "/clients/:id/memberships",
            get(memberships::list_client_memberships).post(memberships::create_membership),
        )
        // Memberships
        .route(
            "/memberships/:id",
            get(memberships::get_membership).delete(memberships::delete_membership),
        )
        // Access rules
        .route(
            "/memberships/:id/access-rules",
            get(access_rules::list_access_rules).post(access_rules::create_access_rule),
        )
        .route("/memberships/:id/access", get(access_rules::check_access))
        .route("/access-rules/:id", delete(access_rules::delete_access_rule))
        // Visits
        .route(
            "/memberships/:id/visits",
            get(visits::list_visits).post(visits::check_in),
        )
        .route("/memberships/:id/visits/exit", post(visits::check_out))
        .route("/memberships/:id/visits/count", get(visits::visit_count))
        .route("/memberships/:id/visits/last", get(visits::last_visit))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
