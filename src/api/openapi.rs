//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{access_rules, clients, health, memberships, visits};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Club Attendance API",
        version = "0.1.0",
        description = "Clients, memberships, zone access rules and visits"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Clients
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        clients::set_block_status,
        clients::get_client_activity,
        // Memberships
        memberships::list_client_memberships,
        memberships::create_membership,
        memberships::get_membership,
        memberships::delete_membership,
        // Access
        access_rules::list_access_rules,
        access_rules::create_access_rule,
        access_rules::delete_access_rule,
        access_rules::check_access,
        // Visits
        visits::list_visits,
        visits::check_in,
        visits::check_out,
        visits::visit_count,
        visits::last_visit,
    ),
    components(
        schemas(
            // Clients
            crate::models::client::Client,
            crate::models::client::CreateClient,
            crate::models::client::UpdateClient,
            crate::models::client::BlockStatus,
            crate::models::client::ClientActivity,
            // Memberships
            crate::models::membership::Membership,
            crate::models::membership::CreateMembership,
            // Access
            crate::models::access_rule::AccessRule,
            crate::models::access_rule::CreateAccessRule,
            access_rules::AccessQuery,
            access_rules::AccessDecision,
            // Visits
            crate::models::visit::Visit,
            crate::models::visit::CreateVisit,
            crate::models::visit::VisitCount,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "clients", description = "Client management"),
        (name = "memberships", description = "Membership management"),
        (name = "access", description = "Zone access rules and checks"),
        (name = "visits", description = "Check-in and check-out")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
