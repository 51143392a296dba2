//! Access rule endpoints and access checks

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::access_rule::{AccessRule, CreateAccessRule},
};

/// Access check query
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AccessQuery {
    /// Zone label (case-sensitive)
    pub zone: String,
}

/// Access check result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessDecision {
    pub membership_id: Uuid,
    pub zone: String,
    pub granted: bool,
}

/// List access rules of a membership
#[utoipa::path(
    get,
    path = "/memberships/{id}/access-rules",
    tag = "access",
    params(("id" = Uuid, Path, description = "Membership ID")),
    responses(
        (status = 200, description = "Access rules", body = Vec<AccessRule>)
    )
)]
pub async fn list_access_rules(
    State(state): State<crate::AppState>,
    Path(membership_id): Path<Uuid>,
) -> AppResult<Json<Vec<AccessRule>>> {
    let rules = state.services.access.get_access_rules_by_membership(membership_id).await?;
    Ok(Json(rules))
}

/// Create an access rule for a membership
#[utoipa::path(
    post,
    path = "/memberships/{id}/access-rules",
    tag = "access",
    params(("id" = Uuid, Path, description = "Membership ID")),
    request_body = CreateAccessRule,
    responses(
        (status = 201, description = "Access rule created", body = AccessRule),
        (status = 400, description = "Invalid rule", body = crate::error::ErrorResponse),
        (status = 404, description = "Membership not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_access_rule(
    State(state): State<crate::AppState>,
    Path(membership_id): Path<Uuid>,
    Json(data): Json<CreateAccessRule>,
) -> AppResult<(StatusCode, Json<AccessRule>)> {
    let rule = state.services.access.create_access_rule(membership_id, &data).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

/// Delete an access rule
#[utoipa::path(
    delete,
    path = "/access-rules/{id}",
    tag = "access",
    params(("id" = Uuid, Path, description = "Access rule ID")),
    responses(
        (status = 204, description = "Access rule deleted"),
        (status = 404, description = "Access rule not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_access_rule(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.access.delete_access_rule(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Check whether a membership may enter a zone now
#[utoipa::path(
    get,
    path = "/memberships/{id}/access",
    tag = "access",
    params(
        ("id" = Uuid, Path, description = "Membership ID"),
        AccessQuery
    ),
    responses(
        (status = 200, description = "Access decision", body = AccessDecision)
    )
)]
pub async fn check_access(
    State(state): State<crate::AppState>,
    Path(membership_id): Path<Uuid>,
    Query(query): Query<AccessQuery>,
) -> AppResult<Json<AccessDecision>> {
    let granted = state.services.access.check_access(membership_id, &query.zone).await?;
    Ok(Json(AccessDecision {
        membership_id,
        zone: query.zone,
        granted,
    }))
}
