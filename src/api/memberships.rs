//! Membership endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::membership::{CreateMembership, Membership},
};

/// List memberships of a client
#[utoipa::path(
    get,
    path = "/clients/{id}/memberships",
    tag = "memberships",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Membership list", body = Vec<Membership>),
        (status = 404, description = "Client not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_client_memberships(
    State(state): State<crate::AppState>,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<Vec<Membership>>> {
    let memberships = state.services.memberships.get_memberships_by_client(client_id).await?;
    Ok(Json(memberships))
}

/// Create a membership for a client
#[utoipa::path(
    post,
    path = "/clients/{id}/memberships",
    tag = "memberships",
    params(("id" = Uuid, Path, description = "Client ID")),
    request_body = CreateMembership,
    responses(
        (status = 201, description = "Membership created", body = Membership),
        (status = 404, description = "Client not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_membership(
    State(state): State<crate::AppState>,
    Path(client_id): Path<Uuid>,
    Json(data): Json<CreateMembership>,
) -> AppResult<(StatusCode, Json<Membership>)> {
    let membership = state.services.memberships.create_membership(client_id, &data).await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

/// Get membership by ID
#[utoipa::path(
    get,
    path = "/memberships/{id}",
    tag = "memberships",
    params(("id" = Uuid, Path, description = "Membership ID")),
    responses(
        (status = 200, description = "Membership details", body = Membership),
        (status = 404, description = "Membership not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_membership(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Membership>> {
    let membership = state.services.memberships.get_membership(id).await?;
    Ok(Json(membership))
}

/// Delete a membership
#[utoipa::path(
    delete,
    path = "/memberships/{id}",
    tag = "memberships",
    params(("id" = Uuid, Path, description = "Membership ID")),
    responses(
        (status = 204, description = "Membership deleted"),
        (status = 404, description = "Membership not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_membership(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.memberships.delete_membership(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
