//! Client management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::client::{BlockStatus, Client, ClientActivity, CreateClient, UpdateClient},
};

/// List clients
#[utoipa::path(
    get,
    path = "/clients",
    tag = "clients",
    responses(
        (status = 200, description = "Client list", body = Vec<Client>)
    )
)]
pub async fn list_clients(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Client>>> {
    let clients = state.services.clients.list_clients().await?;
    Ok(Json(clients))
}

/// Get client by ID
#[utoipa::path(
    get,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client details", body = Client),
        (status = 404, description = "Client not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_client(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Client>> {
    let client = state.services.clients.get_client(id).await?;
    Ok(Json(client))
}

/// Create a client
#[utoipa::path(
    post,
    path = "/clients",
    tag = "clients",
    request_body = CreateClient,
    responses(
        (status = 201, description = "Client created", body = Client),
        (status = 409, description = "Email already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_client(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let client = state.services.clients.create_client(&data).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// Update a client
#[utoipa::path(
    put,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    request_body = UpdateClient,
    responses(
        (status = 200, description = "Client updated", body = Client),
        (status = 404, description = "Client not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_client(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateClient>,
) -> AppResult<Json<Client>> {
    let client = state.services.clients.update_client(id, &data).await?;
    Ok(Json(client))
}

/// Delete a client with its memberships
#[utoipa::path(
    delete,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_client(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.clients.delete_client(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Block or unblock a client
#[utoipa::path(
    put,
    path = "/clients/{id}/block",
    tag = "clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    request_body = BlockStatus,
    responses(
        (status = 200, description = "Block status updated", body = Client),
        (status = 404, description = "Client not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn set_block_status(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<BlockStatus>,
) -> AppResult<Json<Client>> {
    state
        .services
        .clients
        .set_block_status(id, data.blocked)
        .await?
        .map(Json)
        .ok_or(AppError::ClientNotFound(id))
}

/// Whether a client is active (exists and is not blocked)
#[utoipa::path(
    get,
    path = "/clients/{id}/active",
    tag = "clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client activity", body = ClientActivity)
    )
)]
pub async fn get_client_activity(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ClientActivity>> {
    let active = state.services.clients.is_active_client(id).await?;
    Ok(Json(ClientActivity { client_id: id, active }))
}
