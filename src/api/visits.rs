//! Visit endpoints (check-in, check-out, history)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::visit::{CreateVisit, Visit, VisitCount},
};

/// List visits of a membership
#[utoipa::path(
    get,
    path = "/memberships/{id}/visits",
    tag = "visits",
    params(("id" = Uuid, Path, description = "Membership ID")),
    responses(
        (status = 200, description = "Visit list", body = Vec<Visit>)
    )
)]
pub async fn list_visits(
    State(state): State<crate::AppState>,
    Path(membership_id): Path<Uuid>,
) -> AppResult<Json<Vec<Visit>>> {
    let visits = state.services.visits.get_visits_by_membership(membership_id).await?;
    Ok(Json(visits))
}

/// Check in to a zone
#[utoipa::path(
    post,
    path = "/memberships/{id}/visits",
    tag = "visits",
    params(("id" = Uuid, Path, description = "Membership ID")),
    request_body = CreateVisit,
    responses(
        (status = 201, description = "Visit opened", body = Visit),
        (status = 404, description = "Membership not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn check_in(
    State(state): State<crate::AppState>,
    Path(membership_id): Path<Uuid>,
    Json(data): Json<CreateVisit>,
) -> AppResult<(StatusCode, Json<Visit>)> {
    data.validate()?;
    let visit = state.services.visits.create_visit(membership_id, &data.zone).await?;
    Ok((StatusCode::CREATED, Json(visit)))
}

/// Check out: close the last visit
#[utoipa::path(
    post,
    path = "/memberships/{id}/visits/exit",
    tag = "visits",
    params(("id" = Uuid, Path, description = "Membership ID")),
    responses(
        (status = 200, description = "Visit closed", body = Visit),
        (status = 204, description = "No visit to close")
    )
)]
pub async fn check_out(
    State(state): State<crate::AppState>,
    Path(membership_id): Path<Uuid>,
) -> AppResult<Response> {
    let response = match state.services.visits.record_exit(membership_id).await? {
        Some(visit) => Json(visit).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}

/// Count visits of a membership
#[utoipa::path(
    get,
    path = "/memberships/{id}/visits/count",
    tag = "visits",
    params(("id" = Uuid, Path, description = "Membership ID")),
    responses(
        (status = 200, description = "Visit count", body = VisitCount)
    )
)]
pub async fn visit_count(
    State(state): State<crate::AppState>,
    Path(membership_id): Path<Uuid>,
) -> AppResult<Json<VisitCount>> {
    let count = state.services.visits.get_visit_count_by_membership(membership_id).await?;
    Ok(Json(VisitCount { membership_id, count }))
}

/// Last visit of a membership (latest entry time, open or closed)
#[utoipa::path(
    get,
    path = "/memberships/{id}/visits/last",
    tag = "visits",
    params(("id" = Uuid, Path, description = "Membership ID")),
    responses(
        (status = 200, description = "Last visit", body = Visit),
        (status = 404, description = "No visit", body = crate::error::ErrorResponse)
    )
)]
pub async fn last_visit(
    State(state): State<crate::AppState>,
    Path(membership_id): Path<Uuid>,
) -> AppResult<Json<Visit>> {
    state
        .services
        .visits
        .get_last_visit_by_membership(membership_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No visit for membership {}", membership_id)))
}
