use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::pro_request::{
    ProRequestFilter, RejectProRequest, ReviewDecision, SubmitProRequest,
};
use crate::state::AppState;
use crate::utils::response::{created, success};
use crate::utils::AppResult;

pub async fn submit_pro_request(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<SubmitProRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    body.validate()?;

    let applicant = auth.profile(&state.profiles()).await?;
    let request = state.pro_validation().submit(&applicant, &body).await?;
    Ok(created(request, "Application submitted"))
}

pub async fn my_pro_request(State(state): State<AppState>, auth: AuthUser) -> AppResult<Response> {
    let applicant = auth.profile(&state.profiles()).await?;
    let request = state.pro_validation().latest_for(&applicant).await?;
    Ok(success(request, "Application retrieved"))
}

pub async fn list_pro_requests(
    State(state): State<AppState>,
    auth: AuthUser,
    filter: Result<Query<ProRequestFilter>, QueryRejection>,
) -> AppResult<Response> {
    let Query(filter) = filter?;
    let reviewer = auth.profile(&state.profiles()).await?;
    let requests = state.pro_validation().list(&reviewer, filter.status).await?;
    Ok(success(requests, "Applications retrieved"))
}

pub async fn approve_pro_request(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let reviewer = auth.profile(&state.profiles()).await?;
    let request = state
        .pro_validation()
        .review(&reviewer, id, ReviewDecision::Approve)
        .await?;
    Ok(success(request, "Application approved"))
}

/// Notes are checked before the reviewer's profile is even loaded.
pub async fn reject_pro_request(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<RejectProRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let Json(body) = payload?;
    let decision = ReviewDecision::reject(&body.notes)?;

    let reviewer = auth.profile(&state.profiles()).await?;
    let request = state.pro_validation().review(&reviewer, id, decision).await?;
    Ok(success(request, "Application rejected"))
}
