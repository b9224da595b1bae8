use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::profile::{ProfileSearchQuery, PublicProfile, UpdateProfileRequest};
use crate::state::AppState;
use crate::utils::response::success;
use crate::utils::search::{filter_by_term, SearchTerm};
use crate::utils::{AppError, AppResult};

pub async fn get_me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Response> {
    let profile = auth.profile(&state.profiles()).await?;
    Ok(success(profile, "Profile retrieved"))
}

pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    body.validate()?;

    let profiles = state.profiles();
    let profile = auth.profile(&profiles).await?;
    let updated = profiles
        .update(profile.id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(success(updated, "Profile updated"))
}

pub async fn list_pros(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<ProfileSearchQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Query(query) = query?;
    let profiles = state.profiles();
    auth.profile(&profiles).await?;

    let term = SearchTerm::new(query.q.as_deref());
    let pros = filter_by_term(profiles.list_pros().await?, &term);
    let pros: Vec<PublicProfile> = pros.into_iter().map(PublicProfile::from).collect();
    Ok(success(pros, "Pros retrieved"))
}

pub async fn get_pro(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let profiles = state.profiles();
    auth.profile(&profiles).await?;

    let pro = profiles
        .get_by_id(id)
        .await?
        .filter(|p| p.is_pro() && !p.is_suspended())
        .ok_or_else(|| AppError::NotFound("Pro not found".to_string()))?;

    Ok(success(PublicProfile::from(pro), "Pro retrieved"))
}
