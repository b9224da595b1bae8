use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::permissions::require_permission;
use crate::auth::AuthUser;
use crate::models::content::{CreateTipRequest, UpdateVideoRequest};
use crate::models::profile::AdminPermission;
use crate::state::AppState;
use crate::utils::response::{created, empty_success, success};
use crate::utils::{AppError, AppResult};

pub async fn list_videos(State(state): State<AppState>, auth: AuthUser) -> AppResult<Response> {
    auth.profile(&state.profiles()).await?;
    let videos = state.content().list_videos(true).await?;
    Ok(success(videos, "Videos retrieved"))
}

pub async fn list_tips(State(state): State<AppState>, auth: AuthUser) -> AppResult<Response> {
    auth.profile(&state.profiles()).await?;
    let tips = state.content().list_tips().await?;
    Ok(success(tips, "Tips retrieved"))
}

pub async fn admin_list_videos(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Response> {
    let admin = auth.profile(&state.profiles()).await?;
    require_permission(&admin, AdminPermission::ManageContent)?;

    let videos = state.content().list_videos(false).await?;
    Ok(success(videos, "Videos retrieved"))
}

pub async fn update_video(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateVideoRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let Json(body) = payload?;
    body.validate()?;

    let admin = auth.profile(&state.profiles()).await?;
    require_permission(&admin, AdminPermission::ManageContent)?;

    let video = state
        .content()
        .update_video(id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    tracing::info!(
        admin_id = %admin.id,
        video_id = %id,
        is_premium = video.is_premium,
        is_published = video.is_published,
        "Video updated"
    );
    Ok(success(video, "Video updated"))
}

pub async fn delete_video(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let admin = auth.profile(&state.profiles()).await?;
    require_permission(&admin, AdminPermission::ManageContent)?;

    if !state.content().delete_video(id).await? {
        return Err(AppError::NotFound("Video not found".to_string()));
    }
    Ok(empty_success("Video deleted"))
}

pub async fn create_tip(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateTipRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    body.validate()?;

    let admin = auth.profile(&state.profiles()).await?;
    require_permission(&admin, AdminPermission::ManageContent)?;

    let tip = state.content().create_tip(&body, admin.id).await?;
    Ok(created(tip, "Tip published"))
}

pub async fn delete_tip(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let admin = auth.profile(&state.profiles()).await?;
    require_permission(&admin, AdminPermission::ManageContent)?;

    if !state.content().delete_tip(id).await? {
        return Err(AppError::NotFound("Tip not found".to_string()));
    }
    Ok(empty_success("Tip deleted"))
}
