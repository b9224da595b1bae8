use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::permissions::require_pro;
use crate::auth::AuthUser;
use crate::handlers::today;
use crate::models::availability::{
    AvailabilityQuery, CreateAvailabilityRequest, ProAvailability, UpdateAvailabilityRequest,
};
use crate::models::profile::Profile;
use crate::state::AppState;
use crate::utils::response::{created, empty_success, success};
use crate::utils::{AppError, AppResult};

pub async fn create_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateAvailabilityRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    body.validate(today())?;

    let pro = auth.profile(&state.profiles()).await?;
    require_pro(&pro)?;

    let course = state.courses().get_by_id(body.golf_course_id).await?;
    if course.is_none() {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    let slot = state.availability().create(pro.id, &body).await?;
    tracing::info!(pro_id = %pro.id, slot_id = %slot.id, date = %slot.date, "Slot opened");
    Ok(created(slot, "Slot created"))
}

pub async fn list_my_slots(State(state): State<AppState>, auth: AuthUser) -> AppResult<Response> {
    let pro = auth.profile(&state.profiles()).await?;
    require_pro(&pro)?;

    let slots = state.availability().list_for_pro(pro.id, today()).await?;
    Ok(success(slots, "Slots retrieved"))
}

pub async fn update_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateAvailabilityRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let Json(body) = payload?;

    let pro = auth.profile(&state.profiles()).await?;
    let slot = owned_slot(&state, &pro, id).await?;
    body.validate_against(&slot)?;

    let updated = state
        .availability()
        .update_max_players(id, body.max_players)
        .await?
        .ok_or(AppError::Conflict(
            "Players booked this slot in the meantime".to_string(),
        ))?;
    Ok(success(updated, "Slot updated"))
}

pub async fn delete_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let pro = auth.profile(&state.profiles()).await?;
    owned_slot(&state, &pro, id).await?;

    if !state.availability().delete_if_empty(id).await? {
        return Err(AppError::Conflict(
            "A slot with bookings cannot be deleted".to_string(),
        ));
    }
    Ok(empty_success("Slot deleted"))
}

pub async fn list_open_slots(
    State(state): State<AppState>,
    auth: AuthUser,
    pro_id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Path(pro_id) = pro_id?;
    let Query(query) = query?;
    let (from, to) = query.window(today())?;
    auth.profile(&state.profiles()).await?;

    let slots = state
        .availability()
        .list_open(pro_id, query.course_id, from, to)
        .await?;
    Ok(success(slots, "Available slots retrieved"))
}

async fn owned_slot(state: &AppState, pro: &Profile, id: Uuid) -> AppResult<ProAvailability> {
    require_pro(pro)?;
    state
        .availability()
        .get_by_id(id)
        .await?
        .filter(|slot| slot.pro_id == pro.id)
        .ok_or_else(|| AppError::NotFound("Slot not found".to_string()))
}
