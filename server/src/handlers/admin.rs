//! Back-office endpoints: admin accounts, end users, bookings and
//! platform settings. Every handler loads the caller and checks the
//! relevant permission before touching data.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::permissions::{require_permission, require_super_admin};
use crate::auth::AuthUser;
use crate::models::booking::{BookingFilter, UpdateBookingStatusRequest};
use crate::models::pricing::UpdateCommissionRequest;
use crate::models::profile::{
    AdminPermission, GrantAdminRequest, ProfileSearchQuery, SuspendRequest,
    UpdatePermissionsRequest,
};
use crate::services::admin::AccountScope;
use crate::state::AppState;
use crate::utils::response::{empty_success, success};
use crate::utils::AppResult;

// Admin accounts

pub async fn list_admins(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<ProfileSearchQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Query(query) = query?;
    let actor = auth.profile(&state.profiles()).await?;
    let admins = state
        .accounts()
        .list(&actor, AccountScope::Admins, &query)
        .await?;
    Ok(success(admins, "Admins retrieved"))
}

pub async fn grant_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<GrantAdminRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    let actor = auth.profile(&state.profiles()).await?;
    let admin = state
        .accounts()
        .grant_admin(&actor, body.profile_id, body.role, &body.permissions)
        .await?;
    Ok(success(admin, "Admin rights granted"))
}

pub async fn update_admin_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdatePermissionsRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let Json(body) = payload?;
    let actor = auth.profile(&state.profiles()).await?;
    let admin = state
        .accounts()
        .update_permissions(&actor, id, body.role, &body.permissions)
        .await?;
    Ok(success(admin, "Permissions updated"))
}

// Shared account actions, scoped to admins or end users by the route.

async fn suspend(
    state: AppState,
    auth: AuthUser,
    scope: AccountScope,
    id: Uuid,
    body: SuspendRequest,
) -> AppResult<Response> {
    let reason = body.validated_reason()?;
    let actor = auth.profile(&state.profiles()).await?;
    let profile = state.accounts().suspend(&actor, scope, id, reason).await?;
    Ok(success(profile, "Account suspended"))
}

async fn reactivate(
    state: AppState,
    auth: AuthUser,
    scope: AccountScope,
    id: Uuid,
) -> AppResult<Response> {
    let actor = auth.profile(&state.profiles()).await?;
    let profile = state.accounts().reactivate(&actor, scope, id).await?;
    Ok(success(profile, "Account reactivated"))
}

async fn delete(
    state: AppState,
    auth: AuthUser,
    scope: AccountScope,
    id: Uuid,
) -> AppResult<Response> {
    let actor = auth.profile(&state.profiles()).await?;
    state.accounts().delete(&actor, scope, id).await?;
    Ok(empty_success("Account deleted"))
}

pub async fn suspend_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<SuspendRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let Json(body) = payload?;
    suspend(state, auth, AccountScope::Admins, id, body).await
}

pub async fn reactivate_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    reactivate(state, auth, AccountScope::Admins, id).await
}

pub async fn delete_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    delete(state, auth, AccountScope::Admins, id).await
}

// End users

pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<ProfileSearchQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Query(query) = query?;
    let actor = auth.profile(&state.profiles()).await?;
    let users = state
        .accounts()
        .list(&actor, AccountScope::Users, &query)
        .await?;
    Ok(success(users, "Users retrieved"))
}

pub async fn suspend_user(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<SuspendRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let Json(body) = payload?;
    suspend(state, auth, AccountScope::Users, id, body).await
}

pub async fn reactivate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    reactivate(state, auth, AccountScope::Users, id).await
}

pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    delete(state, auth, AccountScope::Users, id).await
}

// Bookings

pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    filter: Result<Query<BookingFilter>, QueryRejection>,
) -> AppResult<Response> {
    let Query(filter) = filter?;
    let admin = auth.profile(&state.profiles()).await?;
    require_permission(&admin, AdminPermission::ManageBookings)?;

    let bookings = state.bookings().list_all(filter.status).await?;
    Ok(success(bookings, "Bookings retrieved"))
}

pub async fn override_booking_status(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateBookingStatusRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let Json(body) = payload?;
    let admin = auth.profile(&state.profiles()).await?;
    require_permission(&admin, AdminPermission::ManageBookings)?;

    let booking = state
        .bookings()
        .override_status(&admin, id, body.status)
        .await?;
    Ok(success(booking, "Booking status updated"))
}

pub async fn delete_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let admin = auth.profile(&state.profiles()).await?;
    require_permission(&admin, AdminPermission::ManageBookings)?;

    state.bookings().delete(&admin, id).await?;
    Ok(empty_success("Booking deleted"))
}

// Settings

#[derive(Serialize)]
struct CommissionPayload {
    rate: rust_decimal::Decimal,
}

pub async fn get_commission(State(state): State<AppState>, auth: AuthUser) -> AppResult<Response> {
    let admin = auth.profile(&state.profiles()).await?;
    require_super_admin(&admin)?;

    let rate = state.pricing().commission_rate().await?;
    Ok(success(CommissionPayload { rate }, "Commission rate retrieved"))
}

pub async fn update_commission(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<UpdateCommissionRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    body.validate()?;

    let admin = auth.profile(&state.profiles()).await?;
    require_super_admin(&admin)?;

    state
        .settings()
        .set_commission_rate(body.rate, admin.id)
        .await?;
    tracing::info!(admin_id = %admin.id, rate = %body.rate, "Commission rate updated");
    Ok(success(CommissionPayload { rate: body.rate }, "Commission rate updated"))
}
