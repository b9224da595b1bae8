use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::handlers::today;
use crate::models::booking::CreateBookingRequest;
use crate::state::AppState;
use crate::utils::response::{created, success};
use crate::utils::AppResult;

pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    body.validate(today())?;

    let amateur = auth.profile(&state.profiles()).await?;
    let booking = state.bookings().create(&amateur, &body, today()).await?;
    Ok(created(booking, "Booking created, awaiting payment"))
}

pub async fn list_my_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Response> {
    let caller = auth.profile(&state.profiles()).await?;
    let bookings = state.bookings().list_for(&caller).await?;
    Ok(success(bookings, "Bookings retrieved"))
}

pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let caller = auth.profile(&state.profiles()).await?;
    let booking = state.bookings().get_for(&caller, id).await?;
    Ok(success(booking, "Booking retrieved"))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let caller = auth.profile(&state.profiles()).await?;
    let booking = state.bookings().cancel(&caller, id).await?;
    Ok(success(booking, "Booking cancelled"))
}
