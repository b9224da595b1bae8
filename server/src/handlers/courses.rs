use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::permissions::require_permission;
use crate::auth::AuthUser;
use crate::models::course::{CourseSearchQuery, CreateCourseRequest, UpdateCourseRequest};
use crate::models::profile::AdminPermission;
use crate::state::AppState;
use crate::utils::error::is_foreign_key_violation;
use crate::utils::response::{created, empty_success, success};
use crate::utils::search::{filter_by_term, SearchTerm};
use crate::utils::{AppError, AppResult};

pub async fn list_courses(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<CourseSearchQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Query(query) = query?;
    auth.profile(&state.profiles()).await?;

    let term = SearchTerm::new(query.q.as_deref());
    let courses = filter_by_term(state.courses().list().await?, &term);
    Ok(success(courses, "Courses retrieved"))
}

pub async fn get_course(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    auth.profile(&state.profiles()).await?;

    let course = state
        .courses()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
    Ok(success(course, "Course retrieved"))
}

pub async fn create_course(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateCourseRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    body.validate()?;

    let admin = auth.profile(&state.profiles()).await?;
    require_permission(&admin, AdminPermission::ManageCourses)?;

    let course = state.courses().create(&body).await?;
    tracing::info!(admin_id = %admin.id, course_id = %course.id, "Course created");
    Ok(created(course, "Course created"))
}

pub async fn update_course(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateCourseRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let Json(body) = payload?;
    body.validate()?;

    let admin = auth.profile(&state.profiles()).await?;
    require_permission(&admin, AdminPermission::ManageCourses)?;

    let course = state
        .courses()
        .update(id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
    Ok(success(course, "Course updated"))
}

pub async fn delete_course(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let admin = auth.profile(&state.profiles()).await?;
    require_permission(&admin, AdminPermission::ManageCourses)?;

    let deleted = state.courses().delete(id).await.map_err(|e| {
        if is_foreign_key_violation(&e) {
            AppError::Conflict("This course still has bookings".to_string())
        } else {
            AppError::DatabaseError(e)
        }
    })?;
    if !deleted {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    tracing::info!(admin_id = %admin.id, course_id = %id, "Course deleted");
    Ok(empty_success("Course deleted"))
}
