use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::permissions::require_pro;
use crate::auth::AuthUser;
use crate::models::pricing::{QuoteQuery, UpsertPricingRequest};
use crate::state::AppState;
use crate::utils::response::{empty_success, success};
use crate::utils::{AppError, AppResult};

pub async fn list_pro_pricing(
    State(state): State<AppState>,
    auth: AuthUser,
    pro_id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(pro_id) = pro_id?;
    auth.profile(&state.profiles()).await?;

    let rows = state.pricing_rows().list_for_pro(pro_id).await?;
    Ok(success(rows, "Pricing retrieved"))
}

pub async fn get_quote(
    State(state): State<AppState>,
    auth: AuthUser,
    pro_id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<QuoteQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Path(pro_id) = pro_id?;
    let Query(query) = query?;
    auth.profile(&state.profiles()).await?;

    let quote = state
        .pricing()
        .quote(pro_id, query.holes, query.players)
        .await?;
    Ok(success(quote, "Quote computed"))
}

pub async fn upsert_my_pricing(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<UpsertPricingRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    body.validate()?;

    let pro = auth.profile(&state.profiles()).await?;
    require_pro(&pro)?;

    let rows = state
        .pricing_rows()
        .upsert_many(pro.id, &body.entries)
        .await?;
    tracing::info!(pro_id = %pro.id, entries = rows.len(), "Pricing updated");
    Ok(success(rows, "Pricing saved"))
}

pub async fn delete_my_pricing(
    State(state): State<AppState>,
    auth: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let pro = auth.profile(&state.profiles()).await?;
    require_pro(&pro)?;

    if !state.pricing_rows().delete(pro.id, id).await? {
        return Err(AppError::NotFound("Price not found".to_string()));
    }
    Ok(empty_success("Price deleted"))
}
