use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName};
use axum::response::Response;
use axum::Json;
use subtle::ConstantTimeEq;

use crate::models::booking::PaymentWebhookEvent;
use crate::state::AppState;
use crate::utils::response::success;
use crate::utils::{AppError, AppResult};

pub const WEBHOOK_SECRET_HEADER: HeaderName = HeaderName::from_static("x-webhook-secret");

/// Constant-time comparison of the shared secret.
fn secrets_match(given: &[u8], expected: &[u8]) -> bool {
    given.ct_eq(expected).into()
}

/// Called by the payment edge function once the provider settles a charge.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PaymentWebhookEvent>, JsonRejection>,
) -> AppResult<Response> {
    let given = headers
        .get(&WEBHOOK_SECRET_HEADER)
        .map(|v| v.as_bytes())
        .unwrap_or_default();
    if !secrets_match(given, state.config().webhook_secret.as_bytes()) {
        return Err(AppError::AuthError("Invalid webhook signature".to_string()));
    }

    let Json(event) = payload?;
    if event.payment_intent_id.trim().is_empty() {
        return Err(AppError::ValidationError(
            "payment_intent_id is required".to_string(),
        ));
    }

    let booking = state.bookings().apply_payment(&event).await?;
    Ok(success(booking, "Payment recorded"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_match() {
        assert!(secrets_match(b"whsec_123", b"whsec_123"));
        assert!(!secrets_match(b"whsec_124", b"whsec_123"));
        assert!(!secrets_match(b"whsec_12", b"whsec_123"));
        assert!(!secrets_match(b"", b"whsec_123"));
    }
}
