use axum::response::Response;
use serde::Serialize;

use crate::utils::response::success;

pub mod admin;
pub mod availability;
pub mod bookings;
pub mod content;
pub mod courses;
pub mod pricing;
pub mod pro_requests;
pub mod profiles;
pub mod webhooks;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "fairway-api",
    };

    success(payload, "Health check successful")
}

/// Calendar day used for "not in the past" checks.
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}
