//! Requests that must be answered without reaching the database.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use common::{body_json, json_request, offline_app, token_for};

#[tokio::test]
async fn test_health_check_with_security_headers() {
    let response = offline_app()
        .oneshot(json_request("GET", "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert!(!response.headers().contains_key("strict-transport-security"));

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_missing_token_is_not_authenticated() {
    let response = offline_app()
        .oneshot(json_request("GET", "/me", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "AUTH_ERROR");
}

#[tokio::test]
async fn test_forged_token_is_rejected() {
    let forged = format!("{}x", token_for(Uuid::new_v4()));
    let response = offline_app()
        .oneshot(json_request("GET", "/me/bookings", Some(&forged), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reject_without_notes_fails_before_any_lookup() {
    let token = token_for(Uuid::new_v4());
    let uri = format!("/admin/pro-requests/{}/reject", Uuid::new_v4());
    let response = offline_app()
        .oneshot(json_request("POST", &uri, Some(&token), Some(json!({ "notes": "   " }))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Rejection notes are required");
}

#[tokio::test]
async fn test_booking_with_too_many_players_is_rejected() {
    let token = token_for(Uuid::new_v4());
    let today = chrono::Utc::now().date_naive();
    let response = offline_app()
        .oneshot(json_request(
            "POST",
            "/bookings",
            Some(&token),
            Some(json!({
                "pro_id": Uuid::new_v4(),
                "golf_course_id": Uuid::new_v4(),
                "booking_date": today.succ_opt().unwrap(),
                "number_of_players": 5,
                "holes": 18
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_in_the_past_is_rejected() {
    let token = token_for(Uuid::new_v4());
    let yesterday = chrono::Utc::now().date_naive().pred_opt().unwrap();
    let response = offline_app()
        .oneshot(json_request(
            "POST",
            "/bookings",
            Some(&token),
            Some(json!({
                "pro_id": Uuid::new_v4(),
                "golf_course_id": Uuid::new_v4(),
                "booking_date": yesterday,
                "number_of_players": 2,
                "holes": 9
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "Cannot book a lesson in the past");
}

#[tokio::test]
async fn test_malformed_ids_and_bodies() {
    let token = token_for(Uuid::new_v4());
    let response = offline_app()
        .oneshot(json_request("GET", "/bookings/not-a-uuid", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = offline_app()
        .oneshot(json_request(
            "POST",
            "/bookings",
            Some(&token),
            Some(json!({ "holes": "eighteen" })),
        ))
        .await
        .unwrap();
    let status = response.status();
    let body = body_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_slot_with_inverted_times_is_rejected() {
    let token = token_for(Uuid::new_v4());
    let tomorrow = chrono::Utc::now().date_naive().succ_opt().unwrap();
    let response = offline_app()
        .oneshot(json_request(
            "POST",
            "/me/availabilities",
            Some(&token),
            Some(json!({
                "golf_course_id": Uuid::new_v4(),
                "date": tomorrow,
                "start_time": "16:00:00",
                "end_time": "14:00:00",
                "max_players": 2
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_webhook_requires_shared_secret() {
    let response = offline_app()
        .oneshot(json_request(
            "POST",
            "/webhooks/payments",
            None,
            Some(json!({
                "booking_id": Uuid::new_v4(),
                "payment_intent_id": "pi_1",
                "outcome": "succeeded"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_commission_rate_out_of_range() {
    let token = token_for(Uuid::new_v4());
    let response = offline_app()
        .oneshot(json_request(
            "PUT",
            "/admin/settings/commission",
            Some(&token),
            Some(json!({ "rate": "1.5" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
