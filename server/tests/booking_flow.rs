//! End-to-end scenarios against a real Postgres.
//! Run with `TEST_DATABASE_URL=... cargo test -- --ignored`.

mod common;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use chrono::{Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use common::{body_json, database_app, json_request, token_for, WEBHOOK_SECRET};

struct Seed {
    amateur: Uuid,
    pro: Uuid,
    admin: Uuid,
    course: Uuid,
    slot: Uuid,
}

async fn insert_profile(pool: &PgPool, user_type: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO profiles (id, email, user_type) VALUES ($1, $2, $3::user_type)")
        .bind(id)
        .bind(format!("{}@fairway.test", id))
        .bind(user_type)
        .execute(pool)
        .await
        .unwrap();
    id
}

async fn insert_super_admin(pool: &PgPool) -> Uuid {
    let id = insert_profile(pool, "amateur").await;
    sqlx::query("UPDATE profiles SET is_admin = TRUE, admin_role = 'super_admin' WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
    id
}

/// Slot of 4 places with 1 already taken, 18-hole prices for 2 and 3 players.
async fn seed(pool: &PgPool) -> Seed {
    let amateur = insert_profile(pool, "amateur").await;
    let pro = insert_profile(pool, "pro").await;
    let admin = insert_super_admin(pool).await;

    let course: Uuid = sqlx::query_scalar(
        "INSERT INTO golf_parcours (name, city) VALUES ('Golf du Phare', 'Biarritz') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();

    let date = Utc::now().date_naive() + Duration::days(7);
    let slot: Uuid = sqlx::query_scalar(
        "INSERT INTO pro_availabilities
            (pro_id, golf_course_id, date, start_time, end_time, max_players, current_bookings)
         VALUES ($1, $2, $3, $4, $5, 4, 1)
         RETURNING id",
    )
    .bind(pro)
    .bind(course)
    .bind(date)
    .bind(NaiveTime::from_hms_opt(9, 0, 0).unwrap())
    .bind(NaiveTime::from_hms_opt(13, 0, 0).unwrap())
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO pro_pricing (pro_id, holes, players_count, price)
         VALUES ($1, 18, 2, 100.00), ($1, 18, 3, 90.00)",
    )
    .bind(pro)
    .execute(pool)
    .await
    .unwrap();

    Seed {
        amateur,
        pro,
        admin,
        course,
        slot,
    }
}

fn booking_body(seed: &Seed, players: i32) -> Value {
    json!({
        "pro_id": seed.pro,
        "golf_course_id": seed.course,
        "booking_date": Utc::now().date_naive() + Duration::days(7),
        "availability_id": seed.slot,
        "number_of_players": players,
        "holes": 18
    })
}

async fn book(app: &Router, seed: &Seed, amateur: Uuid, players: i32) -> Uuid {
    let token = token_for(amateur);
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/bookings",
            Some(&token),
            Some(booking_body(seed, players)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    serde_json::from_value(body["data"]["id"].clone()).unwrap()
}

fn payment_event(booking_id: Uuid, intent: &str, outcome: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhooks/payments")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-webhook-secret", WEBHOOK_SECRET)
        .body(Body::from(
            json!({
                "booking_id": booking_id,
                "payment_intent_id": intent,
                "outcome": outcome
            })
            .to_string(),
        ))
        .unwrap()
}

async fn override_status(
    app: &Router,
    admin: Uuid,
    booking_id: Uuid,
    status: &str,
) -> Response<Body> {
    let token = token_for(admin);
    let uri = format!("/admin/bookings/{}/status", booking_id);
    app.clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            Some(&token),
            Some(json!({ "status": status })),
        ))
        .await
        .unwrap()
}

async fn current_bookings(pool: &PgPool, slot: Uuid) -> i32 {
    sqlx::query_scalar("SELECT current_bookings FROM pro_availabilities WHERE id = $1")
        .bind(slot)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore]
async fn test_booking_payment_and_cancellation_flow() {
    let (app, pool) = database_app().await;
    let seed = seed(&pool).await;
    let token = token_for(seed.amateur);
    let request_body = booking_body(&seed, 2);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/bookings", Some(&token), Some(request_body.clone())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let booking_id: Uuid = serde_json::from_value(body["data"]["id"].clone()).unwrap();
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(current_bookings(&pool, seed.slot).await, 3);

    let (pro_fee, platform_fee, total): (Decimal, Decimal, Decimal) = sqlx::query_as(
        "SELECT pro_fee, platform_fee, total_amount FROM bookings WHERE id = $1",
    )
    .bind(booking_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(pro_fee, Decimal::new(20000, 2));
    assert!(platform_fee >= Decimal::ZERO && platform_fee < pro_fee);
    assert_eq!(total, pro_fee + platform_fee);

    // Only one place left.
    let response = app
        .clone()
        .oneshot(json_request("POST", "/bookings", Some(&token), Some(request_body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "CAPACITY_EXCEEDED");
    assert_eq!(body["error"]["message"], "Pas assez de places disponibles.");
    assert_eq!(current_bookings(&pool, seed.slot).await, 3);

    let response = app
        .clone()
        .oneshot(payment_event(booking_id, "pi_flow", "succeeded"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "confirmed");
    assert_eq!(body["data"]["payment_status"], "paid");

    let replay = app
        .clone()
        .oneshot(payment_event(booking_id, "pi_flow", "succeeded"))
        .await
        .unwrap();
    assert_eq!(replay.status(), StatusCode::OK);

    let uri = format!("/bookings/{}/cancel", booking_id);
    let response = app
        .clone()
        .oneshot(json_request("POST", &uri, Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(current_bookings(&pool, seed.slot).await, 1);

    let response = app
        .oneshot(json_request("POST", &uri, Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_missing_price_is_reported() {
    let (app, pool) = database_app().await;
    let seed = seed(&pool).await;
    let token = token_for(seed.amateur);

    let response = app
        .oneshot(json_request(
            "POST",
            "/bookings",
            Some(&token),
            Some(json!({
                "pro_id": seed.pro,
                "golf_course_id": seed.course,
                "booking_date": Utc::now().date_naive() + Duration::days(7),
                "number_of_players": 3,
                "holes": 9
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "PRICE_NOT_CONFIGURED");
}

#[tokio::test]
#[ignore]
async fn test_concurrent_bookers_cannot_overfill_a_slot() {
    let (app, pool) = database_app().await;
    let seed = seed(&pool).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        let token = token_for(seed.amateur);
        let body = booking_body(&seed, 2);
        handles.push(tokio::spawn(async move {
            app.oneshot(json_request("POST", "/bookings", Some(&token), Some(body)))
                .await
                .unwrap()
                .status()
        }));
    }

    let mut created = 0;
    for handle in handles {
        let status = handle.await.unwrap();
        if status == StatusCode::CREATED {
            created += 1;
        } else {
            assert_eq!(status, StatusCode::CONFLICT);
        }
    }

    // Three free places fit a single party of two.
    assert_eq!(created, 1);
    assert_eq!(current_bookings(&pool, seed.slot).await, 3);
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE availability_id = $1")
        .bind(seed.slot)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
#[ignore]
async fn test_failed_payment_cancels_and_frees_places() {
    let (app, pool) = database_app().await;
    let seed = seed(&pool).await;
    let booking_id = book(&app, &seed, seed.amateur, 2).await;
    assert_eq!(current_bookings(&pool, seed.slot).await, 3);

    let response = app
        .clone()
        .oneshot(payment_event(booking_id, "pi_declined", "failed"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "cancelled");
    assert_eq!(body["data"]["payment_status"], "failed");
    assert_eq!(current_bookings(&pool, seed.slot).await, 1);

    // A later success cannot revive a settled booking.
    let response = app
        .oneshot(payment_event(booking_id, "pi_retry", "succeeded"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(current_bookings(&pool, seed.slot).await, 1);
}

#[tokio::test]
#[ignore]
async fn test_override_out_of_cancelled_reserves_places() {
    let (app, pool) = database_app().await;
    let seed = seed(&pool).await;
    let first = book(&app, &seed, seed.amateur, 2).await;

    let response = override_status(&app, seed.admin, first, "cancelled").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(current_bookings(&pool, seed.slot).await, 1);

    let response = override_status(&app, seed.admin, first, "confirmed").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(current_bookings(&pool, seed.slot).await, 3);

    let response = override_status(&app, seed.admin, first, "cancelled").await;
    assert_eq!(response.status(), StatusCode::OK);
    let other = insert_profile(&pool, "amateur").await;
    book(&app, &seed, other, 3).await;
    assert_eq!(current_bookings(&pool, seed.slot).await, 4);

    let response = override_status(&app, seed.admin, first, "confirmed").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "CAPACITY_EXCEEDED");
    assert_eq!(current_bookings(&pool, seed.slot).await, 4);
}

#[tokio::test]
#[ignore]
async fn test_deleting_a_user_frees_their_places() {
    let (app, pool) = database_app().await;
    let seed = seed(&pool).await;
    book(&app, &seed, seed.amateur, 2).await;
    assert_eq!(current_bookings(&pool, seed.slot).await, 3);

    let token = token_for(seed.admin);
    let uri = format!("/admin/users/{}", seed.amateur);
    let response = app
        .oneshot(json_request("DELETE", &uri, Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(current_bookings(&pool, seed.slot).await, 1);
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE availability_id = $1")
        .bind(seed.slot)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
#[ignore]
async fn test_approval_promotes_and_is_final() {
    let (app, pool) = database_app().await;
    let applicant = insert_profile(&pool, "amateur").await;
    let admin = insert_super_admin(&pool).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/me/pro-request",
            Some(&token_for(applicant)),
            Some(json!({ "id_document_path": "documents/id-card.pdf", "experience_years": 6 })),
        ))
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body = body_json(response).await;
    let request_id: Uuid = serde_json::from_value(body["data"]["id"].clone()).unwrap();

    let admin_token = token_for(admin);
    let approve = format!("/admin/pro-requests/{}/approve", request_id);
    let response = app
        .clone()
        .oneshot(json_request("POST", &approve, Some(&admin_token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "approved");

    let user_type: String = sqlx::query_scalar("SELECT user_type::text FROM profiles WHERE id = $1")
        .bind(applicant)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(user_type, "pro");

    let response = app
        .clone()
        .oneshot(json_request("POST", &approve, Some(&admin_token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let reject = format!("/admin/pro-requests/{}/reject", request_id);
    let response = app
        .oneshot(json_request(
            "POST",
            &reject,
            Some(&admin_token),
            Some(json!({ "notes": "Document illisible" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
