use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{
    admin, availability, bookings, content, courses, health_check, pricing, pro_requests,
    profiles, webhooks,
};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let cors = create_cors_layer(&state.config().cors_allowed_origins);
    let security = create_security_headers_layer(state.config().production);

    Router::new()
        .route("/health", get(health_check))
        .merge(player_routes())
        .nest("/admin", admin_routes())
        .route("/webhooks/payments", post(webhooks::payment_webhook))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(security)
        .layer(cors)
}

/// Routes used by the mobile app, for amateurs and pros alike.
fn player_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(profiles::get_me).patch(profiles::update_me))
        .route("/me/bookings", get(bookings::list_my_bookings))
        .route(
            "/me/availabilities",
            get(availability::list_my_slots).post(availability::create_slot),
        )
        .route(
            "/me/availabilities/:id",
            patch(availability::update_slot).delete(availability::delete_slot),
        )
        .route("/me/pricing", put(pricing::upsert_my_pricing))
        .route("/me/pricing/:id", axum::routing::delete(pricing::delete_my_pricing))
        .route(
            "/me/pro-request",
            get(pro_requests::my_pro_request).post(pro_requests::submit_pro_request),
        )
        .route("/pros", get(profiles::list_pros))
        .route("/pros/:id", get(profiles::get_pro))
        .route("/pros/:id/pricing", get(pricing::list_pro_pricing))
        .route("/pros/:id/quote", get(pricing::get_quote))
        .route("/pros/:id/availabilities", get(availability::list_open_slots))
        .route("/courses", get(courses::list_courses))
        .route("/courses/:id", get(courses::get_course))
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/:id", get(bookings::get_booking))
        .route("/bookings/:id/cancel", post(bookings::cancel_booking))
        .route("/content/videos", get(content::list_videos))
        .route("/content/tips", get(content::list_tips))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admins", get(admin::list_admins).post(admin::grant_admin))
        .route("/admins/:id", axum::routing::delete(admin::delete_admin))
        .route("/admins/:id/permissions", put(admin::update_admin_permissions))
        .route("/admins/:id/suspend", post(admin::suspend_admin))
        .route("/admins/:id/reactivate", post(admin::reactivate_admin))
        .route("/users", get(admin::list_users))
        .route("/users/:id", axum::routing::delete(admin::delete_user))
        .route("/users/:id/suspend", post(admin::suspend_user))
        .route("/users/:id/reactivate", post(admin::reactivate_user))
        .route("/pro-requests", get(pro_requests::list_pro_requests))
        .route("/pro-requests/:id/approve", post(pro_requests::approve_pro_request))
        .route("/pro-requests/:id/reject", post(pro_requests::reject_pro_request))
        .route("/bookings", get(admin::list_bookings))
        .route("/bookings/:id", axum::routing::delete(admin::delete_booking))
        .route("/bookings/:id/status", put(admin::override_booking_status))
        .route("/courses", post(courses::create_course))
        .route(
            "/courses/:id",
            patch(courses::update_course).delete(courses::delete_course),
        )
        .route("/videos", get(content::admin_list_videos))
        .route(
            "/videos/:id",
            patch(content::update_video).delete(content::delete_video),
        )
        .route("/tips", post(content::create_tip))
        .route("/tips/:id", axum::routing::delete(content::delete_tip))
        .route(
            "/settings/commission",
            get(admin::get_commission).put(admin::update_commission),
        )
}
