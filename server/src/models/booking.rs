use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{validate_holes, validate_players};
use crate::utils::AppError;

const MAX_SPECIAL_REQUESTS_LEN: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Whether the booking still occupies places on its slot.
    pub fn holds_places(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    pub fn is_cancellable(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub amateur_id: Uuid,
    pub pro_id: Uuid,
    pub golf_course_id: Uuid,
    pub availability_id: Option<Uuid>,
    pub booking_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub number_of_players: i32,
    pub holes: i32,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_intent_id: Option<String>,
    pub pro_fee: Decimal,
    pub platform_fee: Decimal,
    pub total_amount: Decimal,
    pub special_requests: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn involves(&self, profile_id: Uuid) -> bool {
        self.amateur_id == profile_id || self.pro_id == profile_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub pro_id: Uuid,
    pub golf_course_id: Uuid,
    pub booking_date: NaiveDate,
    pub availability_id: Option<Uuid>,
    pub number_of_players: i32,
    pub holes: i32,
    pub special_requests: Option<String>,
}

impl CreateBookingRequest {
    /// Checks that need no database round-trip.
    pub fn validate(&self, today: NaiveDate) -> Result<(), AppError> {
        validate_players(self.number_of_players)?;
        validate_holes(self.holes)?;
        if self.booking_date < today {
            return Err(AppError::ValidationError(
                "Cannot book a lesson in the past".to_string(),
            ));
        }
        if self
            .special_requests
            .as_ref()
            .is_some_and(|r| r.chars().count() > MAX_SPECIAL_REQUESTS_LEN)
        {
            return Err(AppError::ValidationError(
                "Special requests are too long".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
}

/// Body posted by the payment edge function once the provider settles.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentWebhookEvent {
    pub booking_id: Uuid,
    pub payment_intent_id: String,
    pub outcome: PaymentOutcome,
}
