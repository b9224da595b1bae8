use chrono::{NaiveTime, Utc};
use sqlx::{PgConnection, PgPool, Result as SqlxResult};
use uuid::Uuid;

use crate::models::booking::{Booking, BookingStatus, CreateBookingRequest, PaymentStatus};
use crate::services::pricing::Quote;

const BOOKING_COLUMNS: &str = "id, amateur_id, pro_id, golf_course_id, availability_id, \
     booking_date, start_time, number_of_players, holes, status, payment_status, \
     payment_intent_id, pro_fee, platform_fee, total_amount, special_requests, cancelled_at, \
     created_at, updated_at";

#[derive(Debug, Clone)]
pub struct BookingRepo {
    pool: PgPool,
}

impl BookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> SqlxResult<Option<Booking>> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Row lock for status changes that also move slot counters.
    pub async fn lock_by_id(conn: &mut PgConnection, id: Uuid) -> SqlxResult<Option<Booking>> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Locks the bookings of a profile, on either side, that still occupy
    /// places on a slot.
    pub async fn lock_holding_places(
        conn: &mut PgConnection,
        profile_id: Uuid,
    ) -> SqlxResult<Vec<Booking>> {
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings
             WHERE (amateur_id = $1 OR pro_id = $1)
               AND availability_id IS NOT NULL
               AND status <> 'cancelled'
             ORDER BY id
             FOR UPDATE"
        );
        sqlx::query_as::<_, Booking>(&sql)
            .bind(profile_id)
            .fetch_all(conn)
            .await
    }

    pub async fn list_for_amateur(&self, amateur_id: Uuid) -> SqlxResult<Vec<Booking>> {
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings
             WHERE amateur_id = $1
             ORDER BY booking_date DESC, created_at DESC"
        );
        sqlx::query_as::<_, Booking>(&sql)
            .bind(amateur_id)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn list_for_pro(&self, pro_id: Uuid) -> SqlxResult<Vec<Booking>> {
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings
             WHERE pro_id = $1
             ORDER BY booking_date DESC, created_at DESC"
        );
        sqlx::query_as::<_, Booking>(&sql)
            .bind(pro_id)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn list_all(&self, status: Option<BookingStatus>) -> SqlxResult<Vec<Booking>> {
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings
             WHERE ($1::booking_status IS NULL OR status = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Booking>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn insert(
        conn: &mut PgConnection,
        amateur_id: Uuid,
        data: &CreateBookingRequest,
        start_time: Option<NaiveTime>,
        quote: &Quote,
    ) -> SqlxResult<Booking> {
        let sql = format!(
            "INSERT INTO bookings
                (amateur_id, pro_id, golf_course_id, availability_id, booking_date, start_time,
                 number_of_players, holes, status, payment_status, pro_fee, platform_fee,
                 total_amount, special_requests)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {BOOKING_COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&sql)
            .bind(amateur_id)
            .bind(data.pro_id)
            .bind(data.golf_course_id)
            .bind(data.availability_id)
            .bind(data.booking_date)
            .bind(start_time)
            .bind(data.number_of_players)
            .bind(data.holes)
            .bind(BookingStatus::Pending)
            .bind(PaymentStatus::Pending)
            .bind(quote.pro_fee)
            .bind(quote.platform_fee)
            .bind(quote.total_amount)
            .bind(data.special_requests.as_deref())
            .fetch_one(conn)
            .await
    }

    pub async fn set_status(
        conn: &mut PgConnection,
        id: Uuid,
        status: BookingStatus,
    ) -> SqlxResult<Booking> {
        let cancelled_at = (status == BookingStatus::Cancelled).then(Utc::now);
        let sql = format!(
            "UPDATE bookings SET status = $2, cancelled_at = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {BOOKING_COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .bind(status)
            .bind(cancelled_at)
            .fetch_one(conn)
            .await
    }

    pub async fn set_payment(
        conn: &mut PgConnection,
        id: Uuid,
        status: BookingStatus,
        payment_status: PaymentStatus,
        payment_intent_id: &str,
    ) -> SqlxResult<Booking> {
        let cancelled_at = (status == BookingStatus::Cancelled).then(Utc::now);
        let sql = format!(
            "UPDATE bookings
             SET status = $2, payment_status = $3, payment_intent_id = $4,
                 cancelled_at = COALESCE($5, cancelled_at), updated_at = NOW()
             WHERE id = $1
             RETURNING {BOOKING_COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .bind(status)
            .bind(payment_status)
            .bind(payment_intent_id)
            .bind(cancelled_at)
            .fetch_one(conn)
            .await
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
