use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool, Result as SqlxResult};
use uuid::Uuid;

use crate::models::availability::{CreateAvailabilityRequest, ProAvailability};

const AVAILABILITY_COLUMNS: &str = "id, pro_id, golf_course_id, date, start_time, end_time, \
     max_players, current_bookings, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct AvailabilityRepo {
    pool: PgPool,
}

impl AvailabilityRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        pro_id: Uuid,
        data: &CreateAvailabilityRequest,
    ) -> SqlxResult<ProAvailability> {
        let sql = format!(
            "INSERT INTO pro_availabilities
                (pro_id, golf_course_id, date, start_time, end_time, max_players)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {AVAILABILITY_COLUMNS}"
        );
        sqlx::query_as::<_, ProAvailability>(&sql)
            .bind(pro_id)
            .bind(data.golf_course_id)
            .bind(data.date)
            .bind(data.start_time)
            .bind(data.end_time)
            .bind(data.max_players)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn get_by_id(&self, id: Uuid) -> SqlxResult<Option<ProAvailability>> {
        let sql = format!("SELECT {AVAILABILITY_COLUMNS} FROM pro_availabilities WHERE id = $1");
        sqlx::query_as::<_, ProAvailability>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Every slot of a pro from `from` onwards, full or not.
    pub async fn list_for_pro(
        &self,
        pro_id: Uuid,
        from: NaiveDate,
    ) -> SqlxResult<Vec<ProAvailability>> {
        let sql = format!(
            "SELECT {AVAILABILITY_COLUMNS} FROM pro_availabilities
             WHERE pro_id = $1 AND date >= $2
             ORDER BY date, start_time"
        );
        sqlx::query_as::<_, ProAvailability>(&sql)
            .bind(pro_id)
            .bind(from)
            .fetch_all(&self.pool)
            .await
    }

    /// Slots that can still take at least one player.
    pub async fn list_open(
        &self,
        pro_id: Uuid,
        course_id: Option<Uuid>,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> SqlxResult<Vec<ProAvailability>> {
        let sql = format!(
            "SELECT {AVAILABILITY_COLUMNS} FROM pro_availabilities
             WHERE pro_id = $1
               AND ($2::uuid IS NULL OR golf_course_id = $2)
               AND date >= $3
               AND ($4::date IS NULL OR date <= $4)
               AND current_bookings < max_players
             ORDER BY date, start_time"
        );
        sqlx::query_as::<_, ProAvailability>(&sql)
            .bind(pro_id)
            .bind(course_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
    }

    /// Capacity change guarded against bookings that landed in between.
    pub async fn update_max_players(
        &self,
        id: Uuid,
        max_players: i32,
    ) -> SqlxResult<Option<ProAvailability>> {
        let sql = format!(
            "UPDATE pro_availabilities SET max_players = $2, updated_at = NOW()
             WHERE id = $1 AND current_bookings <= $2
             RETURNING {AVAILABILITY_COLUMNS}"
        );
        sqlx::query_as::<_, ProAvailability>(&sql)
            .bind(id)
            .bind(max_players)
            .fetch_optional(&self.pool)
            .await
    }

    /// Deletes a slot only while nobody is booked on it.
    pub async fn delete_if_empty(&self, id: Uuid) -> SqlxResult<bool> {
        let result =
            sqlx::query("DELETE FROM pro_availabilities WHERE id = $1 AND current_bookings = 0")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Takes `players` places in a single conditional update. Returns `None`
    /// when the slot is missing or the places are no longer available, so
    /// two concurrent bookers cannot both succeed.
    pub async fn reserve_places(
        conn: &mut PgConnection,
        id: Uuid,
        players: i32,
    ) -> SqlxResult<Option<ProAvailability>> {
        let sql = format!(
            "UPDATE pro_availabilities
             SET current_bookings = current_bookings + $2, updated_at = NOW()
             WHERE id = $1 AND current_bookings + $2 <= max_players
             RETURNING {AVAILABILITY_COLUMNS}"
        );
        sqlx::query_as::<_, ProAvailability>(&sql)
            .bind(id)
            .bind(players)
            .fetch_optional(conn)
            .await
    }

    pub async fn release_places(
        conn: &mut PgConnection,
        id: Uuid,
        players: i32,
    ) -> SqlxResult<u64> {
        let result = sqlx::query(
            "UPDATE pro_availabilities
             SET current_bookings = GREATEST(current_bookings - $2, 0), updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(players)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
