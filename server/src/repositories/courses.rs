use sqlx::{PgPool, Result as SqlxResult};
use uuid::Uuid;

use crate::models::course::{CreateCourseRequest, GolfCourse, UpdateCourseRequest};

const COURSE_COLUMNS: &str =
    "id, name, city, address, holes_count, description, image_path, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CourseRepo {
    pool: PgPool,
}

impl CourseRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> SqlxResult<Vec<GolfCourse>> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM golf_parcours ORDER BY name");
        sqlx::query_as::<_, GolfCourse>(&sql).fetch_all(&self.pool).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> SqlxResult<Option<GolfCourse>> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM golf_parcours WHERE id = $1");
        sqlx::query_as::<_, GolfCourse>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn create(&self, data: &CreateCourseRequest) -> SqlxResult<GolfCourse> {
        let sql = format!(
            "INSERT INTO golf_parcours (name, city, address, holes_count, description, image_path)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COURSE_COLUMNS}"
        );
        sqlx::query_as::<_, GolfCourse>(&sql)
            .bind(data.name.trim())
            .bind(data.city.trim())
            .bind(data.address.as_deref())
            .bind(data.holes_count)
            .bind(data.description.as_deref())
            .bind(data.image_path.as_deref())
            .fetch_one(&self.pool)
            .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        data: &UpdateCourseRequest,
    ) -> SqlxResult<Option<GolfCourse>> {
        let sql = format!(
            "UPDATE golf_parcours SET
                name = COALESCE($2, name),
                city = COALESCE($3, city),
                address = COALESCE($4, address),
                holes_count = COALESCE($5, holes_count),
                description = COALESCE($6, description),
                image_path = COALESCE($7, image_path),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COURSE_COLUMNS}"
        );
        sqlx::query_as::<_, GolfCourse>(&sql)
            .bind(id)
            .bind(data.name.as_deref().map(str::trim))
            .bind(data.city.as_deref().map(str::trim))
            .bind(data.address.as_deref())
            .bind(data.holes_count)
            .bind(data.description.as_deref())
            .bind(data.image_path.as_deref())
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM golf_parcours WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
