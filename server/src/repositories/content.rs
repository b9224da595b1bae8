use sqlx::{PgPool, Result as SqlxResult};
use uuid::Uuid;

use crate::models::content::{CreateTipRequest, ProHoleVideo, UpdateVideoRequest, WeeklyTip};

const VIDEO_COLUMNS: &str = "id, pro_id, golf_course_id, hole_number, title, video_path, \
     thumbnail_path, is_premium, is_published, created_at, updated_at";
const TIP_COLUMNS: &str = "id, title, content, media_path, week_start, created_by, created_at";

#[derive(Debug, Clone)]
pub struct ContentRepo {
    pool: PgPool,
}

impl ContentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_videos(&self, published_only: bool) -> SqlxResult<Vec<ProHoleVideo>> {
        let sql = format!(
            "SELECT {VIDEO_COLUMNS} FROM pro_hole_videos
             WHERE ($1 = FALSE OR is_published = TRUE)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProHoleVideo>(&sql)
            .bind(published_only)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn update_video(
        &self,
        id: Uuid,
        data: &UpdateVideoRequest,
    ) -> SqlxResult<Option<ProHoleVideo>> {
        let sql = format!(
            "UPDATE pro_hole_videos SET
                is_premium = COALESCE($2, is_premium),
                is_published = COALESCE($3, is_published),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {VIDEO_COLUMNS}"
        );
        sqlx::query_as::<_, ProHoleVideo>(&sql)
            .bind(id)
            .bind(data.is_premium)
            .bind(data.is_published)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn delete_video(&self, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM pro_hole_videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_tips(&self) -> SqlxResult<Vec<WeeklyTip>> {
        let sql = format!("SELECT {TIP_COLUMNS} FROM weekly_tips ORDER BY week_start DESC");
        sqlx::query_as::<_, WeeklyTip>(&sql).fetch_all(&self.pool).await
    }

    pub async fn create_tip(
        &self,
        data: &CreateTipRequest,
        created_by: Uuid,
    ) -> SqlxResult<WeeklyTip> {
        let sql = format!(
            "INSERT INTO weekly_tips (title, content, media_path, week_start, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {TIP_COLUMNS}"
        );
        sqlx::query_as::<_, WeeklyTip>(&sql)
            .bind(data.title.trim())
            .bind(data.content.trim())
            .bind(data.media_path.as_deref())
            .bind(data.week_start)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn delete_tip(&self, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM weekly_tips WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
