use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProHoleVideo {
    pub id: Uuid,
    pub pro_id: Uuid,
    pub golf_course_id: Option<Uuid>,
    pub hole_number: Option<i32>,
    pub title: String,
    pub video_path: String,
    pub thumbnail_path: Option<String>,
    pub is_premium: bool,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeeklyTip {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub media_path: Option<String>,
    pub week_start: NaiveDate,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVideoRequest {
    pub is_premium: Option<bool>,
    pub is_published: Option<bool>,
}

impl UpdateVideoRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_premium.is_none() && self.is_published.is_none() {
            return Err(AppError::ValidationError("Nothing to update".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTipRequest {
    pub title: String,
    pub content: String,
    pub media_path: Option<String>,
    pub week_start: NaiveDate,
}

impl CreateTipRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(AppError::ValidationError(
                "A tip needs a title and content".to_string(),
            ));
        }
        Ok(())
    }
}
