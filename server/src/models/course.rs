use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::search::Searchable;
use crate::utils::AppError;

const COURSE_LAYOUTS: [i32; 4] = [9, 18, 27, 36];

/// A golf course (`golf_parcours`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GolfCourse {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub address: Option<String>,
    pub holes_count: i32,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for GolfCourse {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            Some(self.city.as_str()),
            self.address.as_deref(),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseRequest {
    pub name: String,
    pub city: String,
    pub address: Option<String>,
    #[serde(default = "default_holes_count")]
    pub holes_count: i32,
    pub description: Option<String>,
    pub image_path: Option<String>,
}

fn default_holes_count() -> i32 {
    18
}

impl CreateCourseRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::ValidationError("Course name is required".to_string()));
        }
        if self.city.trim().is_empty() {
            return Err(AppError::ValidationError("Course city is required".to_string()));
        }
        validate_layout(self.holes_count)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub holes_count: Option<i32>,
    pub description: Option<String>,
    pub image_path: Option<String>,
}

impl UpdateCourseRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::ValidationError("Course name cannot be empty".to_string()));
        }
        if self.city.as_ref().is_some_and(|c| c.trim().is_empty()) {
            return Err(AppError::ValidationError("Course city cannot be empty".to_string()));
        }
        match self.holes_count {
            Some(holes) => validate_layout(holes),
            None => Ok(()),
        }
    }
}

fn validate_layout(holes: i32) -> Result<(), AppError> {
    if !COURSE_LAYOUTS.contains(&holes) {
        return Err(AppError::ValidationError(format!(
            "A course has 9, 18, 27 or 36 holes, got {}",
            holes
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseSearchQuery {
    pub q: Option<String>,
}
