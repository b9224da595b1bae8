use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "validation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Pending,
    Approved,
    Rejected,
}

/// An amateur's application to be listed as a pro.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProValidationRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub id_document_path: String,
    pub certification_path: Option<String>,
    pub experience_years: Option<i32>,
    pub message: Option<String>,
    pub status: ValidationStatus,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitProRequest {
    pub id_document_path: String,
    pub certification_path: Option<String>,
    pub experience_years: Option<i32>,
    pub message: Option<String>,
}

impl SubmitProRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.id_document_path.trim().is_empty() {
            return Err(AppError::ValidationError(
                "An identity document is required".to_string(),
            ));
        }
        if self.experience_years.is_some_and(|y| !(0..=80).contains(&y)) {
            return Err(AppError::ValidationError(
                "experience_years is out of range".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProRequestFilter {
    pub status: Option<ValidationStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RejectProRequest {
    #[serde(default)]
    pub notes: String,
}

/// The outcome an admin records on a pending application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject { notes: String },
}

impl ReviewDecision {
    /// Rejections must explain themselves to the applicant.
    pub fn reject(notes: &str) -> Result<Self, AppError> {
        let notes = notes.trim();
        if notes.is_empty() {
            return Err(AppError::ValidationError(
                "Rejection notes are required".to_string(),
            ));
        }
        Ok(ReviewDecision::Reject {
            notes: notes.to_string(),
        })
    }

    pub fn status(&self) -> ValidationStatus {
        match self {
            ReviewDecision::Approve => ValidationStatus::Approved,
            ReviewDecision::Reject { .. } => ValidationStatus::Rejected,
        }
    }

    pub fn notes(&self) -> Option<&str> {
        match self {
            ReviewDecision::Approve => None,
            ReviewDecision::Reject { notes } => Some(notes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_requires_notes() {
        assert!(ReviewDecision::reject("").is_err());
        assert!(ReviewDecision::reject("   \t").is_err());

        let decision = ReviewDecision::reject("  Carte professionnelle illisible ").unwrap();
        assert_eq!(decision.status(), ValidationStatus::Rejected);
        assert_eq!(decision.notes(), Some("Carte professionnelle illisible"));
    }

    #[test]
    fn test_approve_has_no_notes() {
        assert_eq!(ReviewDecision::Approve.status(), ValidationStatus::Approved);
        assert_eq!(ReviewDecision::Approve.notes(), None);
    }

    #[test]
    fn test_submission_validation() {
        let request = SubmitProRequest {
            id_document_path: "documents/abc/id.pdf".to_string(),
            certification_path: None,
            experience_years: Some(12),
            message: None,
        };
        assert!(request.validate().is_ok());

        let missing = SubmitProRequest {
            id_document_path: " ".to_string(),
            ..request.clone()
        };
        assert!(missing.validate().is_err());

        let implausible = SubmitProRequest {
            experience_years: Some(-1),
            ..request
        };
        assert!(implausible.validate().is_err());
    }
}
