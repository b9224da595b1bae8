use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::permissions::require_permission;
use crate::models::pro_request::{
    ProValidationRequest, ReviewDecision, SubmitProRequest, ValidationStatus,
};
use crate::models::profile::{AdminPermission, Profile};
use crate::repositories::{ProRequestRepo, ProfileRepo};
use crate::utils::error::is_unique_violation;
use crate::utils::{AppError, AppResult};

/// Amateur → pro applications and their review by staff.
#[derive(Debug, Clone)]
pub struct ProValidationService {
    pool: PgPool,
    requests: ProRequestRepo,
}

impl ProValidationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            requests: ProRequestRepo::new(pool.clone()),
            pool,
        }
    }

    pub async fn submit(
        &self,
        applicant: &Profile,
        request: &SubmitProRequest,
    ) -> AppResult<ProValidationRequest> {
        request.validate()?;
        if applicant.is_pro() {
            return Err(AppError::Conflict("You are already a pro".to_string()));
        }
        if let Some(latest) = self.requests.latest_for_user(applicant.id).await? {
            if latest.status == ValidationStatus::Pending {
                return Err(AppError::Conflict(
                    "An application is already awaiting review".to_string(),
                ));
            }
        }

        let created = match self.requests.create(applicant.id, request).await {
            Ok(created) => created,
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::Conflict(
                    "An application is already awaiting review".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        info!(request_id = %created.id, user_id = %applicant.id, "Pro application submitted");
        Ok(created)
    }

    pub async fn latest_for(&self, applicant: &Profile) -> AppResult<Option<ProValidationRequest>> {
        Ok(self.requests.latest_for_user(applicant.id).await?)
    }

    pub async fn list(
        &self,
        reviewer: &Profile,
        status: Option<ValidationStatus>,
    ) -> AppResult<Vec<ProValidationRequest>> {
        require_permission(reviewer, AdminPermission::ManageAdminUsers)?;
        Ok(self.requests.list(status).await?)
    }

    /// Decides a pending application. Approval promotes the applicant in
    /// the same transaction; decided applications stay decided.
    pub async fn review(
        &self,
        reviewer: &Profile,
        request_id: Uuid,
        decision: ReviewDecision,
    ) -> AppResult<ProValidationRequest> {
        require_permission(reviewer, AdminPermission::ManageAdminUsers)?;

        let mut tx = self.pool.begin().await?;
        let decided = ProRequestRepo::decide(&mut tx, request_id, reviewer.id, &decision).await?;
        let decided = match decided {
            Some(decided) => decided,
            None => {
                return match self.requests.get_by_id(request_id).await? {
                    Some(_) => Err(AppError::Conflict(
                        "This application has already been reviewed".to_string(),
                    )),
                    None => Err(AppError::NotFound("Application not found".to_string())),
                };
            }
        };

        if decision == ReviewDecision::Approve {
            ProfileRepo::promote_to_pro(&mut tx, decided.user_id).await?;
        }
        tx.commit().await?;

        info!(
            request_id = %request_id,
            reviewer_id = %reviewer.id,
            status = ?decided.status,
            "Pro application reviewed"
        );
        Ok(decided)
    }
}
