use sqlx::{PgConnection, PgPool, Result as SqlxResult};
use uuid::Uuid;

use crate::models::pro_request::{
    ProValidationRequest, ReviewDecision, SubmitProRequest, ValidationStatus,
};

const REQUEST_COLUMNS: &str = "id, user_id, id_document_path, certification_path, \
     experience_years, message, status, admin_notes, reviewed_by, reviewed_at, created_at, \
     updated_at";

#[derive(Debug, Clone)]
pub struct ProRequestRepo {
    pool: PgPool,
}

impl ProRequestRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        data: &SubmitProRequest,
    ) -> SqlxResult<ProValidationRequest> {
        let sql = format!(
            "INSERT INTO pro_validation_requests
                (user_id, id_document_path, certification_path, experience_years, message)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, ProValidationRequest>(&sql)
            .bind(user_id)
            .bind(data.id_document_path.trim())
            .bind(data.certification_path.as_deref())
            .bind(data.experience_years)
            .bind(data.message.as_deref())
            .fetch_one(&self.pool)
            .await
    }

    pub async fn get_by_id(&self, id: Uuid) -> SqlxResult<Option<ProValidationRequest>> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM pro_validation_requests WHERE id = $1");
        sqlx::query_as::<_, ProValidationRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn latest_for_user(&self, user_id: Uuid) -> SqlxResult<Option<ProValidationRequest>> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM pro_validation_requests
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, ProValidationRequest>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list(
        &self,
        status: Option<ValidationStatus>,
    ) -> SqlxResult<Vec<ProValidationRequest>> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM pro_validation_requests
             WHERE ($1::validation_status IS NULL OR status = $1)
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, ProValidationRequest>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await
    }

    /// Records a decision on a still-pending request. `None` means the
    /// request does not exist or was already decided.
    pub async fn decide(
        conn: &mut PgConnection,
        id: Uuid,
        reviewer: Uuid,
        decision: &ReviewDecision,
    ) -> SqlxResult<Option<ProValidationRequest>> {
        let sql = format!(
            "UPDATE pro_validation_requests
             SET status = $2, admin_notes = $3, reviewed_by = $4,
                 reviewed_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, ProValidationRequest>(&sql)
            .bind(id)
            .bind(decision.status())
            .bind(decision.notes())
            .bind(reviewer)
            .fetch_optional(conn)
            .await
    }
}
