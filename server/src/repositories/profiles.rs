use chrono::Utc;
use sqlx::{PgConnection, PgPool, Result as SqlxResult};
use uuid::Uuid;

use crate::models::profile::{AdminPermission, AdminRole, Profile, UpdateProfileRequest, UserType};

const PROFILE_COLUMNS: &str = "id, email, first_name, last_name, phone, city, bio, avatar_path, \
     user_type, is_admin, admin_role, admin_permissions, suspended_at, suspended_by, \
     suspension_reason, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ProfileRepo {
    pool: PgPool,
}

impl ProfileRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> SqlxResult<Option<Profile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// All non-admin accounts, optionally narrowed to one user type.
    pub async fn list_users(&self, user_type: Option<UserType>) -> SqlxResult<Vec<Profile>> {
        let sql = format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles
             WHERE is_admin = FALSE AND ($1::user_type IS NULL OR user_type = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(user_type)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn list_admins(&self) -> SqlxResult<Vec<Profile>> {
        let sql = format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles
             WHERE is_admin = TRUE
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Profile>(&sql).fetch_all(&self.pool).await
    }

    /// Active pros, for the mobile directory.
    pub async fn list_pros(&self) -> SqlxResult<Vec<Profile>> {
        let sql = format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles
             WHERE user_type = 'pro' AND suspended_at IS NULL
             ORDER BY last_name, first_name"
        );
        sqlx::query_as::<_, Profile>(&sql).fetch_all(&self.pool).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        data: &UpdateProfileRequest,
    ) -> SqlxResult<Option<Profile>> {
        let sql = format!(
            "UPDATE profiles SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                city = COALESCE($5, city),
                bio = COALESCE($6, bio),
                avatar_path = COALESCE($7, avatar_path),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {PROFILE_COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .bind(data.first_name.as_deref().map(str::trim))
            .bind(data.last_name.as_deref().map(str::trim))
            .bind(data.phone.as_deref())
            .bind(data.city.as_deref())
            .bind(data.bio.as_deref())
            .bind(data.avatar_path.as_deref())
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn set_admin(
        &self,
        id: Uuid,
        role: AdminRole,
        permissions: &[AdminPermission],
    ) -> SqlxResult<Option<Profile>> {
        let permissions: Vec<String> = permissions.iter().map(|p| p.as_str().to_string()).collect();
        let sql = format!(
            "UPDATE profiles
             SET is_admin = TRUE, admin_role = $2, admin_permissions = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {PROFILE_COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .bind(role)
            .bind(permissions)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn suspend(&self, id: Uuid, by: Uuid, reason: &str) -> SqlxResult<Option<Profile>> {
        let sql = format!(
            "UPDATE profiles
             SET suspended_at = $2, suspended_by = $3, suspension_reason = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING {PROFILE_COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .bind(Utc::now())
            .bind(by)
            .bind(reason)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn reactivate(&self, id: Uuid) -> SqlxResult<Option<Profile>> {
        let sql = format!(
            "UPDATE profiles
             SET suspended_at = NULL, suspended_by = NULL, suspension_reason = NULL,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {PROFILE_COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Removes the profile; its bookings, slots and prices go with it.
    pub async fn delete(conn: &mut PgConnection, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn promote_to_pro(conn: &mut PgConnection, id: Uuid) -> SqlxResult<u64> {
        let result = sqlx::query(
            "UPDATE profiles SET user_type = 'pro', updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
