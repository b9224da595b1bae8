use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::permissions::{ensure_can_act_on, require_permission};
use crate::models::profile::{AdminPermission, AdminRole, Profile, ProfileSearchQuery};
use crate::repositories::{AvailabilityRepo, BookingRepo, ProfileRepo};
use crate::utils::search::{filter_by_term, SearchTerm};
use crate::utils::{AppError, AppResult};

/// Which population an account-management call targets. Admin accounts
/// and end users are gated by different permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountScope {
    Admins,
    Users,
}

impl AccountScope {
    pub fn permission(&self) -> AdminPermission {
        match self {
            AccountScope::Admins => AdminPermission::ManageAdminUsers,
            AccountScope::Users => AdminPermission::ManageUsers,
        }
    }

    fn contains(&self, profile: &Profile) -> bool {
        match self {
            AccountScope::Admins => profile.is_admin,
            AccountScope::Users => !profile.is_admin,
        }
    }
}

/// Permissions stored for a grant: super admins carry none explicitly.
pub fn normalize_permissions(
    role: AdminRole,
    permissions: &[AdminPermission],
) -> Vec<AdminPermission> {
    if role == AdminRole::SuperAdmin {
        return Vec::new();
    }
    let mut normalized: Vec<AdminPermission> = Vec::with_capacity(permissions.len());
    for permission in permissions {
        if !normalized.contains(permission) {
            normalized.push(*permission);
        }
    }
    normalized
}

#[derive(Debug, Clone)]
pub struct AccountService {
    pool: PgPool,
    profiles: ProfileRepo,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            profiles: ProfileRepo::new(pool.clone()),
            pool,
        }
    }

    pub async fn list(
        &self,
        actor: &Profile,
        scope: AccountScope,
        query: &ProfileSearchQuery,
    ) -> AppResult<Vec<Profile>> {
        require_permission(actor, scope.permission())?;

        let rows = match scope {
            AccountScope::Admins => self.profiles.list_admins().await?,
            AccountScope::Users => self.profiles.list_users(query.user_type).await?,
        };
        Ok(filter_by_term(rows, &SearchTerm::new(query.q.as_deref())))
    }

    pub async fn grant_admin(
        &self,
        actor: &Profile,
        target_id: Uuid,
        role: AdminRole,
        permissions: &[AdminPermission],
    ) -> AppResult<Profile> {
        require_permission(actor, AdminPermission::ManageAdminUsers)?;
        if role == AdminRole::SuperAdmin && !actor.is_super_admin() {
            return Err(AppError::Forbidden(
                "Only a super admin can create another super admin".to_string(),
            ));
        }

        let target = self.target(target_id).await?;
        ensure_can_act_on(actor, &target)?;

        let permissions = normalize_permissions(role, permissions);
        let updated = self
            .profiles
            .set_admin(target.id, role, &permissions)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        info!(
            actor_id = %actor.id,
            target_id = %updated.id,
            role = ?role,
            permissions = ?permissions,
            "Admin rights granted"
        );
        Ok(updated)
    }

    pub async fn update_permissions(
        &self,
        actor: &Profile,
        target_id: Uuid,
        role: Option<AdminRole>,
        permissions: &[AdminPermission],
    ) -> AppResult<Profile> {
        let target = self.target(target_id).await?;
        if !target.is_admin {
            return Err(AppError::ValidationError(
                "This account is not an admin".to_string(),
            ));
        }
        let role = role
            .or(target.admin_role)
            .unwrap_or(AdminRole::Admin);
        self.grant_admin(actor, target.id, role, permissions).await
    }

    pub async fn suspend(
        &self,
        actor: &Profile,
        scope: AccountScope,
        target_id: Uuid,
        reason: &str,
    ) -> AppResult<Profile> {
        let target = self.scoped_target(actor, scope, target_id).await?;
        if target.is_suspended() {
            return Err(AppError::Conflict("Account is already suspended".to_string()));
        }

        let updated = self
            .profiles
            .suspend(target.id, actor.id, reason)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        info!(actor_id = %actor.id, target_id = %target.id, reason, "Account suspended");
        Ok(updated)
    }

    pub async fn reactivate(
        &self,
        actor: &Profile,
        scope: AccountScope,
        target_id: Uuid,
    ) -> AppResult<Profile> {
        let target = self.scoped_target(actor, scope, target_id).await?;
        if !target.is_suspended() {
            return Err(AppError::Conflict("Account is not suspended".to_string()));
        }

        let updated = self
            .profiles
            .reactivate(target.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        info!(actor_id = %actor.id, target_id = %target.id, "Account reactivated");
        Ok(updated)
    }

    /// Deletes the account. Places held by its live bookings are given back
    /// to their slots before the bookings cascade away.
    pub async fn delete(
        &self,
        actor: &Profile,
        scope: AccountScope,
        target_id: Uuid,
    ) -> AppResult<()> {
        let target = self.scoped_target(actor, scope, target_id).await?;

        let mut tx = self.pool.begin().await?;
        let bookings = BookingRepo::lock_holding_places(&mut tx, target.id).await?;
        for booking in &bookings {
            if let Some(slot_id) = booking.availability_id {
                AvailabilityRepo::release_places(&mut tx, slot_id, booking.number_of_players)
                    .await?;
            }
        }
        if !ProfileRepo::delete(&mut tx, target.id).await? {
            return Err(AppError::NotFound("Account not found".to_string()));
        }
        tx.commit().await?;

        info!(
            actor_id = %actor.id,
            target_id = %target.id,
            released_bookings = bookings.len(),
            "Account deleted"
        );
        Ok(())
    }

    async fn target(&self, id: Uuid) -> AppResult<Profile> {
        self.profiles
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))
    }

    async fn scoped_target(
        &self,
        actor: &Profile,
        scope: AccountScope,
        id: Uuid,
    ) -> AppResult<Profile> {
        require_permission(actor, scope.permission())?;
        let target = self.target(id).await?;
        if !scope.contains(&target) {
            return Err(AppError::NotFound("Account not found".to_string()));
        }
        ensure_can_act_on(actor, &target)?;
        Ok(target)
    }
}
