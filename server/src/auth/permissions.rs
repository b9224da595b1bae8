use crate::models::profile::{AdminPermission, Profile};
use crate::utils::{AppError, AppResult};

/// Admin gate: super admins hold every permission, other admins only the
/// ones listed in `profiles.admin_permissions`.
pub fn has_permission(profile: &Profile, permission: AdminPermission) -> bool {
    if !profile.is_admin {
        return false;
    }
    profile.is_super_admin() || profile.permissions().contains(&permission)
}

pub fn require_permission(profile: &Profile, permission: AdminPermission) -> AppResult<()> {
    if !profile.is_admin {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    if has_permission(profile, permission) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Missing permission '{}'",
            permission
        )))
    }
}

pub fn require_super_admin(profile: &Profile) -> AppResult<()> {
    if profile.is_super_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Super admin access required".to_string()))
    }
}

pub fn require_pro(profile: &Profile) -> AppResult<()> {
    if profile.is_pro() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only validated pros can do this".to_string(),
        ))
    }
}

/// Guards suspend/delete/demote actions taken by `actor` against `target`.
pub fn ensure_can_act_on(actor: &Profile, target: &Profile) -> AppResult<()> {
    if actor.id == target.id {
        return Err(AppError::Forbidden(
            "You cannot perform this action on your own account".to_string(),
        ));
    }
    if target.is_super_admin() && !actor.is_super_admin() {
        return Err(AppError::Forbidden(
            "Only a super admin can manage another super admin".to_string(),
        ));
    }
    Ok(())
}
