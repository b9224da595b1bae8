use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::search::Searchable;
use crate::utils::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Amateur,
    Pro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "admin_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    Admin,
}

/// Back-office capabilities stored in `profiles.admin_permissions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminPermission {
    ManageAdminUsers,
    ManageUsers,
    ManageBookings,
    ManageCourses,
    ManageContent,
}

impl AdminPermission {
    pub const ALL: [AdminPermission; 5] = [
        AdminPermission::ManageAdminUsers,
        AdminPermission::ManageUsers,
        AdminPermission::ManageBookings,
        AdminPermission::ManageCourses,
        AdminPermission::ManageContent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminPermission::ManageAdminUsers => "manage_admin_users",
            AdminPermission::ManageUsers => "manage_users",
            AdminPermission::ManageBookings => "manage_bookings",
            AdminPermission::ManageCourses => "manage_courses",
            AdminPermission::ManageContent => "manage_content",
        }
    }
}

impl fmt::Display for AdminPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminPermission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdminPermission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AppError::ValidationError(format!("Unknown admin permission '{}'", s)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub avatar_path: Option<String>,
    pub user_type: UserType,
    pub is_admin: bool,
    pub admin_role: Option<AdminRole>,
    pub admin_permissions: Vec<String>,
    pub suspended_at: Option<DateTime<Utc>>,
    pub suspended_by: Option<Uuid>,
    pub suspension_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn is_suspended(&self) -> bool {
        self.suspended_at.is_some()
    }

    pub fn is_pro(&self) -> bool {
        self.user_type == UserType::Pro
    }

    pub fn is_super_admin(&self) -> bool {
        self.is_admin && self.admin_role == Some(AdminRole::SuperAdmin)
    }

    /// Permissions granted to this profile. Unknown strings are ignored.
    pub fn permissions(&self) -> Vec<AdminPermission> {
        self.admin_permissions
            .iter()
            .filter_map(|p| match p.parse() {
                Ok(permission) => Some(permission),
                Err(_) => {
                    tracing::warn!(
                        profile_id = %self.id,
                        permission = %p,
                        "Ignoring unknown admin permission"
                    );
                    None
                }
            })
            .collect()
    }
}

impl Searchable for Profile {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            Some(self.email.as_str()),
            self.city.as_deref(),
        ]
    }
}

/// What other users may see of a pro.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub avatar_path: Option<String>,
    pub user_type: UserType,
}

impl From<Profile> for PublicProfile {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            city: profile.city,
            bio: profile.bio,
            avatar_path: profile.avatar_path,
            user_type: profile.user_type,
        }
    }
}

const MAX_NAME_LEN: usize = 100;
const MAX_BIO_LEN: usize = 2000;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub avatar_path: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [("first_name", &self.first_name), ("last_name", &self.last_name)] {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(AppError::ValidationError(format!("{} cannot be empty", field)));
                }
                if value.chars().count() > MAX_NAME_LEN {
                    return Err(AppError::ValidationError(format!("{} is too long", field)));
                }
            }
        }
        if let Some(phone) = &self.phone {
            let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
            if !(6..=15).contains(&digits) {
                return Err(AppError::ValidationError("Invalid phone number".to_string()));
            }
        }
        if self.bio.as_ref().is_some_and(|b| b.chars().count() > MAX_BIO_LEN) {
            return Err(AppError::ValidationError("bio is too long".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileSearchQuery {
    pub q: Option<String>,
    pub user_type: Option<UserType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrantAdminRequest {
    pub profile_id: Uuid,
    pub role: AdminRole,
    #[serde(default)]
    pub permissions: Vec<AdminPermission>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePermissionsRequest {
    pub role: Option<AdminRole>,
    pub permissions: Vec<AdminPermission>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuspendRequest {
    pub reason: String,
}

impl SuspendRequest {
    pub fn validated_reason(&self) -> Result<&str, AppError> {
        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err(AppError::ValidationError(
                "A suspension reason is required".to_string(),
            ));
        }
        Ok(reason)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_permission_round_trip_through_str() {
        for permission in AdminPermission::ALL {
            assert_eq!(permission.as_str().parse::<AdminPermission>().unwrap(), permission);
        }
        assert!("manage_everything".parse::<AdminPermission>().is_err());
    }

    #[test]
    fn test_unknown_permissions_are_ignored() {
        let mut admin = admin(AdminRole::Admin, &[AdminPermission::ManageBookings]);
        admin.admin_permissions.push("legacy_flag".to_string());
        assert_eq!(admin.permissions(), vec![AdminPermission::ManageBookings]);
    }

    #[test]
    fn test_super_admin_requires_admin_flag() {
        let mut profile = admin(AdminRole::SuperAdmin, &[]);
        assert!(profile.is_super_admin());
        profile.is_admin = false;
        assert!(!profile.is_super_admin());
    }

    #[test]
    fn test_update_profile_validation() {
        let ok = UpdateProfileRequest {
            phone: Some("+33 6 12 34 56 78".to_string()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let blank = UpdateProfileRequest {
            first_name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());

        let bad_phone = UpdateProfileRequest {
            phone: Some("12".to_string()),
            ..Default::default()
        };
        assert!(bad_phone.validate().is_err());
    }

    #[test]
    fn test_suspension_reason_required() {
        let request = SuspendRequest {
            reason: " \n".to_string(),
        };
        assert!(request.validated_reason().is_err());
        let request = SuspendRequest {
            reason: " spam ".to_string(),
        };
        assert_eq!(request.validated_reason().unwrap(), "spam");
    }
}
