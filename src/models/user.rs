//! User model and platform roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,
    Counselor,
    Admin,
    SuperAdmin,
}

impl UserRole {
    /// Database and wire spelling of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Student => "STUDENT",
            UserRole::Counselor => "COUNSELOR",
            UserRole::Admin => "ADMIN",
            UserRole::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// Parse a role claim from a token. Matching is case-insensitive, so
    /// `admin` and `ADMIN` name the same role.
    pub fn from_claim(claim: &str) -> Option<Self> {
        match claim.trim().to_ascii_uppercase().as_str() {
            "STUDENT" => Some(UserRole::Student),
            "COUNSELOR" => Some(UserRole::Counselor),
            "ADMIN" => Some(UserRole::Admin),
            "SUPER_ADMIN" => Some(UserRole::SuperAdmin),
            _ => None,
        }
    }

    /// Roles allowed into the admin dashboard.
    pub fn is_admin(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recently registered user as read for the activity feed.
#[derive(Debug, Clone, FromRow)]
pub struct RecentUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}
