//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ROLE_ADMIN, ROLE_CLIENT, ROLE_DRIVER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Client,
    Driver,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Roles a user may pick for themselves at registration
    pub fn is_self_registrable(&self) -> bool {
        !self.is_admin()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Client => ROLE_CLIENT,
            UserRole::Driver => ROLE_DRIVER,
            UserRole::Admin => ROLE_ADMIN,
        }
    }
}

/// Unknown stored values fall back to the least privileged role.
impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            ROLE_CLIENT => UserRole::Client,
            _ => UserRole::Driver,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    /// Company name (clients only)
    pub name: Option<String>,
    pub email: Option<String>,
    pub activity_type: Option<String>,
    /// Registration number value of the bound UNP row
    pub unp: Option<String>,
    pub verified: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration input, as received from the transport layer
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
    pub role: UserRole,
    pub name: Option<String>,
    pub email: Option<String>,
    pub activity_type: Option<String>,
    pub unp: Option<String>,
}

/// Fully validated user record ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub name: Option<String>,
    pub email: Option<String>,
    pub activity_type: Option<String>,
    pub unp_id: Option<i64>,
    pub verified: bool,
    pub created_by: String,
}

/// Partial profile update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub activity_type: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "acme1")]
    pub username: String,
    #[schema(example = "CLIENT")]
    pub role: UserRole,
    /// Company name
    #[schema(example = "ACME Logistics")]
    pub name: Option<String>,
    #[schema(example = "office@acme.example")]
    pub email: Option<String>,
    #[schema(example = "Freight forwarding")]
    pub activity_type: Option<String>,
    #[schema(example = "123456789")]
    pub unp: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            name: user.name,
            email: user.email,
            activity_type: user.activity_type,
            unp: user.unp,
            verified: user.verified,
            created_at: user.created_at,
        }
    }
}
