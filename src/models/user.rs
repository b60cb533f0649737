use serde::{Deserialize, Serialize};
use surrealdb::{sql::Thing, Datetime};
use strum_macros::{Display, EnumString};

#[derive(Debug, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, Clone, Copy)]
pub enum Role {
    #[strum(serialize = "user")]
    #[serde(rename = "user")]
    User,
    #[strum(serialize = "admin")]
    #[serde(rename = "admin")]
    Admin,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub created_at: Datetime,
    /// Stamped on password change. Not yet compared against token issue
    /// time, so tokens issued before a change stay valid until expiry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_changed_at: Option<Datetime>,
}

/// Outward-facing view of a user. The password hash never leaves the server.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserPublic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: Datetime,
}

impl From<UserRecord> for UserPublic {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}
