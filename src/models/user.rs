use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub diet_type: String,
    pub allergies: Vec<String>,
    pub favorite_categories: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            diet_type: "omnivore".to_string(),
            allergies: Vec::new(),
            favorite_categories: Vec::new(),
        }
    }
}

/// User record as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Drop the password before the record leaves the auth layer
    pub fn into_session_user(self) -> SessionUser {
        SessionUser {
            id: self.id,
            email: self.email,
            name: self.name,
            role: self.role,
            preferences: self.preferences,
            last_login: self.last_login,
            created_at: self.created_at,
            is_active: self.is_active,
        }
    }
}

/// The signed-in user, as persisted in the session. Never carries a password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
