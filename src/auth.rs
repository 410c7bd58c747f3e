//! Sign-in, registration and account maintenance against the backend's
//! `/users` collection.

use crate::backend::{fallback::USERS_PATH, BackendClient};
use crate::models::{Preferences, Role, SessionUser, User};
use crate::session::SessionContext;
use crate::{Error, Result};
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const TEMP_PASSWORD_LENGTH: usize = 8;

pub const CONNECTION_ERROR: &str = "Connection error. Please try again.";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MISSING_FIELDS: &str = "Please fill in all fields";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const TERMS_NOT_ACCEPTED: &str = "You must accept the terms and conditions";
pub const EMAIL_TAKEN: &str = "Email is already registered";
pub const EMAIL_NOT_FOUND: &str = "Email not found";
pub const WRONG_CURRENT_PASSWORD: &str = "Current password is incorrect";
pub const NOT_SIGNED_IN: &str = "User is not signed in";

/// Sign-up form contents
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub diet_type: Option<String>,
    #[serde(default)]
    pub accept_terms: bool,
}

impl Registration {
    /// Local checks that need no backend round-trip
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err(Error::Validation(MISSING_FIELDS.to_string()));
        }
        if self.password != self.confirm_password {
            return Err(Error::Validation(PASSWORD_MISMATCH.to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::Validation(PASSWORD_TOO_SHORT.to_string()));
        }
        if !self.accept_terms {
            return Err(Error::Validation(TERMS_NOT_ACCEPTED.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    fn from_score(score: u8) -> Self {
        match score {
            0..=2 => PasswordStrength::Weak,
            3..=4 => PasswordStrength::Medium,
            _ => PasswordStrength::Strong,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReport {
    pub is_valid: bool,
    pub min_length: bool,
    pub has_upper_case: bool,
    pub has_lower_case: bool,
    pub has_numbers: bool,
    pub strength: PasswordStrength,
}

/// Check a candidate password and grade its strength
pub fn validate_password(password: &str) -> PasswordReport {
    let length = password.chars().count();
    let has_upper_case = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower_case = password.chars().any(|c| c.is_ascii_lowercase());
    let has_numbers = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    let score = [
        length >= MIN_PASSWORD_LENGTH,
        length >= 8,
        has_upper_case,
        has_lower_case,
        has_numbers,
        has_symbol,
    ]
    .into_iter()
    .filter(|passed| *passed)
    .count() as u8;

    PasswordReport {
        is_valid: length >= MIN_PASSWORD_LENGTH,
        min_length: length >= MIN_PASSWORD_LENGTH,
        has_upper_case,
        has_lower_case,
        has_numbers,
        strength: PasswordStrength::from_score(score),
    }
}

/// Eight random lowercase letters and digits
pub fn generate_temp_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(|b| (b as char).to_ascii_lowercase())
        .take(TEMP_PASSWORD_LENGTH)
        .collect()
}

#[derive(Clone)]
pub struct AuthService {
    backend: BackendClient,
    session: SessionContext,
}

impl AuthService {
    pub fn new(backend: BackendClient, session: SessionContext) -> Self {
        Self { backend, session }
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.session.current_user()
    }

    async fn users(&self) -> Result<Vec<User>> {
        self.backend.get(USERS_PATH).await
    }

    /// Sign in with email and password.
    ///
    /// Returns `Ok(None)` for unknown credentials. The last-login update is
    /// best effort and never blocks the sign-in.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<SessionUser>> {
        debug!("Attempting login for: {}", email);

        let users = self.users().await.map_err(|e| {
            error!("Login error: {}", e.log_safe());
            Error::Unavailable(CONNECTION_ERROR.to_string())
        })?;

        let Some(user) = users
            .into_iter()
            .find(|u| u.email == email && u.password.as_deref() == Some(password))
        else {
            info!("Login failed: invalid credentials");
            return Ok(None);
        };

        let path = format!("{}/{}", USERS_PATH, user.id);
        let update = json!({ "lastLogin": Utc::now().to_rfc3339() });
        if self.backend.patch::<_, Value>(&path, &update).await.is_none() {
            warn!("Failed to update last login for user {}", user.id);
        }

        let session_user = user.into_session_user();
        self.session.set_current_user(&session_user)?;
        info!("Login successful for: {}", session_user.name);
        Ok(Some(session_user))
    }

    /// Create an account and sign it in
    pub async fn register(&self, registration: Registration) -> Result<SessionUser> {
        registration.validate()?;

        let users = self.users().await.map_err(|e| {
            error!("Register error: {}", e.log_safe());
            Error::Unavailable(CONNECTION_ERROR.to_string())
        })?;
        if users.iter().any(|u| u.email == registration.email) {
            return Err(Error::Validation(EMAIL_TAKEN.to_string()));
        }

        let now = Utc::now();
        let new_user = User {
            id: now.timestamp_millis(),
            email: registration.email,
            password: Some(registration.password),
            name: registration.name,
            role: Role::User,
            preferences: Preferences {
                diet_type: registration
                    .diet_type
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| Preferences::default().diet_type),
                ..Preferences::default()
            },
            last_login: Some(now),
            created_at: Some(now),
            is_active: true,
        };

        let saved: User = self.backend.post(USERS_PATH, &new_user).await?;
        let session_user = saved.into_session_user();
        self.session.set_current_user(&session_user)?;
        info!("Registered user {}", session_user.email);
        Ok(session_user)
    }

    pub fn logout(&self) -> Result<()> {
        self.session.clear_current_user()?;
        info!("Session closed");
        Ok(())
    }

    pub async fn change_password(&self, current: &str, new: &str) -> Result<()> {
        let session_user = self
            .session
            .current_user()
            .ok_or_else(|| Error::Unauthorized(NOT_SIGNED_IN.to_string()))?;

        if new.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::Validation(PASSWORD_TOO_SHORT.to_string()));
        }

        let users = self.users().await?;
        let matches = users
            .iter()
            .find(|u| u.id == session_user.id)
            .map(|u| u.password.as_deref() == Some(current))
            .unwrap_or(false);
        if !matches {
            return Err(Error::Validation(WRONG_CURRENT_PASSWORD.to_string()));
        }

        let path = format!("{}/{}", USERS_PATH, session_user.id);
        self.backend
            .patch::<_, Value>(&path, &json!({ "password": new }))
            .await
            .ok_or_else(|| Error::Unavailable(CONNECTION_ERROR.to_string()))?;
        info!("Password changed for user {}", session_user.id);
        Ok(())
    }

    /// Replace the password of `email` with a generated one and return it
    pub async fn reset_password(&self, email: &str) -> Result<String> {
        let users = self.users().await?;
        let user = users
            .iter()
            .find(|u| u.email == email)
            .ok_or_else(|| Error::NotFound(EMAIL_NOT_FOUND.to_string()))?;

        let temp_password = generate_temp_password();
        let path = format!("{}/{}", USERS_PATH, user.id);
        self.backend
            .patch::<_, Value>(&path, &json!({ "password": temp_password }))
            .await
            .ok_or_else(|| Error::Unavailable(CONNECTION_ERROR.to_string()))?;

        info!("Temporary password issued for user {}", user.id);
        Ok(temp_password)
    }

    /// Save preferences remotely and in the session; false when signed out
    /// or the backend rejects the update
    pub async fn update_preferences(&self, preferences: Preferences) -> bool {
        let Some(mut user) = self.session.current_user() else {
            return false;
        };

        let path = format!("{}/{}", USERS_PATH, user.id);
        let update = json!({ "preferences": preferences });
        if self.backend.patch::<_, Value>(&path, &update).await.is_none() {
            error!("Error updating preferences for user {}", user.id);
            return false;
        }

        user.preferences = preferences;
        match self.session.set_current_user(&user) {
            Ok(()) => true,
            Err(e) => {
                error!("Error saving preferences: {}", e.log_safe());
                false
            }
        }
    }
}
