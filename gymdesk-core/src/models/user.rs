use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_helpers::null_as_empty;
use super::{Validate, require_non_empty};
use crate::error::{ApiError, ApiResult};
use crate::resource::Entity;

/// A dashboard user (staff account).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    /// admin, club_manager, all_services, restaurant, office, classes
    #[serde(default)]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub assigned_club_ids: Vec<String>,
    #[serde(default)]
    pub active: bool,
    /// Only sent when creating a user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// `name` is deprecated on the backend; fall back to first/last.
    pub fn display_name(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "user";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Validate for User {
    fn validate(&self) -> ApiResult<()> {
        require_non_empty("Email", &self.email)?;
        if !self.email.contains('@') {
            return Err(ApiError::Invalid(format!("Invalid email '{}'", self.email)));
        }
        Ok(())
    }
}

/// `POST /api/me/change-password`
#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> ApiResult<()> {
        require_non_empty("Current password", &self.current_password)?;
        if self.new_password.len() < 8 {
            return Err(ApiError::Invalid(
                "New password must be at least 8 characters".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, first: &str, last: &str) -> User {
        User {
            id: Some("u1".into()),
            email: "x@example.com".into(),
            name: name.into(),
            first_name: first.into(),
            last_name: last.into(),
            role: "admin".into(),
            assigned_club_ids: Vec::new(),
            active: true,
            password: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn display_name_prefers_legacy_name() {
        assert_eq!(user("Legacy", "A", "B").display_name(), "Legacy");
        assert_eq!(user("", "Ada", "Lovelace").display_name(), "Ada Lovelace");
        assert_eq!(user("", "", "").display_name(), "x@example.com");
    }

    #[test]
    fn password_is_never_echoed_when_absent() {
        let json = serde_json::to_value(user("n", "", "")).unwrap();
        assert!(json.get("password").is_none());
    }
}
