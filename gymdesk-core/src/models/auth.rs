//! Login, registration and token refresh payloads.

use serde::{Deserialize, Serialize};

use super::{User, Validate, require_non_empty};
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> ApiResult<()> {
        require_non_empty("Email", &self.email)?;
        require_non_empty("Password", &self.password)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> ApiResult<()> {
        require_non_empty("Name", &self.name)?;
        require_non_empty("Email", &self.email)?;
        if self.password.len() < 8 {
            return Err(ApiError::Invalid(
                "Password must be at least 8 characters".into(),
            ));
        }
        Ok(())
    }
}

/// Response of `/auth/login` and `/auth/register`.
///
/// The cookie-session backend answers with `token`, the token backend with
/// an `access_token`/`refresh_token` pair. Both shapes decode here.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthResponse {
    pub fn bearer_token(&self) -> Option<&str> {
        self.access_token.as_deref().or(self.token.as_deref())
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RefreshResponse {
    pub access_token: String,
    /// Present when the backend rotates refresh tokens.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Generic `{"message": "..."}` acknowledgement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_login_shapes_yield_a_bearer_token() {
        let web: AuthResponse = serde_json::from_str(
            r#"{"user": {"email": "a@b.c"}, "token": "t1", "message": "Login successful"}"#,
        )
        .unwrap();
        let mobile: AuthResponse = serde_json::from_str(
            r#"{"user": {"email": "a@b.c"}, "access_token": "t2", "refresh_token": "r2"}"#,
        )
        .unwrap();

        assert_eq!(web.bearer_token(), Some("t1"));
        assert_eq!(mobile.bearer_token(), Some("t2"));
        assert_eq!(mobile.refresh_token.as_deref(), Some("r2"));
    }

    #[test]
    fn short_password_is_rejected_on_register() {
        let req = RegisterRequest {
            email: "a@b.c".into(),
            password: "short".into(),
            name: "A".into(),
        };
        assert!(matches!(req.validate(), Err(ApiError::Invalid(_))));
    }
}
