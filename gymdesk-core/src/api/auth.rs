use reqwest::Method;
use tracing::warn;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, User, Validate,
};

impl ApiClient {
    /// `POST /auth/login`. Stores the returned credentials in the session.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let response: AuthResponse = self
            .execute_unauthenticated(Method::POST, self.endpoint(["auth", "login"]), Some(&request))
            .await?
            .json()?;

        self.session().establish(&response)?;
        self.session().save_cookies(self.base_url())?;
        Ok(response)
    }

    /// `POST /auth/register`. Stores the returned credentials in the session.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        request.validate()?;

        let response: AuthResponse = self
            .execute_unauthenticated(Method::POST, self.endpoint(["auth", "register"]), Some(request))
            .await?
            .json()?;

        self.session().establish(&response)?;
        self.session().save_cookies(self.base_url())?;
        Ok(response)
    }

    /// `POST /auth/logout`, best effort. Local credentials are cleared
    /// whatever the server says.
    pub async fn logout(&self) -> ApiResult<()> {
        let result = self
            .execute_unauthenticated::<()>(Method::POST, self.endpoint(["auth", "logout"]), None)
            .await;

        if let Err(e) = result {
            warn!("logout request failed: {}", e);
        }

        self.session().clear()
    }

    /// `GET /api/me`
    pub async fn me(&self) -> ApiResult<User> {
        self.get_json(self.endpoint(["api", "me"])).await
    }

    /// `POST /api/me/change-password`
    pub async fn change_password(&self, current: &str, new: &str) -> ApiResult<()> {
        let request = ChangePasswordRequest {
            current_password: current.to_string(),
            new_password: new.to_string(),
        };
        request.validate()?;

        self.execute(
            Method::POST,
            self.endpoint(["api", "me", "change-password"]),
            &[],
            Some(&request),
        )
        .await
        .map(|reply| reply.ack())
    }

    /// `GET /health`, unauthenticated.
    pub async fn health(&self) -> bool {
        self.execute_unauthenticated::<()>(Method::GET, self.endpoint(["health"]), None)
            .await
            .is_ok()
    }
}
