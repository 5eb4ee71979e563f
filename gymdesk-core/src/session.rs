//! Authentication session: credential storage plus single-flight refresh.
//!
//! One `AuthSession` per account. It is handed to an [`ApiClient`](crate::client::ApiClient)
//! instead of living in module scope, so several independent sessions can
//! coexist in one process (and in one test binary).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use reqwest::RequestBuilder;
use reqwest::cookie::{CookieStore, Jar};
use tracing::{debug, warn};

use crate::config::AuthScheme;
use crate::error::{ApiError, ApiResult};
use crate::models::{AuthResponse, RefreshRequest, RefreshResponse, User};
use crate::single_flight::SingleFlight;
use crate::store::{CredentialStore, MemoryStore, StoredCredentials};

/// Called once when the session can no longer be refreshed.
/// This is where a UI sends the user back to the login screen.
pub type ExpiryHook = Box<dyn Fn() + Send + Sync>;

pub struct AuthSession {
    scheme: AuthScheme,
    store: Arc<dyn CredentialStore>,
    /// Shared with the HTTP client under the cookie scheme.
    jar: Arc<Jar>,
    refresh_gate: SingleFlight<Result<(), String>>,
    /// Bumped on every login and successful refresh.
    generation: AtomicU64,
    /// Set when a refresh failed; cleared by the next login.
    expired: AtomicBool,
    on_expired: Option<ExpiryHook>,
}

impl AuthSession {
    pub fn new(scheme: AuthScheme, store: Arc<dyn CredentialStore>) -> Self {
        AuthSession {
            scheme,
            store,
            jar: Arc::new(Jar::default()),
            refresh_gate: SingleFlight::new(),
            generation: AtomicU64::new(0),
            expired: AtomicBool::new(false),
            on_expired: None,
        }
    }

    /// Session backed by an in-memory store.
    pub fn in_memory(scheme: AuthScheme) -> Self {
        Self::new(scheme, Arc::new(MemoryStore::new()))
    }

    pub fn on_session_expired(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_expired = Some(Box::new(hook));
        self
    }

    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::SeqCst)
    }

    /// Number of refresh exchanges actually started.
    pub fn refresh_count(&self) -> u64 {
        self.refresh_gate.flights()
    }

    pub fn credentials(&self) -> ApiResult<StoredCredentials> {
        self.store.load()
    }

    /// The user cached at login, if any.
    pub fn cached_user(&self) -> ApiResult<Option<User>> {
        Ok(self.store.load()?.user)
    }

    pub fn is_authenticated(&self) -> ApiResult<bool> {
        let creds = self.store.load()?;
        Ok(match self.scheme {
            AuthScheme::Bearer => creds.access_token.is_some(),
            AuthScheme::Cookie => creds.user.is_some(),
        })
    }

    /// Attach credentials to an outgoing request.
    ///
    /// The cookie scheme relies on the client's cookie jar, so nothing is
    /// added here.
    pub(crate) fn authorize(&self, builder: RequestBuilder) -> ApiResult<RequestBuilder> {
        match self.scheme {
            AuthScheme::Cookie => Ok(builder),
            AuthScheme::Bearer => match self.store.load()?.access_token {
                Some(token) => Ok(builder.bearer_auth(token)),
                None => Ok(builder),
            },
        }
    }

    pub(crate) fn cookie_jar(&self) -> Arc<Jar> {
        self.jar.clone()
    }

    /// Put the persisted session cookies back into the jar, so a new
    /// process continues the session a previous one logged in.
    pub(crate) fn restore_cookies(&self, base_url: &url::Url) -> ApiResult<()> {
        if self.scheme != AuthScheme::Cookie {
            return Ok(());
        }
        for pair in self.store.load()?.cookies {
            self.jar.add_cookie_str(&format!("{}; Path=/", pair), base_url);
        }
        Ok(())
    }

    /// Persist the cookies the server set on login or refresh.
    pub(crate) fn save_cookies(&self, base_url: &url::Url) -> ApiResult<()> {
        if self.scheme != AuthScheme::Cookie {
            return Ok(());
        }
        let mut credentials = self.store.load()?;
        credentials.cookies = self.cookie_pairs(base_url);
        self.store.save(&credentials)
    }

    /// Cookies sent to the API root and to the refresh endpoint, by name.
    fn cookie_pairs(&self, base_url: &url::Url) -> Vec<String> {
        let mut pairs: Vec<String> = Vec::new();
        for url in [base_url.clone(), refresh_url(base_url)] {
            let Some(header) = self.jar.cookies(&url) else {
                continue;
            };
            let Ok(header) = header.to_str() else {
                continue;
            };
            for pair in header.split("; ") {
                let name = pair.split('=').next().unwrap_or(pair);
                if !pairs.iter().any(|p| p.split('=').next() == Some(name)) {
                    pairs.push(pair.to_string());
                }
            }
        }
        pairs
    }

    /// Persist the credentials returned by login/register.
    pub fn establish(&self, response: &AuthResponse) -> ApiResult<()> {
        let credentials = StoredCredentials {
            access_token: response.bearer_token().map(str::to_string),
            refresh_token: response.refresh_token.clone(),
            user: Some(response.user.clone()),
            cookies: Vec::new(),
        };
        self.store.save(&credentials)?;

        self.expired.store(false, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Forget everything without notifying the expiry hook (explicit logout).
    pub fn clear(&self) -> ApiResult<()> {
        self.expired.store(true, Ordering::SeqCst);
        self.store.clear()
    }

    /// Refresh after a 401.
    ///
    /// `seen_generation` is the generation the failing request was sent
    /// with. If it has moved on, another caller already refreshed and the
    /// request can simply be replayed.
    pub(crate) async fn refresh(
        &self,
        http: &reqwest::Client,
        base_url: &url::Url,
        seen_generation: u64,
    ) -> ApiResult<()> {
        loop {
            if self.is_expired() {
                return Err(ApiError::SessionExpired);
            }
            if self.generation() != seen_generation {
                debug!("session already refreshed by another request");
                return Ok(());
            }

            match self
                .refresh_gate
                .run(|| self.lead_refresh(http, base_url, seen_generation))
                .await
            {
                Ok(Ok(())) => return Ok(()),
                Ok(Err(_)) => return Err(ApiError::SessionExpired),
                // The leader was cancelled; try again, possibly as leader.
                Err(_) => continue,
            }
        }
    }

    async fn lead_refresh(
        &self,
        http: &reqwest::Client,
        base_url: &url::Url,
        seen_generation: u64,
    ) -> Result<(), String> {
        // A flight may have landed between the caller's check and this one.
        if self.is_expired() {
            return Err(ApiError::SessionExpired.to_string());
        }
        if self.generation() != seen_generation {
            return Ok(());
        }

        debug!(scheme = ?self.scheme, "refreshing session");

        match self.exchange(http, base_url).await {
            Ok(()) => {
                self.generation.fetch_add(1, Ordering::SeqCst);
                debug!("session refreshed");
                Ok(())
            }
            Err(e) => {
                warn!("session refresh failed: {}", e);
                self.expire();
                Err(e.to_string())
            }
        }
    }

    async fn exchange(&self, http: &reqwest::Client, base_url: &url::Url) -> ApiResult<()> {
        let url = refresh_url(base_url);

        match self.scheme {
            AuthScheme::Cookie => {
                let response = http.post(url).send().await?;
                if !response.status().is_success() {
                    let status = response.status().as_u16();
                    let body = response.bytes().await.unwrap_or_default();
                    return Err(ApiError::from_response_body(status, &body));
                }
                self.save_cookies(base_url)
            }
            AuthScheme::Bearer => {
                let mut credentials = self.store.load()?;
                let refresh_token = credentials
                    .refresh_token
                    .clone()
                    .ok_or_else(|| ApiError::Invalid("No refresh token".into()))?;

                let response = http
                    .post(url)
                    .json(&RefreshRequest {
                        refresh_token: &refresh_token,
                    })
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status().as_u16();
                    let body = response.bytes().await.unwrap_or_default();
                    return Err(ApiError::from_response_body(status, &body));
                }

                let body = response.bytes().await?;
                let refreshed: RefreshResponse = serde_json::from_slice(&body)
                    .map_err(|e| ApiError::Decode(format!("refresh response: {}", e)))?;

                credentials.access_token = Some(refreshed.access_token);
                if let Some(rotated) = refreshed.refresh_token {
                    credentials.refresh_token = Some(rotated);
                }
                self.store.save(&credentials)
            }
        }
    }

    /// Full logout after a failed refresh. The hook fires at most once
    /// until the next login.
    fn expire(&self) {
        if let Err(e) = self.store.clear() {
            warn!("failed to clear stored credentials: {}", e);
        }

        if !self.expired.swap(true, Ordering::SeqCst) {
            if let Some(hook) = &self.on_expired {
                hook();
            }
        }
    }
}

fn refresh_url(base_url: &url::Url) -> url::Url {
    let mut url = base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(["auth", "refresh"]);
    }
    url
}
