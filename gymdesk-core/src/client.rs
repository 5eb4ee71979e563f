//! Session-aware HTTP client for the gymdesk backend.
//!
//! Every request goes through [`ApiClient::execute`]: credentials are
//! attached, a 401 triggers one single-flight refresh followed by exactly
//! one replay, and the response is classified into a [`Reply`] or an
//! [`ApiError`]. A 401 on the replay is final.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{AuthScheme, GymdeskConfig};
use crate::error::{ApiError, ApiResult};
use crate::session::AuthSession;
use crate::store::FileStore;

/// A successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// 204 No Content, or an empty 2xx body.
    Empty,
    Body(Vec<u8>),
}

impl Reply {
    /// Decode the body as `T`. An empty reply is a decode error.
    pub fn json<T: DeserializeOwned>(self) -> ApiResult<T> {
        match self {
            Reply::Empty => Err(ApiError::Decode("expected a JSON body, got none".into())),
            Reply::Body(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
            }
        }
    }

    /// Accept any successful reply, discarding the body.
    pub fn ack(self) {}

    pub fn is_empty(&self) -> bool {
        matches!(self, Reply::Empty)
    }
}

/// One request, kept around so it can be replayed after a refresh.
struct Prepared {
    method: Method,
    url: url::Url,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    refresh_on_unauthorized: bool,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: url::Url,
    session: Arc<AuthSession>,
}

impl ApiClient {
    pub fn new(config: &GymdeskConfig, session: AuthSession) -> ApiResult<Self> {
        let base_url = url::Url::parse(&config.api_url)
            .map_err(|e| ApiError::Config(format!("Invalid api_url '{}': {}", config.api_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "api_url '{}' cannot be used as a base URL",
                config.api_url
            )));
        }

        let mut builder = reqwest::Client::builder().timeout(config.timeout());
        if session.scheme() == AuthScheme::Cookie {
            session.restore_cookies(&base_url)?;
            builder = builder.cookie_provider(session.cookie_jar());
        }
        let http = builder.build()?;

        Ok(ApiClient {
            http,
            base_url,
            session: Arc::new(session),
        })
    }

    /// Client with credentials persisted to the configured session file.
    pub fn from_config(config: &GymdeskConfig) -> ApiResult<Self> {
        let store = FileStore::new(config.session_path()?);
        Self::new(config, AuthSession::new(config.auth_scheme, Arc::new(store)))
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// `segments` are percent-encoded individually, so ids never escape
    /// their path position.
    pub fn endpoint<I, S>(&self, segments: I) -> url::Url
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request with the refresh-and-replay-once policy.
    pub async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: url::Url,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> ApiResult<Reply> {
        let prepared = Prepared {
            method,
            url,
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.map(encode_body).transpose()?,
            refresh_on_unauthorized: true,
        };
        self.run(prepared).await
    }

    /// Send a request that must never enter the refresh branch
    /// (login, register, logout).
    pub(crate) async fn execute_unauthenticated<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: url::Url,
        body: Option<&B>,
    ) -> ApiResult<Reply> {
        let prepared = Prepared {
            method,
            url,
            query: Vec::new(),
            body: body.map(encode_body).transpose()?,
            refresh_on_unauthorized: false,
        };
        self.run(prepared).await
    }

    async fn run(&self, request: Prepared) -> ApiResult<Reply> {
        let generation = self.session.generation();
        let response = self.send_once(&request).await?;

        if response.status() == StatusCode::UNAUTHORIZED && request.refresh_on_unauthorized {
            debug!(url = %request.url, "401, refreshing session before replay");
            self.session
                .refresh(&self.http, &self.base_url, generation)
                .await?;

            let replay = self.send_once(&request).await?;
            return classify(replay).await;
        }

        classify(response).await
    }

    async fn send_once(&self, request: &Prepared) -> ApiResult<reqwest::Response> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = self
            .http
            .request(request.method.clone(), request.url.clone());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let builder = self.session.authorize(builder)?;
        Ok(builder.send().await?)
    }

    // Convenience wrappers used by the resource modules.

    pub async fn get_json<T: DeserializeOwned>(&self, url: url::Url) -> ApiResult<T> {
        self.execute::<()>(Method::GET, url, &[], None).await?.json()
    }

    pub async fn get_json_query<T: DeserializeOwned>(
        &self,
        url: url::Url,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        self.execute::<()>(Method::GET, url, query, None).await?.json()
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: url::Url,
        body: &B,
    ) -> ApiResult<T> {
        self.execute(Method::POST, url, &[], Some(body)).await?.json()
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: url::Url,
        body: &B,
    ) -> ApiResult<T> {
        self.execute(Method::PUT, url, &[], Some(body)).await?.json()
    }

    pub async fn delete(&self, url: url::Url) -> ApiResult<()> {
        self.execute::<()>(Method::DELETE, url, &[], None)
            .await
            .map(Reply::ack)
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> ApiResult<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| ApiError::Invalid(format!("Unserializable request body: {}", e)))
}

/// 204 -> Empty without touching the body; other 2xx -> Body;
/// everything else -> ApiError::Server.
async fn classify(response: reqwest::Response) -> ApiResult<Reply> {
    let status = response.status();

    if status == StatusCode::NO_CONTENT {
        return Ok(Reply::Empty);
    }

    let body = response.bytes().await?;

    if status.is_success() {
        if body.is_empty() {
            return Ok(Reply::Empty);
        }
        return Ok(Reply::Body(body.to_vec()));
    }

    Err(ApiError::from_response_body(status.as_u16(), &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> ApiClient {
        let config = GymdeskConfig {
            api_url: api_url.to_string(),
            ..GymdeskConfig::default()
        };
        ApiClient::new(&config, AuthSession::in_memory(AuthScheme::Bearer)).unwrap()
    }

    #[test]
    fn endpoint_encodes_each_segment() {
        let c = client("http://localhost:8080");
        assert_eq!(
            c.endpoint(["api", "members", "a b/c"]).as_str(),
            "http://localhost:8080/api/members/a%20b%2Fc"
        );
    }

    #[test]
    fn endpoint_respects_base_path() {
        let c = client("https://crm.example.com/v1/");
        assert_eq!(
            c.endpoint(["api", "classes"]).as_str(),
            "https://crm.example.com/v1/api/classes"
        );
    }

    #[test]
    fn empty_reply_is_not_json() {
        assert!(matches!(
            Reply::Empty.json::<serde_json::Value>(),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn body_reply_decodes() {
        let reply = Reply::Body(br#"{"message": "ok"}"#.to_vec());
        let v: serde_json::Value = reply.json().unwrap();
        assert_eq!(v["message"], "ok");
    }

    #[test]
    fn rejects_non_base_urls() {
        let config = GymdeskConfig {
            api_url: "mailto:admin@example.com".to_string(),
            ..GymdeskConfig::default()
        };
        assert!(matches!(
            ApiClient::new(&config, AuthSession::in_memory(AuthScheme::Bearer)),
            Err(ApiError::Config(_))
        ));
    }
}
