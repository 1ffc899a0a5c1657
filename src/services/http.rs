//! HTTP-backed services
//!
//! Thin forwarding to the backend contract under the configured base URL.
//! Failures surface as `ServiceError`; nothing is retried.

use super::{observed, RolePlayService, ServiceResult, SolutionService, TokenMapService};
use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::models::{
    ExportFormat, ExportedFile, GenerateTokenMapRequest, RecommendRequest, RefineRequest,
    RespondRequest, RolePlaySession, RolePlayTurn, Solution, SolutionVersion, StartSessionRequest,
    TokenMapData, TokenMapPatch,
};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Shared connection to the backend
pub struct HttpClient {
    http: Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl HttpClient {
    pub fn new(config: &ServiceConfig) -> ServiceResult<Self> {
        let raw = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ServiceError::Unsupported("no backend address configured".to_string()))?;

        let base_url = Url::parse(raw)
            .map_err(|e| ServiceError::RequestFailed(format!("invalid base url {}: {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::RequestFailed(format!("invalid base url {}", raw)));
        }

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ServiceError::from_transport)?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Base URL with `segments` appended, each percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%method, %url, "Calling backend");

        let mut req = self.http.request(method, url);
        if let Some(api_key) = &self.api_key {
            req = req.bearer_auth(api_key.expose_secret());
        }
        req
    }

    async fn send(&self, req: RequestBuilder) -> ServiceResult<Response> {
        let response = req.send().await.map_err(ServiceError::from_transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if status == StatusCode::NOT_FOUND {
            Err(ServiceError::NotFound(body))
        } else {
            Err(ServiceError::Upstream {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn json<T: DeserializeOwned>(&self, req: RequestBuilder) -> ServiceResult<T> {
        self.send(req)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> ServiceResult<T> {
        self.json(self.request(Method::GET, segments)).await
    }

    pub async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> ServiceResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.json(self.request(Method::POST, segments).json(body)).await
    }

    /// POST without a request body
    pub async fn post_empty<T: DeserializeOwned>(&self, segments: &[&str]) -> ServiceResult<T> {
        self.json(self.request(Method::POST, segments)).await
    }

    pub async fn put_json<B, T>(&self, segments: &[&str], body: &B) -> ServiceResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.json(self.request(Method::PUT, segments).json(body)).await
    }

    /// GET a binary payload; returns the reported content type with the bytes
    pub async fn get_bytes(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> ServiceResult<(Option<String>, Bytes)> {
        let response = self
            .send(self.request(Method::GET, segments).query(query))
            .await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await.map_err(ServiceError::from_transport)?;
        Ok((content_type, bytes))
    }
}

pub struct HttpTokenMapService {
    client: Arc<HttpClient>,
}

impl HttpTokenMapService {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenMapService for HttpTokenMapService {
    async fn generate(&self, request: GenerateTokenMapRequest) -> ServiceResult<TokenMapData> {
        observed(
            "token_map",
            "generate",
            self.client.post_json(&["token-map", "generate"], &request),
        )
        .await
    }

    async fn get(&self, id: &str) -> ServiceResult<TokenMapData> {
        observed("token_map", "get", self.client.get_json(&["token-map", id])).await
    }

    async fn update(&self, id: &str, patch: TokenMapPatch) -> ServiceResult<TokenMapData> {
        observed(
            "token_map",
            "update",
            self.client.put_json(&["token-map", id], &patch),
        )
        .await
    }

    async fn list_by_customer(&self, customer_id: &str) -> ServiceResult<Vec<TokenMapData>> {
        observed(
            "token_map",
            "list_by_customer",
            self.client.get_json(&["token-map", "customer", customer_id]),
        )
        .await
    }

    async fn export(&self, id: &str, format: ExportFormat) -> ServiceResult<ExportedFile> {
        let (content_type, bytes) = observed(
            "token_map",
            "export",
            self.client
                .get_bytes(&["token-map", id, "export"], &[("format", format.as_str())]),
        )
        .await?;

        Ok(ExportedFile {
            format,
            content_type: content_type.unwrap_or_else(|| format.content_type().to_string()),
            bytes,
        })
    }
}

pub struct HttpSolutionService {
    client: Arc<HttpClient>,
}

impl HttpSolutionService {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SolutionService for HttpSolutionService {
    async fn recommend(&self, request: RecommendRequest) -> ServiceResult<Solution> {
        observed(
            "solution",
            "recommend",
            self.client.post_json(&["solution", "recommend"], &request),
        )
        .await
    }

    async fn get(&self, id: &str) -> ServiceResult<Solution> {
        observed("solution", "get", self.client.get_json(&["solution", id])).await
    }

    async fn refine(&self, id: &str, feedback: &str) -> ServiceResult<Solution> {
        let body = RefineRequest {
            feedback: feedback.to_string(),
        };
        observed(
            "solution",
            "refine",
            self.client.post_json(&["solution", id, "refine"], &body),
        )
        .await
    }

    async fn history(&self, id: &str) -> ServiceResult<Vec<SolutionVersion>> {
        observed(
            "solution",
            "history",
            self.client.get_json(&["solution", id, "history"]),
        )
        .await
    }
}

pub struct HttpRolePlayService {
    client: Arc<HttpClient>,
}

impl HttpRolePlayService {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RolePlayService for HttpRolePlayService {
    async fn start(&self, request: StartSessionRequest) -> ServiceResult<RolePlaySession> {
        observed(
            "role_play",
            "start",
            self.client.post_json(&["role-play", "start"], &request),
        )
        .await
    }

    async fn respond(&self, session_id: &str, message: &str) -> ServiceResult<RolePlayTurn> {
        let body = RespondRequest {
            message: message.to_string(),
        };
        observed(
            "role_play",
            "respond",
            self.client
                .post_json(&["role-play", session_id, "respond"], &body),
        )
        .await
    }

    async fn end(&self, session_id: &str) -> ServiceResult<RolePlaySession> {
        observed(
            "role_play",
            "end",
            self.client.post_empty(&["role-play", session_id, "end"]),
        )
        .await
    }

    async fn get(&self, session_id: &str) -> ServiceResult<RolePlaySession> {
        observed(
            "role_play",
            "get",
            self.client.get_json(&["role-play", session_id]),
        )
        .await
    }

    async fn list(&self) -> ServiceResult<Vec<RolePlaySession>> {
        observed(
            "role_play",
            "list",
            self.client.get_json(&["role-play", "sessions"]),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HttpClient {
        HttpClient::new(&ServiceConfig {
            base_url: Some(base_url.to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let client = client("http://localhost:8000/api/v1");
        assert_eq!(
            client.endpoint(&["token-map", "map-1", "export"]).as_str(),
            "http://localhost:8000/api/v1/token-map/map-1/export"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let client = client("http://localhost:8000/api/v1/");
        assert_eq!(
            client.endpoint(&["role-play", "sessions"]).as_str(),
            "http://localhost:8000/api/v1/role-play/sessions"
        );
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let client = client("http://localhost:8000/api/v1");
        assert_eq!(
            client.endpoint(&["solution", "a/b c"]).as_str(),
            "http://localhost:8000/api/v1/solution/a%2Fb%20c"
        );
    }

    #[test]
    fn test_missing_backend_is_rejected() {
        let result = HttpClient::new(&ServiceConfig::default());
        assert!(matches!(result, Err(ServiceError::Unsupported(_))));

        let result = HttpClient::new(&ServiceConfig {
            base_url: Some("not a url".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(ServiceError::RequestFailed(_))));
    }
}
