//! Service façade
//!
//! One trait per resource family. `Services::from_config` picks the
//! fixture-backed or the HTTP-backed implementation set once at startup;
//! callers never branch on the mode themselves.

pub mod http;
pub mod mock;

pub use http::{HttpClient, HttpRolePlayService, HttpSolutionService, HttpTokenMapService};
pub use mock::{MockRolePlayService, MockSolutionService, MockTokenMapService};

use crate::config::{Config, MockConfig, ServiceConfig, ServiceMode};
use crate::error::ServiceError;
use crate::metrics::METRICS;
use crate::models::{
    ExportFormat, ExportedFile, GenerateTokenMapRequest, RecommendRequest, RolePlaySession,
    RolePlayTurn, Solution, SolutionVersion, StartSessionRequest, TokenMapData, TokenMapPatch,
};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Token map operations
#[async_trait]
pub trait TokenMapService: Send + Sync {
    async fn generate(&self, request: GenerateTokenMapRequest) -> ServiceResult<TokenMapData>;

    async fn get(&self, id: &str) -> ServiceResult<TokenMapData>;

    async fn update(&self, id: &str, patch: TokenMapPatch) -> ServiceResult<TokenMapData>;

    async fn list_by_customer(&self, customer_id: &str) -> ServiceResult<Vec<TokenMapData>>;

    async fn export(&self, id: &str, format: ExportFormat) -> ServiceResult<ExportedFile>;
}

/// Solution recommendation operations
#[async_trait]
pub trait SolutionService: Send + Sync {
    async fn recommend(&self, request: RecommendRequest) -> ServiceResult<Solution>;

    async fn get(&self, id: &str) -> ServiceResult<Solution>;

    /// Produce a new version of the solution from free-text feedback
    async fn refine(&self, id: &str, feedback: &str) -> ServiceResult<Solution>;

    async fn history(&self, id: &str) -> ServiceResult<Vec<SolutionVersion>>;
}

/// Role-play session operations
#[async_trait]
pub trait RolePlayService: Send + Sync {
    async fn start(&self, request: StartSessionRequest) -> ServiceResult<RolePlaySession>;

    /// Send one salesperson message; returns the customer's reply and the
    /// evaluation of the message
    async fn respond(&self, session_id: &str, message: &str) -> ServiceResult<RolePlayTurn>;

    async fn end(&self, session_id: &str) -> ServiceResult<RolePlaySession>;

    async fn get(&self, session_id: &str) -> ServiceResult<RolePlaySession>;

    async fn list(&self) -> ServiceResult<Vec<RolePlaySession>>;
}

/// The implementation set the application runs against
#[derive(Clone)]
pub struct Services {
    pub token_map: Arc<dyn TokenMapService>,
    pub solution: Arc<dyn SolutionService>,
    pub role_play: Arc<dyn RolePlayService>,
    mode: ServiceMode,
}

impl Services {
    /// Select the implementation set from the resolved service mode
    pub fn from_config(config: &Config) -> ServiceResult<Self> {
        let mode = config.service.mode();
        info!(?mode, "Initializing service façade");

        match mode {
            ServiceMode::Mock => Ok(Self::mock(config.mock.clone())),
            ServiceMode::Http => Self::http(&config.service),
        }
    }

    /// Fixture-backed services with the given simulated latency
    pub fn mock(latency: MockConfig) -> Self {
        let latency = Arc::new(latency);
        Self {
            token_map: Arc::new(MockTokenMapService::new(Arc::clone(&latency))),
            solution: Arc::new(MockSolutionService::new(Arc::clone(&latency))),
            role_play: Arc::new(MockRolePlayService::new(latency)),
            mode: ServiceMode::Mock,
        }
    }

    /// Services forwarding to the configured backend
    pub fn http(config: &ServiceConfig) -> ServiceResult<Self> {
        let client = Arc::new(HttpClient::new(config)?);
        Ok(Self {
            token_map: Arc::new(HttpTokenMapService::new(Arc::clone(&client))),
            solution: Arc::new(HttpSolutionService::new(Arc::clone(&client))),
            role_play: Arc::new(HttpRolePlayService::new(client)),
            mode: ServiceMode::Http,
        })
    }

    pub fn mode(&self) -> ServiceMode {
        self.mode
    }
}

/// Run a service call, recording its outcome and duration
pub(crate) async fn observed<T, F>(
    resource: &'static str,
    operation: &'static str,
    call: F,
) -> ServiceResult<T>
where
    F: Future<Output = ServiceResult<T>>,
{
    let start = Instant::now();
    let result = call.await;
    let elapsed = start.elapsed();

    METRICS.record_service_call(resource, operation, result.is_ok(), elapsed.as_secs_f64());

    match &result {
        Ok(_) => debug!(resource, operation, ?elapsed, "Service call completed"),
        Err(e) => warn!(resource, operation, ?elapsed, error = %e, "Service call failed"),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_defaults_to_mock() {
        let services = Services::from_config(&Config::default()).unwrap();
        assert_eq!(services.mode(), ServiceMode::Mock);
    }

    #[test]
    fn test_from_config_selects_http_when_backend_configured() {
        let mut config = Config::default();
        config.service.base_url = Some("http://localhost:9000/api/v1".to_string());

        let services = Services::from_config(&config).unwrap();
        assert_eq!(services.mode(), ServiceMode::Http);

        config.service.mock = true;
        let services = Services::from_config(&config).unwrap();
        assert_eq!(services.mode(), ServiceMode::Mock);
    }

    #[tokio::test]
    async fn test_observed_passes_result_through() {
        let ok = observed("test", "ok", async { Ok::<_, ServiceError>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = observed("test", "err", async {
            Err::<u8, _>(ServiceError::NotFound("x".to_string()))
        })
        .await;
        assert!(matches!(err, Err(ServiceError::NotFound(_))));
    }
}
