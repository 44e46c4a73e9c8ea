use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    error::ServerErrorBody,
    protocol::{
        ChatReply, ChatRequest, ExpertResult, InventoryRequest, InventoryResult,
        MarketingRequest, MarketingResult, RefineReply, RefineRequest, SearchRequest,
    },
};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

pub mod cancel;
pub mod error;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use error::{ClientError, ClientErrorKind};

/// Every call is aborted after this long unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Process,
    MarketingGenerate,
    MarketingRefine,
    InventoryAnalyze,
    Chat,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Process => "/process",
            Self::MarketingGenerate => "/marketing/generate",
            Self::MarketingRefine => "/marketing/refine",
            Self::InventoryAnalyze => "/inventory/analyze",
            Self::Chat => "/chat",
        }
    }

    fn relative_path(self) -> &'static str {
        self.as_str().trim_start_matches('/')
    }
}

/// Backend operations the page depends on.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    async fn search_experts(
        &self,
        request: &SearchRequest,
        cancel: &CancelSignal,
    ) -> Result<ExpertResult, ClientError>;

    async fn generate_marketing_plan(
        &self,
        request: &MarketingRequest,
        cancel: &CancelSignal,
    ) -> Result<MarketingResult, ClientError>;

    async fn refine_marketing_plan(
        &self,
        request: &RefineRequest,
        cancel: &CancelSignal,
    ) -> Result<RefineReply, ClientError>;

    async fn analyze_inventory(
        &self,
        request: &InventoryRequest,
        cancel: &CancelSignal,
    ) -> Result<InventoryResult, ClientError>;

    async fn chat(
        &self,
        request: &ChatRequest,
        cancel: &CancelSignal,
    ) -> Result<ChatReply, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized).map_err(|source| ClientError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            http: Client::new(),
            base_url,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn post(&self, endpoint: Endpoint) -> Result<RequestBuilder, ClientError> {
        let url = self
            .base_url
            .join(endpoint.relative_path())
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{}{}", self.base_url, endpoint.relative_path()),
                source,
            })?;
        Ok(self.http.post(url).header(ACCEPT, "application/json"))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
        cancel: &CancelSignal,
    ) -> Result<T, ClientError> {
        let endpoint = endpoint.as_str();
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        info!(%request_id, endpoint, "sending request");

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|source| classify_transport(endpoint, self.timeout, source))?;
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|source| classify_transport(endpoint, self.timeout, source))?;
            Ok::<_, ClientError>((status, body))
        };

        let mut cancel = cancel.clone();
        let (status, body) = tokio::select! {
            outcome = tokio::time::timeout(self.timeout, exchange) => match outcome {
                Ok(result) => result?,
                Err(_) => {
                    warn!(%request_id, endpoint, timeout_ms = self.timeout.as_millis() as u64, "request timed out");
                    return Err(ClientError::Timeout { endpoint, after: self.timeout });
                }
            },
            _ = cancel.cancelled() => {
                warn!(%request_id, endpoint, "request cancelled");
                return Err(ClientError::Cancelled { endpoint });
            }
        };

        if !status.is_success() {
            let server = serde_json::from_slice::<ServerErrorBody>(&body).ok();
            warn!(
                %request_id,
                endpoint,
                status = status.as_u16(),
                server_message = server.as_ref().and_then(|b| b.user_message()).unwrap_or(""),
                "request failed"
            );
            return Err(ClientError::Status {
                endpoint,
                status: status.as_u16(),
                reason: status.canonical_reason().map(str::to_string),
                body: server,
            });
        }

        let parsed =
            serde_json::from_slice(&body).map_err(|source| ClientError::Decode { endpoint, source })?;
        info!(
            %request_id,
            endpoint,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
        Ok(parsed)
    }
}

fn classify_transport(endpoint: &'static str, after: Duration, source: reqwest::Error) -> ClientError {
    if source.is_timeout() {
        ClientError::Timeout { endpoint, after }
    } else {
        ClientError::Network { endpoint, source }
    }
}

#[async_trait]
impl AssistantApi for ApiClient {
    async fn search_experts(
        &self,
        request: &SearchRequest,
        cancel: &CancelSignal,
    ) -> Result<ExpertResult, ClientError> {
        let builder = self.post(Endpoint::Process)?.form(request);
        self.execute(Endpoint::Process, builder, cancel).await
    }

    async fn generate_marketing_plan(
        &self,
        request: &MarketingRequest,
        cancel: &CancelSignal,
    ) -> Result<MarketingResult, ClientError> {
        let builder = self.post(Endpoint::MarketingGenerate)?.json(request);
        self.execute(Endpoint::MarketingGenerate, builder, cancel)
            .await
    }

    async fn refine_marketing_plan(
        &self,
        request: &RefineRequest,
        cancel: &CancelSignal,
    ) -> Result<RefineReply, ClientError> {
        let builder = self.post(Endpoint::MarketingRefine)?.json(request);
        self.execute(Endpoint::MarketingRefine, builder, cancel)
            .await
    }

    async fn analyze_inventory(
        &self,
        request: &InventoryRequest,
        cancel: &CancelSignal,
    ) -> Result<InventoryResult, ClientError> {
        let builder = self.post(Endpoint::InventoryAnalyze)?.json(request);
        self.execute(Endpoint::InventoryAnalyze, builder, cancel)
            .await
    }

    async fn chat(
        &self,
        request: &ChatRequest,
        cancel: &CancelSignal,
    ) -> Result<ChatReply, ClientError> {
        let builder = self.post(Endpoint::Chat)?.json(request);
        self.execute(Endpoint::Chat, builder, cancel).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
