//! Authenticated API client.
//!
//! Every call goes through [`ApiClient::execute`]:
//!
//! 1. request stages run (default headers, request id)
//! 2. the stored access credential is attached
//! 3. the request is sent
//! 4. on 401, credentials are refreshed through the shared
//!    [`RefreshCoordinator`] and the request is replayed exactly once
//!
//! A second 401 on the replay is returned as
//! [`ApiError::AuthorizationFailure`]. A failed refresh is returned as
//! [`ApiError::AuthenticationExpired`] after the session has been invalidated.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::pipeline::{DefaultHeaders, Pipeline, RequestId, RequestStage};
use super::request::ApiRequest;
use crate::adapters::{FileCredentialStore, ReqwestHttpClient};
use crate::auth::authenticator::authenticate;
use crate::auth::credentials::{CredentialKind, CredentialPair};
use crate::auth::refresh::{RefreshCoordinator, RefreshPhase};
use crate::auth::session::{SessionEvent, SessionInvalidator};
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, NetworkError};
use crate::traits::{CredentialStore, HttpClient, Response};

/// Maximum number of response body characters kept in error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// HTTP client for the Realit backend.
///
/// Each client owns its own credential store handle, refresh coordinator and
/// session invalidator. Share one client behind an `Arc` to get single-flight
/// refresh across all callers.
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpClient>,
    store: Arc<dyn CredentialStore>,
    pipeline: Pipeline,
    coordinator: RefreshCoordinator,
    invalidator: Arc<SessionInvalidator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("pipeline", &self.pipeline)
            .field("coordinator", &self.coordinator)
            .finish()
    }
}

impl ApiClient {
    /// Create a client over explicit transport and store implementations.
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn HttpClient>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        let invalidator = Arc::new(SessionInvalidator::new(Arc::clone(&store)));
        let coordinator = RefreshCoordinator::new(
            Arc::clone(&transport),
            Arc::clone(&store),
            Arc::clone(&invalidator),
            config.refresh_url(),
        );
        let pipeline = Pipeline::new()
            .with_stage(DefaultHeaders::json(&config.user_agent))
            .with_stage(RequestId);

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            transport,
            store,
            pipeline,
            coordinator,
            invalidator,
        }
    }

    /// Create a client using reqwest and the credentials file.
    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        let transport = ReqwestHttpClient::with_timeout(config.timeout)
            .map_err(|err| NetworkError::from_http(&config.base_url, err))?;
        let store = match config.credentials_path {
            Some(ref path) => FileCredentialStore::with_path(path.clone()),
            None => FileCredentialStore::new()?,
        };
        Ok(Self::new(config, Arc::new(transport), Arc::new(store)))
    }

    /// Append a request stage. Stages run before authentication, in order.
    pub fn with_stage(mut self, stage: impl RequestStage + 'static) -> Self {
        self.pipeline = self.pipeline.with_stage(stage);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    pub fn invalidator(&self) -> &Arc<SessionInvalidator> {
        &self.invalidator
    }

    /// Subscribe to session events (sign-in, invalidation, sign-out).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.invalidator.subscribe()
    }

    /// Watch the refresh coordinator's phase.
    pub fn refresh_phase(&self) -> watch::Receiver<RefreshPhase> {
        self.coordinator.subscribe_phase()
    }

    /// Whether a complete credential pair is stored.
    pub async fn is_signed_in(&self) -> bool {
        self.store.load().await.is_some()
    }

    /// Store a freshly issued pair and re-arm session invalidation.
    pub async fn sign_in(&self, pair: &CredentialPair) -> ApiResult<()> {
        self.store.set(pair).await?;
        self.invalidator.signed_in();
        info!("Signed in; credentials stored");
        Ok(())
    }

    /// Clear credentials and notify subscribers.
    pub async fn sign_out(&self) {
        self.invalidator.logout().await;
    }

    /// Send a request, refreshing credentials and replaying once on 401.
    pub async fn execute(&self, request: ApiRequest) -> ApiResult<Response> {
        let mut request = self.pipeline.apply(request);
        let access = self.store.get(CredentialKind::Access).await;

        let response = self.send(&request, access.as_deref()).await?;
        if !response.is_unauthorized() || !request.refresh_on_unauthorized {
            return check_status(response);
        }

        if request.retried {
            return Err(self.unauthorized(&request));
        }

        debug!(
            "{} {} rejected with 401; refreshing credentials",
            request.method, request.path
        );
        let pair = self
            .coordinator
            .refresh()
            .await
            .map_err(|reason| ApiError::AuthenticationExpired { reason })?;

        request.mark_retried();
        let response = self.send(&request, Some(&pair.access)).await?;
        if response.is_unauthorized() {
            return Err(self.unauthorized(&request));
        }
        check_status(response)
    }

    /// Execute and decode a JSON response body.
    pub async fn execute_json<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let response = self.execute(request).await?;
        response
            .json()
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Execute and discard the response body.
    pub async fn execute_unit(&self, request: ApiRequest) -> ApiResult<()> {
        self.execute(request).await.map(|_| ())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute_json(ApiRequest::get(path)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute_json(ApiRequest::post(path).with_json(body)?)
            .await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute_json(ApiRequest::patch(path).with_json(body)?)
            .await
    }

    async fn send(&self, request: &ApiRequest, access: Option<&str>) -> ApiResult<Response> {
        let outgoing = authenticate(request.clone(), access).to_http(&self.base_url);
        debug!(
            retried = request.retried,
            "{} {}",
            outgoing.method,
            request.path_and_query()
        );

        self.transport
            .send(&outgoing)
            .await
            .map_err(|err| ApiError::Network(NetworkError::from_http(&outgoing.url, err)))
    }

    fn unauthorized(&self, request: &ApiRequest) -> ApiError {
        warn!(
            "{} {} still unauthorized after refresh",
            request.method, request.path
        );
        ApiError::AuthorizationFailure {
            method: request.method,
            path: request.path.clone(),
        }
    }
}

fn check_status(response: Response) -> ApiResult<Response> {
    if response.is_success() {
        return Ok(response);
    }
    Err(ApiError::Status {
        status: response.status,
        message: error_message(&response),
    })
}

/// Pull a readable message out of an error body.
///
/// The backend answers `{"message": "..."}` or `{"message": ["...", ...]}`
/// for validation errors; anything else is returned as truncated text.
fn error_message(response: &Response) -> String {
    if let Ok(value) = response.json::<serde_json::Value>() {
        match value.get("message") {
            Some(serde_json::Value::String(message)) => return message.clone(),
            Some(serde_json::Value::Array(messages)) => {
                let joined: Vec<&str> = messages.iter().filter_map(|m| m.as_str()).collect();
                if !joined.is_empty() {
                    return joined.join("; ");
                }
            }
            _ => {}
        }
    }

    let text = response
        .text()
        .unwrap_or_else(|_| "Unknown error".to_string());
    text.chars().take(ERROR_BODY_LIMIT).collect()
}
