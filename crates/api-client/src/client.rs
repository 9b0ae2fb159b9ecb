//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{AuthApi, PlantCareApi, PlantsApi};
use crate::error::{ApiError, ApiResult};
use crate::operation::{extract_detail, Operation};
use crate::session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Bearer value sent when no token is stored and the client is not strict
const MISSING_TOKEN: &str = "null";

/// Plantsitter API client
///
/// Cheap to clone: the HTTP connection pool, configuration and session are
/// shared between clones. Every operation performs a single request and
/// reports failures through [`ApiError`]; there is no retry layer.
#[derive(Clone)]
pub struct PlantsitterClient {
    inner: Client,
    config: Arc<ClientConfig>,
    session: Session,
}

impl PlantsitterClient {
    /// Create a new client with configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration.
    ///
    /// The token lives in `config.session_file` when set, in memory otherwise.
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        let store: Arc<dyn TokenStore> = match config.session_file {
            Some(ref path) => Arc::new(FileTokenStore::new(path)),
            None => Arc::new(MemoryTokenStore::new()),
        };
        Self::with_store(config, store)
    }

    /// Create a client persisting its token in the given store
    pub fn with_store(config: ClientConfig, store: Arc<dyn TokenStore>) -> ApiResult<Self> {
        Self::with_session(config, Session::new(store))
    }

    /// Create a client sharing an existing session
    pub fn with_session(config: ClientConfig, session: Session) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!(
                "plantsitter-api-client/",
                env!("CARGO_PKG_VERSION")
            )),
        );

        let mut builder = Client::builder().default_headers(default_headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder.build().map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            session,
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.config.api_root()
    }

    /// Session holding the bearer token
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether a bearer token is stored
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Resolve a photo path returned by the backend into an absolute URL.
    ///
    /// Empty input yields an empty string and absolute URLs pass through.
    #[must_use]
    pub fn build_photo_url(&self, photo_path: Option<&str>) -> String {
        photo_url(self.config.api_root(), photo_path)
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access authentication endpoints
    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access plant endpoints
    #[must_use]
    pub fn plants(&self) -> PlantsApi {
        PlantsApi::new(self.clone())
    }

    /// Access plant-care endpoints
    #[must_use]
    pub fn plant_care(&self) -> PlantCareApi {
        PlantCareApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP plumbing
    // -------------------------------------------------------------------------

    /// Absolute URL for a backend path
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_root(), path.trim_start_matches('/'))
    }

    /// Build a request builder for a backend path
    pub fn request_builder(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner.request(method, self.url(path))
    }

    /// Attach the bearer token.
    ///
    /// Without a stored token the request still goes out carrying
    /// `Bearer null`, unless `require_token` is configured.
    pub(crate) fn authorize(&self, request: RequestBuilder) -> ApiResult<RequestBuilder> {
        match self.session.token() {
            Some(token) => Ok(request.bearer_auth(token)),
            None if self.config.require_token => Err(ApiError::NotAuthenticated),
            None => {
                warn!("No session token stored, sending request without credentials");
                Ok(request.header(AUTHORIZATION, format!("Bearer {MISSING_TOKEN}")))
            }
        }
    }

    /// Send a request and decode the JSON response
    #[instrument(skip(self, request), fields(request_id))]
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let start = Instant::now();
        let response = match request.header(X_REQUEST_ID, &request_id).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(
                    request_id = %request_id,
                    operation = %operation,
                    error = %e,
                    "Request failed before a response arrived"
                );
                return Err(ApiError::Request(e));
            }
        };

        let status = response.status();
        let body = response.bytes().await?;
        let elapsed = start.elapsed();

        if status.is_success() {
            debug!(
                request_id = %request_id,
                operation = %operation,
                status = status.as_u16(),
                elapsed_ms = elapsed.as_millis(),
                "Request succeeded"
            );
            return serde_json::from_slice(&body).map_err(ApiError::Json);
        }

        let message = match extract_detail(&body) {
            Ok(Some(detail)) => detail,
            Ok(None) => operation.fallback_message(self.config.locale).to_string(),
            // Unparseable error body: report the parse failure itself
            Err(e) => e.to_string(),
        };
        debug!(
            request_id = %request_id,
            operation = %operation,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis(),
            error = %message,
            "Backend rejected request"
        );
        Err(ApiError::api_response(status.as_u16(), message))
    }
}

/// Join a photo path onto an API root
fn photo_url(api_root: &str, photo_path: Option<&str>) -> String {
    match photo_path {
        None | Some("") => String::new(),
        Some(path) if path.starts_with("http") => path.to_string(),
        Some(path) => format!("{api_root}/{}", path.trim_start_matches('/')),
    }
}
