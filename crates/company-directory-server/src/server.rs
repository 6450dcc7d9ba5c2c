// crates/company-directory-server/src/server.rs
// ============================================================================
// Module: Directory HTTP Server
// Description: axum router, request scoping, and response rendering.
// Purpose: Expose directory operations over REST with per-request sessions.
// Dependencies: axum, company-directory-{config, core, store-sqlite}, tokio
// ============================================================================

//! ## Overview
//! [`DirectoryServer`] owns the configured store and audit sink and serves
//! the directory routes:
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | GET | `/search?query=` | `search_by_name` |
//! | GET | `/tags?query=` | `search_by_tag` |
//! | GET | `/companies/{company_name}` | `get_by_name` |
//! | POST | `/companies` | `add_company` |
//! | PUT | `/companies/{company_name}/tags` | `append_tags` |
//! | DELETE | `/companies/{company_name}/tags/{tag_name}` | `delete_tag` |
//! | GET | `/health`, `/ready` | probes |
//!
//! Store work is synchronous, so each operation runs in a blocking section
//! on multi-threaded runtimes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path as FsPath;
use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use company_directory_config::DirectoryConfig;
use company_directory_config::StoreType;
use company_directory_core::CompanySummary;
use company_directory_core::CompanyView;
use company_directory_core::DirectoryError;
use company_directory_core::DirectorySession;
use company_directory_core::DirectoryStore;
use company_directory_core::InMemoryDirectoryStore;
use company_directory_core::LanguageCode;
use company_directory_core::run_in_session;
use company_directory_core::runtime::add_company;
use company_directory_core::runtime::append_tags;
use company_directory_core::runtime::delete_tag;
use company_directory_core::runtime::get_by_name;
use company_directory_core::runtime::search_by_name;
use company_directory_core::runtime::search_by_tag;
use company_directory_store_sqlite::SqliteDirectoryStore;
use serde::Serialize;
use tokio::net::TcpListener;

use crate::api::ApiError;
use crate::api::CompanyCreateRequest;
use crate::api::ErrorBody;
use crate::api::ProbeBody;
use crate::api::SearchParams;
use crate::api::parse_json;
use crate::api::parse_tag_list;
use crate::audit::DirectoryAuditEvent;
use crate::audit::DirectoryAuditEventParams;
use crate::audit::DirectoryAuditSink;
use crate::audit::FileAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::StderrAuditSink;

// ============================================================================
// SECTION: Directory Server
// ============================================================================

/// HTTP server instance for the company directory.
pub struct DirectoryServer {
    /// Server configuration.
    config: DirectoryConfig,
    /// Shared handler state.
    state: Arc<ServerState>,
}

impl DirectoryServer {
    /// Builds a server from configuration, opening the configured store and
    /// audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServerError`] when validation or initialization fails.
    pub fn from_config(config: DirectoryConfig) -> Result<Self, DirectoryServerError> {
        config.validate().map_err(|err| DirectoryServerError::Config(err.to_string()))?;
        let store = build_store(&config)?;
        let audit = build_audit_sink(&config)?;
        Self::with_parts(config, store, audit)
    }

    /// Builds a server from configuration with an explicit store and audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServerError::Config`] when the language header name
    /// is not a valid HTTP header name.
    pub fn with_parts(
        config: DirectoryConfig,
        store: Arc<dyn DirectoryStore>,
        audit: Arc<dyn DirectoryAuditSink>,
    ) -> Result<Self, DirectoryServerError> {
        let language_header = HeaderName::from_bytes(config.server.language_header.as_bytes())
            .map_err(|_| DirectoryServerError::Config("invalid language header".to_string()))?;
        let state = Arc::new(ServerState {
            store,
            audit,
            default_language: config.server.default_language,
            language_header,
            max_body_bytes: config.server.max_body_bytes,
        });
        Ok(Self {
            config,
            state,
        })
    }

    /// Returns the axum router for the directory routes.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/search", get(handle_search_by_name))
            .route("/tags", get(handle_search_by_tag))
            .route("/companies", post(handle_add_company))
            .route("/companies/{company_name}", get(handle_get_by_name))
            .route("/companies/{company_name}/tags", put(handle_append_tags))
            .route("/companies/{company_name}/tags/{tag_name}", delete(handle_delete_tag))
            .route("/health", get(handle_health))
            .route("/ready", get(handle_ready))
            .layer(DefaultBodyLimit::max(self.state.max_body_bytes))
            .with_state(Arc::clone(&self.state))
    }

    /// Binds the configured address and serves requests until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), DirectoryServerError> {
        let addr = self
            .config
            .server
            .bind_addr()
            .map_err(|err| DirectoryServerError::Config(err.to_string()))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|_| DirectoryServerError::Transport("http bind failed".to_string()))?;
        self.serve_listener(listener).await
    }

    /// Serves requests on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServerError::Transport`] when the server fails.
    pub async fn serve_listener(self, listener: TcpListener) -> Result<(), DirectoryServerError> {
        let app = self.router();
        axum::serve(listener, app)
            .await
            .map_err(|_| DirectoryServerError::Transport("http server failed".to_string()))
    }
}

/// Builds the directory store from configuration.
fn build_store(config: &DirectoryConfig) -> Result<Arc<dyn DirectoryStore>, DirectoryServerError> {
    let store: Arc<dyn DirectoryStore> = match config.store.store_type {
        StoreType::Memory => Arc::new(InMemoryDirectoryStore::new()),
        StoreType::Sqlite => {
            let sqlite_config = config.store.sqlite_config().ok_or_else(|| {
                DirectoryServerError::Config("sqlite store requires path".to_string())
            })?;
            let store = SqliteDirectoryStore::new(&sqlite_config)
                .map_err(|err| DirectoryServerError::Init(err.to_string()))?;
            Arc::new(store)
        }
    };
    Ok(store)
}

/// Builds the audit sink from configuration.
fn build_audit_sink(
    config: &DirectoryConfig,
) -> Result<Arc<dyn DirectoryAuditSink>, DirectoryServerError> {
    let audit = &config.server.audit;
    if !audit.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &audit.path {
        Some(path) => {
            let sink = FileAuditSink::new(FsPath::new(path.trim()))
                .map_err(|err| DirectoryServerError::Init(format!("audit log: {err}")))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

// ============================================================================
// SECTION: Handler State
// ============================================================================

/// Shared state for HTTP handlers.
struct ServerState {
    /// Directory store opened once per process.
    store: Arc<dyn DirectoryStore>,
    /// Audit sink receiving one event per request.
    audit: Arc<dyn DirectoryAuditSink>,
    /// Language used when the request names none.
    default_language: LanguageCode,
    /// Header carrying the request language.
    language_header: HeaderName,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
}

impl ServerState {
    /// Resolves the request language from headers.
    fn request_language(&self, headers: &HeaderMap) -> Result<LanguageCode, ApiError> {
        let Some(value) = headers.get(&self.language_header) else {
            return Ok(self.default_language);
        };
        let text = value.to_str().map_err(|_| {
            ApiError::LanguageInvalid(String::from_utf8_lossy(value.as_bytes()).into_owned())
        })?;
        LanguageCode::parse(text).ok_or_else(|| ApiError::LanguageInvalid(text.to_string()))
    }

    /// Checks an extracted body against the configured limit.
    fn checked_body(&self, body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
        let bytes = body.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::BodyTooLarge(self.max_body_bytes)
            } else {
                ApiError::BodyInvalid(rejection.body_text())
            }
        })?;
        if bytes.len() > self.max_body_bytes {
            return Err(ApiError::BodyTooLarge(self.max_body_bytes));
        }
        Ok(bytes)
    }

    /// Unwraps an extracted query string, keeping rejections in the
    /// directory error format.
    fn checked_query(
        query: Result<Query<SearchParams>, QueryRejection>,
    ) -> Result<String, ApiError> {
        let Query(params) =
            query.map_err(|rejection| ApiError::QueryInvalid(rejection.body_text()))?;
        params.required()
    }

    /// Runs one directory operation inside one store session.
    fn execute<T, F>(&self, operation: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut dyn DirectorySession) -> Result<T, DirectoryError>,
    {
        let store = self.store.as_ref();
        run_blocking(|| run_in_session(store, operation)).map_err(ApiError::from)
    }

    /// Renders a handler result and records its audit event.
    fn respond<T: Serialize>(
        &self,
        operation: &'static str,
        language: LanguageCode,
        started: Instant,
        result: Result<T, ApiError>,
    ) -> Response {
        let (status, error_kind, response) = match result {
            Ok(value) => (StatusCode::OK, None, (StatusCode::OK, Json(value)).into_response()),
            Err(error) => {
                let status = error.status();
                let body = ErrorBody {
                    detail: error.localized_message(language),
                };
                (status, Some(error.kind()), (status, Json(body)).into_response())
            }
        };
        self.audit.record(&DirectoryAuditEvent::new(DirectoryAuditEventParams {
            operation,
            language,
            status: status.as_u16(),
            error_kind,
            latency_ms: started.elapsed().as_millis(),
        }));
        response
    }
}

/// Runs synchronous store work, shifting to a blocking context when available.
fn run_blocking<T>(work: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(work)
        }
        _ => work(),
    }
}

/// Splits a language resolution result into the rendering language and the
/// request outcome so far.
fn language_or_default(
    state: &ServerState,
    headers: &HeaderMap,
) -> (LanguageCode, Result<LanguageCode, ApiError>) {
    let resolved = state.request_language(headers);
    let language = resolved.as_ref().map_or(state.default_language, |language| *language);
    (language, resolved)
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles `GET /search`.
async fn handle_search_by_name(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Response {
    let started = Instant::now();
    let (language, resolved) = language_or_default(&state, &headers);
    let result = resolved.and_then(|language| {
        let query = ServerState::checked_query(query)?;
        state.execute(|session| search_by_name(session, &query, language))
    });
    state.respond::<Vec<CompanySummary>>("search_by_name", language, started, result)
}

/// Handles `GET /tags`.
async fn handle_search_by_tag(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Response {
    let started = Instant::now();
    let (language, resolved) = language_or_default(&state, &headers);
    let result = resolved.and_then(|language| {
        let query = ServerState::checked_query(query)?;
        state.execute(|session| search_by_tag(session, &query, language))
    });
    state.respond::<Vec<CompanySummary>>("search_by_tag", language, started, result)
}

/// Handles `GET /companies/{company_name}`.
async fn handle_get_by_name(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Path(company_name): Path<String>,
) -> Response {
    let started = Instant::now();
    let (language, resolved) = language_or_default(&state, &headers);
    let result = resolved.and_then(|language| {
        state.execute(|session| get_by_name(session, &company_name, language))
    });
    state.respond::<CompanyView>("get_by_name", language, started, result)
}

/// Handles `POST /companies`.
async fn handle_add_company(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let started = Instant::now();
    let (language, resolved) = language_or_default(&state, &headers);
    let result = resolved.and_then(|language| {
        let bytes = state.checked_body(body)?;
        let request: CompanyCreateRequest = parse_json(&bytes)?;
        let company = request.into_new_company()?;
        state.execute(|session| add_company(session, &company, language))
    });
    state.respond::<CompanyView>("add_company", language, started, result)
}

/// Handles `PUT /companies/{company_name}/tags`.
async fn handle_append_tags(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Path(company_name): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let started = Instant::now();
    let (language, resolved) = language_or_default(&state, &headers);
    let result = resolved.and_then(|language| {
        let bytes = state.checked_body(body)?;
        let tags = parse_tag_list(&bytes)?;
        state.execute(|session| append_tags(session, &company_name, &tags, language))
    });
    state.respond::<CompanyView>("append_tags", language, started, result)
}

/// Handles `DELETE /companies/{company_name}/tags/{tag_name}`.
async fn handle_delete_tag(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Path((company_name, tag_name)): Path<(String, String)>,
) -> Response {
    let started = Instant::now();
    let (language, resolved) = language_or_default(&state, &headers);
    let result = resolved.and_then(|language| {
        state.execute(|session| delete_tag(session, &company_name, &tag_name, language))
    });
    state.respond::<CompanyView>("delete_tag", language, started, result)
}

/// Handles `GET /health`.
async fn handle_health() -> Response {
    (
        StatusCode::OK,
        Json(ProbeBody {
            status: "ok".to_string(),
        }),
    )
        .into_response()
}

/// Handles `GET /ready`.
async fn handle_ready(State(state): State<Arc<ServerState>>) -> Response {
    let store = state.store.as_ref();
    match run_blocking(|| store.readiness()) {
        Ok(()) => (
            StatusCode::OK,
            Json(ProbeBody {
                status: "ready".to_string(),
            }),
        )
            .into_response(),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ProbeBody {
                status: "unavailable".to_string(),
            }),
        )
            .into_response(),
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Directory server errors.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
