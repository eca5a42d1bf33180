//! HTTP server.
//!
//! Exposes document upload, placeholder chat, and the two listings as a JSON
//! API under `/api`, and serves the pre-built web client from
//! `[server].static_dir` at every other path.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/health` | Health check |
//! | `POST` | `/api/upload` | Upload a `.txt` file (multipart part `file`) |
//! | `POST` | `/api/chat` | Ask an agent; replies are placeholders |
//! | `GET`  | `/api/documents` | Uploaded documents, in upload order |
//! | `GET`  | `/api/chat/history` | Every chat message, in call order |
//! | `GET`  | `/*` | Static files, `index.html` for directories |
//!
//! # Error Contract
//!
//! Errors carry a human-readable `detail` string:
//!
//! ```json
//! { "detail": "Only .txt files are supported" }
//! ```
//!
//! Client errors are `400` (`413` when a body exceeds its limit:
//! `upload.max_bytes` for uploads, axum's default for everything else);
//! anything unexpected is a `500` with a generic detail.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted. The request origin is
//! echoed back so credentialed browser requests work too.

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection, rejection::BytesRejection, DefaultBodyLimit, Multipart,
        State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::agents::{AgentContext, AgentKind, AgentRegistry, DOCUMENT_SEARCH_TAG};
use crate::config::{Config, ServerConfig};
use crate::models::{ChatMessage, DocumentSummary};
use crate::store::{InMemoryStore, Store};
use crate::upload::{prepare_document, UploadError};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<dyn Store>,
    agents: Arc<AgentRegistry>,
}

impl AppState {
    /// State backed by a fresh [`InMemoryStore`] and the built-in agents.
    pub fn new(config: Config) -> Self {
        Self::with_parts(
            config,
            Arc::new(InMemoryStore::new()),
            AgentRegistry::with_builtins(),
        )
    }

    pub fn with_parts(config: Config, store: Arc<dyn Store>, agents: AgentRegistry) -> Self {
        Self {
            config: Arc::new(config),
            store,
            agents: Arc::new(agents),
        }
    }
}

/// Starts the HTTP server.
///
/// Binds to `[server].host:[server].port` and serves until Ctrl-C, letting
/// in-flight requests finish. All stored documents and history are dropped
/// on return.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind_addr();

    if !config.server.static_dir.is_dir() {
        warn!(
            "Static directory {} does not exist; only /api routes will answer",
            config.server.static_dir.display()
        );
    }

    let state = AppState::new(config.clone());
    for agent in state.agents.agents() {
        debug!(agent = agent.kind().tag(), "Registered agent: {}", agent.description());
    }
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {}", bind_addr))?;

    info!("DocuChat listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("DocuChat stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested, draining connections"),
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// Builds the full application router: API routes, static files, and layers.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::very_permissive();

    // Applies to uploads only; other routes keep axum's default limit.
    let upload_limit = match state.config.upload.max_bytes {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    let api = Router::new()
        .route("/health", get(handle_health))
        .route("/upload", post(handle_upload).layer(upload_limit))
        .route("/chat", post(handle_chat))
        .route("/documents", get(handle_list_documents))
        .route("/chat/history", get(handle_chat_history));

    let router = Router::new().nest("/api", api);
    let router = with_static_files(router, &state.config.server);

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Mounts the static directory as the fallback for every non-API path.
fn with_static_files(router: Router<AppState>, server: &ServerConfig) -> Router<AppState> {
    let dir = &server.static_dir;
    if server.spa_fallback {
        router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))))
    } else {
        router.fallback_service(
            ServeDir::new(dir).not_found_service(ServeFile::new(dir.join("404.html"))),
        )
    }
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        warn!("Upload rejected: {}", err);
        bad_request(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        error!("Request failed: {:#}", err);
        AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }
}

// ============ GET /api/health ============

#[derive(Serialize)]
struct HealthResponse {
    message: String,
    docs: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "DocuChat HTML API".to_string(),
        docs: "/docs".to_string(),
    })
}

// ============ POST /api/upload ============

#[derive(Serialize)]
struct UploadResponse {
    success: bool,
    message: String,
    document: UploadedDocument,
}

#[derive(Serialize)]
struct UploadedDocument {
    id: u64,
    filename: String,
    size: usize,
}

/// Handler for `POST /api/upload`.
///
/// Reads the multipart part named `file`, validates its name and encoding,
/// and stores it. Other parts are ignored.
async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| bad_request(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) = upload.ok_or(UploadError::MissingFile)?;
    let new_doc = prepare_document(
        filename.as_deref(),
        bytes.to_vec(),
        &state.config.upload.allowed_extension,
    )?;

    let doc = state.store.add_document(new_doc).await?;
    info!(id = doc.id, filename = %doc.filename, size = doc.size, "Document uploaded");

    Ok(Json(UploadResponse {
        success: true,
        message: format!("Document '{}' uploaded successfully", doc.filename),
        document: UploadedDocument {
            id: doc.id,
            filename: doc.filename,
            size: doc.size,
        },
    }))
}

/// Multipart read failures keep axum's status (413 for an exceeded body limit).
fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    let status = err.status();
    let message = UploadError::Unreadable(err.body_text()).to_string();
    warn!("Upload rejected: {}", message);
    AppError { status, message }
}

// ============ POST /api/chat ============

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    agent_type: Option<String>,
}

#[derive(Serialize)]
struct ChatResponse {
    success: bool,
    response: String,
    agent_type: String,
    documents_available: usize,
}

/// Accepts a missing `Content-Type`; a present one must name JSON.
fn is_json_or_absent(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return true;
    };
    let Ok(value) = value.to_str() else {
        return false;
    };
    let mime = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Handler for `POST /api/chat`.
///
/// Routes the message to the agent selected by `agent_type` and records
/// the question and the reply in the chat history. The body is parsed as
/// JSON even when the client sends no `Content-Type`.
async fn handle_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let body = body.map_err(|e| AppError {
        status: e.status(),
        message: e.body_text(),
    })?;
    if !is_json_or_absent(&headers) {
        return Err(bad_request(
            "Expected request with `Content-Type: application/json`",
        ));
    }
    let Json(request) =
        Json::<ChatRequest>::from_bytes(&body).map_err(|e| bad_request(e.body_text()))?;

    let message = request
        .message
        .filter(|m| !m.is_empty())
        .ok_or_else(|| bad_request("Message is required"))?;
    let agent_type = request
        .agent_type
        .unwrap_or_else(|| DOCUMENT_SEARCH_TAG.to_string());

    let kind = AgentKind::from_tag(&agent_type);
    let agent = state
        .agents
        .find(kind)
        .ok_or_else(|| anyhow::anyhow!("no agent registered for {}", kind.tag()))?;

    let document_count = state.store.document_count().await?;
    let ctx = AgentContext {
        store: state.store.as_ref(),
        document_count,
    };
    let response = agent.respond(&message, &ctx).await?;

    state
        .store
        .append_exchange(ChatMessage::user(message), ChatMessage::assistant(response.clone()))
        .await?;
    debug!(agent = kind.tag(), documents = document_count, "Chat turn recorded");

    Ok(Json(ChatResponse {
        success: true,
        response,
        agent_type,
        documents_available: document_count,
    }))
}

// ============ GET /api/documents ============

#[derive(Serialize)]
struct DocumentsResponse {
    documents: Vec<DocumentSummary>,
}

async fn handle_list_documents(
    State(state): State<AppState>,
) -> Result<Json<DocumentsResponse>, AppError> {
    let documents = state.store.list_documents().await?;
    Ok(Json(DocumentsResponse { documents }))
}

// ============ GET /api/chat/history ============

#[derive(Serialize)]
struct HistoryResponse {
    history: Vec<ChatMessage>,
}

async fn handle_chat_history(
    State(state): State<AppState>,
) -> Result<Json<HistoryResponse>, AppError> {
    let history = state.store.chat_history().await?;
    Ok(Json(HistoryResponse { history }))
}
