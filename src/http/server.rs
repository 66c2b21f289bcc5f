//! HTTP server setup and request handlers.
//!
//! # Responsibilities
//! - Create the axum Router with all handlers
//! - Wire up middleware (tracing, request timeout)
//! - Relay POST bodies to the storage-facing service
//! - Serve the static site (landing page, form page, assets, 404 page)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{debug, error, info};

use crate::config::HttpConfig;
use crate::http::static_files;
use crate::observability::metrics;
use crate::relay::RelayClient;

/// Application state injected into handlers. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    relay: Arc<RelayClient>,
    static_root: PathBuf,
}

/// HTTP front door for form submissions.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server from configuration and a relay client.
    pub fn new(config: &HttpConfig, relay: RelayClient) -> Self {
        let state = AppState {
            relay: Arc::new(relay),
            static_root: PathBuf::from(&config.static_root),
        };
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the axum router. Routes are resolved once at registration;
    /// the fallback covers static GETs and POSTs to any other path.
    fn build_router(config: &HttpConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(index).post(submit))
            .route("/message", get(message_form).post(submit))
            .fallback(fallback)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve requests on the given listener until shutdown fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

async fn index(State(state): State<AppState>) -> Response {
    static_files::page(&state.static_root, "index.html", StatusCode::OK).await
}

async fn message_form(State(state): State<AppState>) -> Response {
    static_files::page(&state.static_root, "message.html", StatusCode::OK).await
}

/// POST handler: relay the raw body, then redirect home.
///
/// The redirect is issued whatever the relay outcome; a failed relay is
/// logged and the submission is lost (best-effort, at-most-once).
async fn submit(State(state): State<AppState>, body: Bytes) -> Response {
    match state.relay.send(&body).await {
        Ok(ack) => debug!(
            payload_bytes = body.len(),
            ack_bytes = ack.len(),
            "Submission relayed"
        ),
        Err(e) => {
            metrics::record_relay_error();
            error!(error = %e, "Submission relay failed");
        }
    }
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

/// Fallback for paths with no registered route: POSTs are relayed like
/// any other, GETs resolve against the static root.
async fn fallback(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    match method {
        Method::POST => submit(State(state), body).await,
        Method::GET => static_files::serve(&state.static_root, uri.path()).await,
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}
