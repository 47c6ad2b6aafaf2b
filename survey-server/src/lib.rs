//! Web host for a single hosted survey.
//!
//! Every `GET /` is one page load: it fetches the survey and, if there is a
//! form to fill in, opens a session holding that page's [`SurveyPage`]. The
//! page's live-update script then posts every edit to the session and swaps
//! in the re-rendered form, so validation messages appear as the user types.
//!
//! | route                                      | effect                                  |
//! |--------------------------------------------|-----------------------------------------|
//! | `GET /`                                    | load the survey, render the page        |
//! | `POST /sessions/{session}/answers/{question}` | apply one answer (`value` form field) |
//! | `POST /sessions/{session}/submit`          | apply all posted answers and submit     |
//! | `GET /responses/{id}`                      | review a stored response                |
//! | `GET /health`                              | liveness                                |
//!
//! Requests carrying the `x-survey-fragment` header get the contents of the
//! page root instead of a complete document.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use survey::{Catalog, SurveyPage};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub mod config;
pub mod error;
pub mod routes;
pub mod session;

pub use config::ServerConfig;
pub use error::ServerError;
use session::Sessions;

/// Shared by all requests: the catalog handle and the live sessions.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<dyn Catalog>,
    sessions: Arc<Sessions>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn Catalog>, session_ttl: Duration) -> Self {
        Self {
            catalog,
            sessions: Arc::new(Sessions::new(session_ttl)),
        }
    }

    /// Number of open sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    async fn load_page(&self) -> SurveyPage {
        SurveyPage::load(self.catalog.as_ref()).await
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route(
            "/sessions/{session}/answers/{question}",
            post(routes::update_answer),
        )
        .route("/sessions/{session}/submit", post(routes::submit))
        .route("/responses/{id}", get(routes::review))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn run(config: ServerConfig, catalog: Arc<dyn Catalog>) -> anyhow::Result<()> {
    let state = AppState::new(catalog, config.session_ttl);
    let app = router(state);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                error!(%err, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                error!(%err, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
