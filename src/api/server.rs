//! HTTP server

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::session::SessionManager;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::directory::Directory;
use crate::error::Result;
use crate::mail::{self, Mailer};

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub directory: Directory,
    pub catalog: Catalog,
    pub sessions: SessionManager,
    pub mailer: Arc<dyn Mailer>,
}

pub type SharedState = Arc<AppState>;

/// Run the HTTP server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let directory = Directory::open(config.directory_path())?;
    let catalog = Catalog::open(config.catalog_path())?;
    let mailer = mail::build_mailer(&config.mail)?;

    let state = Arc::new(AppState {
        config,
        directory,
        catalog,
        sessions: SessionManager::new(),
        mailer,
    });

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        // Auth
        .route("/login", get(routes::login_page))
        .route("/login", post(routes::login_submit))
        .route("/logout", get(routes::logout))
        .route("/logout", post(routes::logout))
        // Dashboards
        .route("/dashboard/owner", get(routes::dashboard_owner))
        .route("/dashboard/manager", get(routes::dashboard_manager))
        .route("/dashboard/chef", get(routes::dashboard_chef))
        // Catalog (shop owner)
        .route("/catalog/categories/new", get(routes::add_category_page))
        .route("/catalog/categories/new", post(routes::add_category_submit))
        .route("/catalog/products/new", get(routes::add_product_page))
        .route("/catalog/products/new", post(routes::add_product_submit))
        // Password management
        .route("/password/change", get(routes::change_password_page))
        .route("/password/change", post(routes::change_password_submit))
        .route("/password/forgot", get(routes::forgot_password_page))
        .route("/password/forgot", post(routes::forgot_password_submit))
        .route("/password/otp", get(routes::verify_otp_page))
        .route("/password/otp", post(routes::verify_otp_submit))
        .route("/password/reset", get(routes::reset_password_page))
        .route("/password/reset", post(routes::reset_password_submit))
        // API
        .route("/api/health", get(routes::health))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
