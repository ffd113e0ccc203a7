use dotenvy::dotenv;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::services::ServeDir;
use tower_http::trace::{TraceLayer, DefaultMakeSpan, DefaultOnResponse};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use std::sync::Arc;

mod handlers {
    pub mod content_handlers;
    pub mod download_handlers;
    pub mod form_handlers;
}
mod analytics;
mod config;
mod content;

use config::Config;
use content::ContentSource;
use handlers::content_handlers;
use handlers::download_handlers::{self, AssetSource};
use handlers::form_handlers;

pub struct AppState {
    pub config: Config,
    pub content: ContentSource,
    pub assets: AssetSource,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/health", get(content_handlers::health_check))
        .route("/api/reports", get(content_handlers::list_reports))
        .route("/api/portfolio", get(content_handlers::list_portfolio))
        .route("/api/download", get(download_handlers::download_report))
        .route("/api/apply", post(form_handlers::submit_application))
        .route("/api/mailing-list", post(form_handlers::join_mailing_list));

    let app = match &state.config.static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
        )
        .layer(
            CorsLayer::new()
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_origin(Any)
                .allow_headers([axum::http::header::CONTENT_TYPE])
                .expose_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::CONTENT_DISPOSITION,
                ])
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let _guard = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((dsn, sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(config.environment.clone().into()),
            ..Default::default()
        }))
    });

    let content = ContentSource::load(&config.content_path)?;
    tracing::info!(
        reports = content.reports().len(),
        portfolio = content.portfolio().len(),
        "Loaded content catalog from {}",
        config.content_path.display()
    );

    let assets = match &config.asset_dir {
        Some(dir) => AssetSource::Local { dir: dir.clone() },
        None => AssetSource::Remote {
            client: reqwest::Client::new(),
            base: config.asset_base_url.clone(),
        },
    };

    let bind_addr = config.bind_addr;
    let state_is_dev = config.is_development();
    let state = Arc::new(AppState { config, content, assets });
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(development = state_is_dev, "Listening on {}", bind_addr);
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

#[cfg(test)]
mod test_support {
    use std::sync::Arc;

    use axum::body::{Body, Bytes};
    use axum::http::{header, HeaderMap, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::content::ContentSource;
    use crate::handlers::download_handlers::AssetSource;
    use crate::{build_router, AppState};

    const CATALOG: &str = r#"{
        "reports": [
            {"slug": "africa-2023", "title": "Africa Tech 2023", "description": "Annual review",
             "date": "2023-11-02", "pdf_url": "/reports/africa-2023.pdf", "thumbnail": "/img/africa.jpg"},
            {"slug": "latam-2024", "title": "LatAm Tech 2024", "description": "Annual review",
             "date": "2024-05-20", "pdf_url": "/reports/latam-2024.pdf", "thumbnail": "/img/latam.jpg",
             "featured": true}
        ],
        "portfolio": [
            {"slug": "kibo", "title": "Kibo", "description": "Payments", "company_url": "https://kibo.example",
             "logo": "/img/kibo.svg", "order": 2},
            {"slug": "the-hub", "title": "The Hub", "description": "Community", "company_url": "https://hub.example",
             "logo": "/img/hub.svg", "order": 1}
        ]
    }"#;

    /// State backed by a temp asset directory holding `files`.
    pub fn state_with_assets(files: &[(&str, &[u8])]) -> (Arc<AppState>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        for (path, bytes) in files {
            let file = dir.path().join(path);
            if let Some(parent) = file.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(file, bytes).unwrap();
        }

        let config = Config::from_lookup(|_| None).unwrap();
        let state = AppState {
            config,
            content: ContentSource::from_json(CATALOG).unwrap(),
            assets: AssetSource::Local { dir: dir.path().to_path_buf() },
        };
        (Arc::new(state), dir)
    }

    pub async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, HeaderMap, Bytes) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = build_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, body)
    }

    pub async fn post_json(state: Arc<AppState>, uri: &str, json: Value) -> (StatusCode, Bytes) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap();
        let response = build_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }
}
