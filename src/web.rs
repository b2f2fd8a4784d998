//! Web server: the JSON API under `/api` plus the static browser page

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::config::WebConfig;

/// Itinerary requests are a few hundred bytes
const MAX_BODY_BYTES: usize = 16 * 1024;

pub fn app(config: &WebConfig, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(state))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run(config: &WebConfig, state: AppState) -> Result<()> {
    let app = app(config, state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    if let (Some(cert), Some(key)) = (&config.tls_cert_path, &config.tls_key_path) {
        #[cfg(feature = "tls")]
        return serve_tls(app, addr, cert, key).await;

        #[cfg(not(feature = "tls"))]
        tracing::warn!(
            "Ignoring TLS certificate '{}' and key '{}', built without the tls feature",
            cert,
            key
        );
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")
}

#[cfg(feature = "tls")]
async fn serve_tls(app: Router, addr: SocketAddr, cert: &str, key: &str) -> Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    // several providers may be compiled in; pick ring explicitly
    let _ = rustls::crypto::ring::default_provider().install_default();

    let tls = RustlsConfig::from_pem_file(cert, key)
        .await
        .with_context(|| format!("Failed to load TLS certificate '{cert}' and key '{key}'"))?;

    let handle = axum_server::Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.graceful_shutdown(None);
    });

    tracing::info!("Web server running at https://localhost:{}", addr.port());
    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .context("Web server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down web server");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TripScoutConfig;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_page_guards_against_stale_and_failed_fetches() {
        let mut config = TripScoutConfig::default();
        config.web.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/frontend").to_string();
        let state = AppState::from_config(&config).unwrap();

        let response = app(&config.web, state)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains("const generation = ++searchGeneration;"));
        assert!(page.contains("if (generation === searchGeneration) render(view);"));
        assert!(page.contains(r#"view = { state: "error", content: `Error: ${e.message}` };"#));
        assert!(page.contains(r#"$("itinerary-error").textContent = `Error: ${e.message}`;"#));
    }
}
