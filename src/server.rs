use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    config::Config,
    handlers::{self, AppState},
    logging::SensitiveApiKey,
    metrics,
    pricing::PriceEstimator,
    providers,
    signals::setup_signal_handlers,
    storage::MemStorage,
};

/// Request bodies above this size are rejected
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Start the battery marketplace server
///
/// This function:
/// 1. Initializes metrics
/// 2. Sets up signal handlers for graceful shutdown
/// 3. Builds the estimator and seeded storage
/// 4. Binds to the configured address
/// 5. Serves requests with graceful shutdown support
pub async fn start_server(config: Config) -> Result<()> {
    let metrics_handle = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        Some(Arc::new(metrics::init_metrics()?))
    } else {
        None
    };

    let (shutdown_tx, signal_handle) = setup_signal_handlers();
    let mut shutdown_rx = shutdown_tx.subscribe();

    let app_state = build_state(&config)?;
    let app = create_router(&config, app_state, metrics_handle);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting battery marketplace on {}", addr);
    match config.ai.provider {
        crate::config::AiProviderKind::None => {
            info!("No AI provider configured, estimates use the pricing formula")
        }
        provider => info!(
            provider = ?provider,
            model = config.ai.model_name(),
            api_key = %SensitiveApiKey::new(&config.ai.api_key),
            "AI pricing enabled"
        ),
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Build the estimator and storage from configuration
pub fn build_state(config: &Config) -> Result<AppState> {
    let generator = providers::build_generator(&config.ai)?;
    let estimator = PriceEstimator::new(config.pricing.clone(), generator);

    Ok(AppState {
        estimator: Arc::new(estimator),
        storage: Arc::new(MemStorage::seeded()),
    })
}

/// API routes without state; shared with handler tests
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/battery/price", post(handlers::battery::estimate_price))
        .route("/api/battery", post(handlers::battery::save_battery))
        .route("/api/battery/:id", get(handlers::battery::get_battery))
        .route("/api/battery/:id/pickups", get(handlers::battery::list_pickups))
        .route("/api/pickups", post(handlers::battery::create_pickup))
        .route("/api/test-estimate", get(handlers::battery::test_estimate))
        .route("/api/products", get(handlers::products::list_products))
        .route("/api/products/filter", post(handlers::products::filter_products))
        .route("/api/products/:id", get(handlers::products::get_product))
        .route("/api/subsidies", get(handlers::subsidies::list_subsidies))
        .route(
            "/api/subsidies/category/:category",
            get(handlers::subsidies::subsidies_by_category),
        )
        .route(
            "/api/ideas",
            get(handlers::ideas::list_ideas).post(handlers::ideas::create_idea),
        )
        .route("/api/ideas/:id/vote", post(handlers::ideas::vote_for_idea))
        .route("/api/analytics", get(handlers::analytics::list_analytics))
        .route("/api/market-data", get(handlers::analytics::market_data))
        .route("/api/chart-data/:type", get(handlers::analytics::chart_data))
        .route(
            "/api/business-inquiries",
            get(handlers::intake::list_inquiries).post(handlers::intake::create_inquiry),
        )
        .route(
            "/api/contributions",
            get(handlers::intake::list_contributions).post(handlers::intake::create_contribution),
        )
        .route("/api/newsletter", post(handlers::intake::subscribe))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
}

/// Create the Axum router with all routes and middleware
pub fn create_router(
    config: &Config,
    app_state: AppState,
    metrics_handle: Option<Arc<PrometheusHandle>>,
) -> Router {
    let mut app = api_routes().with_state(app_state);

    if let Some(handle) = metrics_handle {
        let metrics_routes = Router::new()
            .route(&config.metrics.endpoint, get(render_metrics))
            .with_state(handle);
        app = app.merge(metrics_routes);
    }

    app.layer(cors_layer(&config.server.cors_origins))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
}

/// Prometheus text exposition of every recorded metric
async fn render_metrics(State(handle): State<Arc<PrometheusHandle>>) -> String {
    handle.render()
}

/// Permissive CORS unless explicit origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{get, json_request, read_json};
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    fn test_router(config: &Config) -> Router {
        let state = build_state(config).unwrap();
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        create_router(config, state, Some(Arc::new(recorder.handle())))
    }

    #[tokio::test]
    async fn test_public_routes() {
        let app = test_router(&Config::default());

        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["status"], "healthy");

        let response = app.oneshot(get("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_endpoint_renders_recorded_values() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = Arc::new(recorder.handle());
        ::metrics::with_local_recorder(&recorder, || metrics::record_created("idea"));

        let mut config = Config::default();
        config.metrics.endpoint = "/internal/metrics".to_string();
        let app = create_router(&config, build_state(&config).unwrap(), Some(handle));

        let response = app.oneshot(get("/internal/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("marketplace_records_created_total"));
        assert!(text.contains("entity=\"idea\""));
    }

    #[tokio::test]
    async fn test_metrics_route_absent_when_disabled() {
        let config = Config::default();
        let state = build_state(&config).unwrap();
        let app = create_router(&config, state, None);

        let response = app.oneshot(get("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let app = test_router(&Config::default());
        let padding = "x".repeat(BODY_LIMIT_BYTES + 1);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/ideas",
                json!({"title": "t", "description": padding, "author": "a"}),
            ))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        assert_ne!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_cors_preflight_with_configured_origin() {
        let mut config = Config::default();
        config.server.cors_origins = vec!["https://market.example".to_string()];
        let app = test_router(&config);

        let request = axum::http::Request::builder()
            .method("OPTIONS")
            .uri("/api/battery/price")
            .header("origin", "https://market.example")
            .header("access-control-request-method", "POST")
            .body(axum::body::Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "https://market.example"
        );
    }
}
