mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth;
use crate::features::auth::routes as auth_routes;
use crate::features::contributions::handlers::ContributionState;
use crate::features::contributions::{routes as contributions_routes, ContributionService};
use crate::features::dashboard::handlers::DashboardState;
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::locator::clients::{IpGeolocationClient, NominatimClient};
use crate::features::locator::services::{NetworkLocator, ReverseGeocoder};
use crate::features::locator::{routes as locator_routes, LocationAcquirer, ProximityService};
use crate::features::profiles::{routes as profiles_routes, ProfileCache, ProfileService};
use crate::features::reports::handlers::ReportState;
use crate::features::reports::services::ReportStore;
use crate::features::reports::{
    routes as reports_routes, PhotoService, ReportService, ReportSubmissionService,
};
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Initialize auth
    let jwks_client = Arc::new(auth::JwksClient::new(
        &config.auth.issuer,
        config.auth.jwks_cache_ttl,
    ));
    let jwt_validator = Arc::new(auth::JwtValidator::new(
        jwks_client,
        config.auth.issuer.clone(),
        config.auth.audience.clone(),
        config.auth.jwt_leeway,
    ));
    tracing::info!("Auth configuration initialized");

    // Initialize MinIO client for report photos
    let minio_client = Arc::new(
        modules::storage::MinIOClient::new(config.storage.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?,
    );
    let photo_service = Arc::new(PhotoService::new(
        minio_client,
        config.storage.max_photo_size,
        config.storage.max_photos_per_report,
    ));
    tracing::info!(
        "Photo service initialized (max {} photos, {} bytes each)",
        config.storage.max_photos_per_report,
        config.storage.max_photo_size
    );

    // Initialize Profile Service with its session cache
    let profile_cache = Arc::new(ProfileCache::new(config.profile_cache.ttl));
    let profile_service = Arc::new(ProfileService::new(pool.clone(), profile_cache));
    tracing::info!(
        "Profile service initialized (cache ttl {}s)",
        config.profile_cache.ttl.as_secs()
    );

    // Initialize Report Services
    let report_service = Arc::new(ReportService::new(pool.clone()));
    let submission_service = Arc::new(ReportSubmissionService::new(
        Arc::clone(&report_service),
        photo_service,
        Arc::clone(&profile_service),
    ));
    tracing::info!("Report services initialized");

    // Initialize location providers; each one is optional
    let network_locator: Option<Arc<dyn NetworkLocator>> = match &config.geo.ip_geolocation_url {
        Some(url) => {
            let client =
                IpGeolocationClient::new(url, &config.geo.user_agent, config.geo.request_timeout)
                    .map_err(|e| anyhow::anyhow!("Failed to create IP geolocation client: {}", e))?;
            tracing::info!("IP geolocation fallback enabled: {}", url);
            Some(Arc::new(client))
        }
        None => {
            tracing::info!("IP geolocation fallback disabled");
            None
        }
    };
    let reverse_geocoder: Option<Arc<dyn ReverseGeocoder>> =
        match &config.geo.reverse_geocoding_url {
            Some(url) => {
                let client =
                    NominatimClient::new(url, &config.geo.user_agent, config.geo.request_timeout)
                    .map_err(|e| anyhow::anyhow!("Failed to create geocoding client: {}", e))?;
                tracing::info!("Reverse geocoding enabled: {}", url);
                Some(Arc::new(client))
            }
            None => {
                tracing::info!("Reverse geocoding disabled");
                None
            }
        };
    let location_acquirer = Arc::new(LocationAcquirer::new(
        config.geo.device_timeout,
        network_locator,
        reverse_geocoder,
    ));
    let report_store: Arc<dyn ReportStore> = report_service.clone();
    let proximity_service = Arc::new(ProximityService::new(report_store, location_acquirer));
    tracing::info!("Proximity service initialized");

    // Initialize Contribution and Dashboard Services
    let contribution_service = Arc::new(ContributionService::new(pool.clone()));
    let dashboard_service = Arc::new(DashboardService::new(pool.clone()));
    tracing::info!("Contribution and dashboard services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&profile_service)))
        .merge(profiles_routes::routes(Arc::clone(&profile_service)))
        .merge(reports_routes::routes(
            ReportState {
                report_service,
                submission_service,
            },
            config.storage.max_submission_size(),
        ))
        .merge(locator_routes::routes(proximity_service))
        .merge(contributions_routes::routes(ContributionState {
            contribution_service,
            profile_service: Arc::clone(&profile_service),
        }))
        .merge(dashboard_routes::routes(DashboardState {
            dashboard_service,
            profile_service,
        }))
        .route_layer(axum::middleware::from_fn_with_state(
            jwt_validator.clone(),
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
