use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use merchtopia::application::ports::session_repository::SessionRepository;
use merchtopia::bootstrap::app_context::{AppContext, AppServices};
use merchtopia::bootstrap::config::Config;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            merchtopia::presentation::http::auth::login,
            merchtopia::presentation::http::auth::logout,
            merchtopia::presentation::http::auth::me,
            merchtopia::presentation::http::products::list_products,
            merchtopia::presentation::http::products::create_product,
            merchtopia::presentation::http::products::get_product,
            merchtopia::presentation::http::products::update_product,
            merchtopia::presentation::http::products::delete_product,
            merchtopia::presentation::http::shop::list_sale_products,
            merchtopia::presentation::http::shop::get_sale_product,
            merchtopia::presentation::http::stock::add_incoming_stock,
            merchtopia::presentation::http::stock::adjust_stock,
            merchtopia::presentation::http::stock::get_stock_level,
            merchtopia::presentation::http::stock::list_transactions,
            merchtopia::presentation::http::orders::create_order,
            merchtopia::presentation::http::orders::list_orders,
            merchtopia::presentation::http::orders::lookup_order,
            merchtopia::presentation::http::orders::get_order,
            merchtopia::presentation::http::orders::update_order_status,
            merchtopia::presentation::http::health::health,
        ),
        components(schemas(
            merchtopia::presentation::http::auth::LoginRequest,
            merchtopia::presentation::http::auth::UserResponse,
            merchtopia::presentation::http::products::ProductResponse,
            merchtopia::presentation::http::products::CreateProductRequest,
            merchtopia::presentation::http::products::UpdateProductRequest,
            merchtopia::presentation::http::stock::AddStockRequest,
            merchtopia::presentation::http::stock::AdjustStockRequest,
            merchtopia::presentation::http::stock::StockLevelResponse,
            merchtopia::presentation::http::stock::StockTransactionResponse,
            merchtopia::presentation::http::orders::CreateOrderRequest,
            merchtopia::presentation::http::orders::CreateOrderItemRequest,
            merchtopia::presentation::http::orders::UpdateOrderStatusRequest,
            merchtopia::presentation::http::orders::OrderResponse,
            merchtopia::presentation::http::orders::OrderItemResponse,
            merchtopia::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Auth", description = "Back office authentication"),
            (name = "Products", description = "Product catalog management"),
            (name = "Shop", description = "Public storefront"),
            (name = "Stock", description = "Stock ledger and levels"),
            (name = "Orders", description = "Order placement and management"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "merchtopia=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting Merchtopia backend");

    // Database
    let pool = merchtopia::infrastructure::db::connect_pool(&cfg.database_url).await?;
    merchtopia::infrastructure::db::migrate(&pool).await?;

    let user_repo = Arc::new(
        merchtopia::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository::new(
            pool.clone(),
        ),
    );
    let session_repo = Arc::new(
        merchtopia::infrastructure::db::repositories::session_repository_sqlx::SqlxSessionRepository::new(
            pool.clone(),
        ),
    );
    let product_repo = Arc::new(
        merchtopia::infrastructure::db::repositories::product_repository_sqlx::SqlxProductRepository::new(
            pool.clone(),
        ),
    );
    let order_repo = Arc::new(
        merchtopia::infrastructure::db::repositories::order_repository_sqlx::SqlxOrderRepository::new(
            pool.clone(),
        ),
    );
    let stock_repo = Arc::new(
        merchtopia::infrastructure::db::repositories::stock_repository_sqlx::SqlxStockRepository::new(
            pool.clone(),
        ),
    );

    // The sweep task holds its own handle to the session store.
    let sessions_for_sweep = session_repo.clone();

    let services = AppServices::new(
        user_repo,
        session_repo,
        product_repo,
        order_repo,
        stock_repo,
    );

    let ctx = AppContext::new(cfg.clone(), services);

    // Build CORS
    let cors = if let Some(origin) = cfg.frontend_url.clone() {
        match HeaderValue::from_str(&origin) {
            Ok(v) => CorsLayer::new()
                .allow_origin(v)
                .allow_methods([
                    http::Method::GET,
                    http::Method::POST,
                    http::Method::PUT,
                    http::Method::DELETE,
                    http::Method::PATCH,
                    http::Method::OPTIONS,
                ])
                .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
                .allow_credentials(true),
            Err(_) => CorsLayer::new()
                .allow_origin(AllowOrigin::mirror_request())
                .allow_methods([
                    http::Method::GET,
                    http::Method::POST,
                    http::Method::PUT,
                    http::Method::DELETE,
                    http::Method::PATCH,
                    http::Method::OPTIONS,
                ])
                .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
                .allow_credentials(true),
        }
    } else {
        if cfg.is_production {
            // In production, FRONTEND_URL is mandatory (enforced earlier), but fallback defensively to deny all
            CorsLayer::new()
                .allow_origin(AllowOrigin::exact(HeaderValue::from_static(
                    "http://invalid",
                )))
                .allow_methods([
                    http::Method::GET,
                    http::Method::POST,
                    http::Method::PUT,
                    http::Method::DELETE,
                    http::Method::PATCH,
                    http::Method::OPTIONS,
                ])
                .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        } else {
            // Development convenience
            CorsLayer::new()
                .allow_origin(AllowOrigin::mirror_request())
                .allow_methods([
                    http::Method::GET,
                    http::Method::POST,
                    http::Method::PUT,
                    http::Method::DELETE,
                    http::Method::PATCH,
                    http::Method::OPTIONS,
                ])
                .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
                .allow_credentials(true)
        }
    };

    // Build API router
    let api_router = Router::new()
        .nest(
            "/api",
            merchtopia::presentation::http::health::routes(pool.clone()),
        )
        .nest(
            "/api/auth",
            merchtopia::presentation::http::auth::routes(ctx.clone()),
        )
        .nest(
            "/api",
            merchtopia::presentation::http::products::routes(ctx.clone()),
        )
        .nest(
            "/api",
            merchtopia::presentation::http::shop::routes(ctx.clone()),
        )
        .nest(
            "/api",
            merchtopia::presentation::http::stock::routes(ctx.clone()),
        )
        .nest(
            "/api",
            merchtopia::presentation::http::orders::routes(ctx.clone()),
        )
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    let api_handle: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
        axum::serve(listener, api_router).await?;
        Ok(())
    });

    // Background sweep of expired sessions
    let sweep_interval = Duration::from_secs(cfg.session_sweep_interval_secs);
    let sweep_handle: JoinHandle<()> = tokio::spawn(async move {
        loop {
            match sessions_for_sweep.delete_expired().await {
                Ok(0) => {}
                Ok(n) => tracing::debug!(removed = n, "expired_sessions_swept"),
                Err(e) => tracing::error!(error = ?e, "session_sweep_failed"),
            }
            sleep(sweep_interval).await;
        }
    });

    match api_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(?e, "API server task failed"),
        Err(e) => error!(?e, "API server task panicked"),
    }

    sweep_handle.abort();
    Ok(())
}
