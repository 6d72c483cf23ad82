mod app_state;
mod config;
mod error;
mod handlers;
mod logging;

use app_state::AppState;
use axum::routing::get;
use axum::Router;
use config::AppConfig;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化配置
    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;

    // 初始化日志
    logging::init_logging(&config)?;

    info!("Starting {}...", config.service_name);

    // 创建应用状态
    let state = Arc::new(AppState::new(config.clone())?);

    // 初始化路由
    let app = Router::new()
        .route(
            "/pay/notify",
            get(handlers::handle_notification).post(handlers::handle_notification),
        )
        .route("/pay/query/{channel}", get(handlers::handle_query))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
