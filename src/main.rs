use anyhow::Context;
use product_api::{
    app::product::store::ProductStore, core::auth::ApiKey, infrastructure::logger::Logger,
    load_config, router, seeded_store,
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("加载配置失败")?;

    // 初始化日志
    Logger::init(&config.logging.level);

    let store = seeded_store();
    info!("✅ 已初始化 {} 个示例产品", store.count()?);

    let app = router(store, ApiKey::new(config.auth.api_key.as_str()));

    let address = config.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("无法绑定到 {}", address))?;

    info!("🚀 Product API 服务器运行在 http://{}", address);
    info!("📖 API 端点:");
    info!("   GET    /                  - 欢迎信息");
    info!("   GET    /health            - 健康检查");
    info!("   GET    /api/products      - 产品列表 (category, search, page, limit)");
    info!("   GET    /api/products/:id  - 获取特定产品");
    info!("   POST   /api/products      - 创建产品 (需要 x-api-key)");
    info!("   PUT    /api/products/:id  - 更新产品 (需要 x-api-key)");
    info!("   DELETE /api/products/:id  - 删除产品 (需要 x-api-key)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务器运行失败")?;

    info!("服务器已关闭");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("无法监听 Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("无法监听 SIGTERM: {}", e);
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

    info!("收到关闭信号，开始优雅停机");
}
