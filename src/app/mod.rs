//! 应用层：路由组装
//!
//! 中间件顺序（由外到内）：请求日志 → trace → panic 捕获 → 路由匹配
//! → 认证（仅写操作）→ 载荷校验（提取器）→ 处理器。

pub mod product;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::core::{
    auth::ApiKey,
    middleware::{handle_panic, request_logging_middleware, require_api_key, route_not_found},
};
use product::{
    handler::{
        create_product, delete_product, get_product, health_check, list_products, update_product,
        welcome, AppState,
    },
    model::sample_products,
    service::ProductService,
    store::{InMemoryProductStore, ProductStore},
};

/// 组装完整的路由，存储由调用方注入
pub fn router(store: Arc<dyn ProductStore>, api_key: ApiKey) -> Router {
    let state = AppState {
        product_service: ProductService::new(store),
    };

    // 路径存在但方法不匹配时也走 404 信封，而不是 axum 默认的空 405
    let public = Router::new()
        .route("/", get(welcome).fallback(route_not_found))
        .route("/health", get(health_check).fallback(route_not_found))
        .route("/api/products", get(list_products).fallback(route_not_found))
        .route("/api/products/:id", get(get_product).fallback(route_not_found));

    let protected = Router::new()
        .route("/api/products", post(create_product))
        .route("/api/products/:id", put(update_product).delete(delete_product))
        .route_layer(middleware::from_fn_with_state(api_key, require_api_key));

    public
        .merge(protected)
        .fallback(route_not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_logging_middleware))
}

/// 预置示例数据的内存存储
pub fn seeded_store() -> Arc<dyn ProductStore> {
    Arc::new(InMemoryProductStore::with_products(sample_products()))
}
