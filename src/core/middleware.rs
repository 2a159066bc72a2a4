//! 核心中间件模块

use std::{any::Any, time::Instant};

use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use tracing::{debug, error, info};

use super::{
    auth::{authenticate, ApiKey, API_KEY_HEADER},
    error::{CoreError, UNEXPECTED_ERROR_MESSAGE},
};

/// 请求日志中间件
///
/// 位于最外层，进入任何路由或守卫之前先记录时间戳、方法和 URL。
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    info!(
        "[{}] {} {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        method,
        uri
    );

    let response = next.run(req).await;

    debug!(
        "{} {} - {} - {}ms",
        method,
        uri,
        response.status(),
        start.elapsed().as_millis()
    );

    response
}

/// 认证中间件，只挂在会修改数据的路由上
pub async fn require_api_key(
    State(api_key): State<ApiKey>,
    req: Request,
    next: Next,
) -> Result<Response, CoreError> {
    let supplied = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    authenticate(supplied, api_key.as_str())?;

    Ok(next.run(req).await)
}

/// 兜底路由：没有任何路由匹配时返回 404
pub async fn route_not_found(OriginalUri(uri): OriginalUri) -> CoreError {
    CoreError::NotFound(format!(
        "Resource Not Found: The requested URL {} does not exist.",
        uri
    ))
}

/// 处理器 panic 时的响应，交给统一错误信封
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!("handler panicked: {}", detail);

    CoreError::InternalServerError(UNEXPECTED_ERROR_MESSAGE.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use std::{
        io,
        sync::{Arc, Mutex},
    };
    use tower::ServiceExt;

    /// 收集 fmt subscriber 输出的内存 writer
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logged_app() -> Router {
        guarded()
            .fallback(route_not_found)
            .layer(middleware::from_fn(request_logging_middleware))
    }

    fn request_lines<'a>(logs: &'a str, method_and_url: &str) -> Vec<&'a str> {
        let suffix = format!("] {}", method_and_url);
        logs.lines()
            .filter(|line| line.contains("INFO") && line.ends_with(&suffix))
            .collect()
    }

    fn assert_millis_timestamp(line: &str) {
        let start = line.find('[').unwrap() + 1;
        let end = start + line[start..].find(']').unwrap();
        let timestamp = &line[start..end];

        assert!(
            chrono::DateTime::parse_from_rfc3339(timestamp).is_ok(),
            "not RFC 3339: {}",
            timestamp
        );
        assert!(timestamp.ends_with('Z'));
        assert_eq!(timestamp.split('.').nth(1).map(str::len), Some(4));
    }

    #[tokio::test]
    async fn test_request_logger_records_every_request() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        // 未认证
        let req = axum::http::Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = logged_app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // 未匹配路由
        let req = axum::http::Request::builder()
            .uri("/missing?page=2")
            .body(Body::empty())
            .unwrap();
        let response = logged_app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let output = logs.contents();

        let unauthorized = request_lines(&output, "GET /");
        assert_eq!(unauthorized.len(), 1, "{}", output);
        assert_millis_timestamp(unauthorized[0]);

        let missing = request_lines(&output, "GET /missing?page=2");
        assert_eq!(missing.len(), 1, "{}", output);
        assert_millis_timestamp(missing[0]);

        // 日志先于错误处理输出
        let logged_at = output.find(missing[0]).unwrap();
        let rejected_at = output.find("Resource Not Found").unwrap();
        assert!(logged_at < rejected_at);
    }

    fn guarded() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .route_layer(middleware::from_fn_with_state(
                ApiKey::new("secret"),
                require_api_key,
            ))
    }

    #[tokio::test]
    async fn test_require_api_key() {
        let req = axum::http::Request::builder()
            .uri("/")
            .header(API_KEY_HEADER, "secret")
            .body(Body::empty())
            .unwrap();
        let response = guarded().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let req = axum::http::Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = guarded().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_panic_becomes_internal_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
