use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, info, info_span};

use crate::principal::USER_ID_HEADER;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 本次请求的关联标识，放入请求扩展供提取器使用
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

fn header_value(req: &Request, name: &str, max_len: usize) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= max_len)
        .map(str::to_string)
}

/// 每个请求一个 `http.request` span，并回显 `x-request-id`
pub async fn trace_request(mut req: Request, next: Next) -> Response {
    let request_id = header_value(&req, REQUEST_ID_HEADER, 128)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let user = header_value(&req, USER_ID_HEADER, 128).unwrap_or_else(|| "-".to_string());
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let span = info_span!(
        "http.request",
        method = %req.method(),
        route = %route,
        user = %user,
        request_id = %request_id,
    );
    req.extensions_mut().insert(RequestId(request_id.clone()));

    async move {
        let started = Instant::now();
        let mut resp = next.run(req).await;
        info!(
            status = resp.status().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
        if let Ok(v) = HeaderValue::from_str(&request_id) {
            resp.headers_mut().insert(REQUEST_ID_HEADER, v);
        }
        resp
    }
    .instrument(span)
    .await
}
