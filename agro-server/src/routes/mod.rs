use std::time::Duration;

use agro_domain::model::{Agent, Buyer, Machine, Seller, Worker};
use agro_domain::record::RecordId;
use axum::{
    Json, Router,
    extract::FromRequest,
    http::{HeaderName, Method, header::CONTENT_TYPE},
    middleware::from_fn,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::error::ApiError;
use crate::middleware::trace_request;
use crate::principal::{USER_ID_HEADER, USER_ROLE_HEADER};
use crate::state::AppState;

pub mod dashboard;
pub mod goods;
pub mod master_data;
pub mod stock;

/// JSON 请求体；解析失败统一转为 `ApiError`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

pub fn message(text: impl Into<String>) -> Json<Message> {
    Json(Message {
        message: text.into(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

pub fn parse_id(raw: &str) -> Result<RecordId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid id '{raw}'")))
}

async fn hello_world() -> &'static str {
    "Hello World!"
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_ROLE_HEADER),
        ])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/hello-world", get(hello_world))
        .merge(master_data::routes::<Agent>())
        .merge(master_data::routes::<Buyer>())
        .merge(master_data::routes::<Seller>())
        .merge(master_data::routes::<Worker>())
        .merge(master_data::routes::<Machine>())
        .merge(goods::routes())
        .merge(stock::routes())
        .merge(dashboard::routes())
        .layer(from_fn(trace_request))
        .layer(cors)
        .with_state(state)
}
