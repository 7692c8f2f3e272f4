use agro_application::command_bus::CommandBus;
use agro_application::dto::{RecordDto, RecordListDto};
use agro_application::master_data::{
    ChangeStatus, CreateRecord, GetRecord, ListRecords, RemoveRecord, UpdateRecord,
};
use agro_application::query_bus::QueryBus;
use agro_domain::record::{MasterData, RecordId};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{MethodRouter, get, post},
};
use serde::Deserialize;

use super::{ApiJson, Message, SearchParams, message, parse_id};
use crate::error::ApiError;
use crate::principal::Actor;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusBody<S> {
    pub id: RecordId,
    pub status: S,
}

/// 一类主数据的路由，挂在 `/{R::COLLECTION}` 下
pub fn routes<R: MasterData>() -> Router<AppState> {
    resource_routes::<R>(get(list::<R>), get(get_one::<R>))
}

/// 写操作使用通用处理器，列表与详情由调用方提供
pub fn resource_routes<R: MasterData>(
    list: MethodRouter<AppState>,
    get_one: MethodRouter<AppState>,
) -> Router<AppState> {
    let base = format!("/{}", R::COLLECTION);
    Router::new()
        .route(&base, list.post(create::<R>))
        .route(&format!("{base}/status"), post(change_status::<R>))
        .route(
            &format!("{base}/{{id}}"),
            get_one.patch(update::<R>).delete(remove::<R>),
        )
}

async fn create<R: MasterData>(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    ApiJson(draft): ApiJson<R::Draft>,
) -> Result<Json<Message>, ApiError> {
    state
        .app
        .commands
        .dispatch(&ctx, CreateRecord::<R> { draft })
        .await?;
    Ok(message(format!("{} created successfully!", R::LABEL)))
}

async fn list<R: MasterData>(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Query(params): Query<SearchParams>,
) -> Result<Json<RecordListDto<R>>, ApiError> {
    let records = state
        .app
        .queries
        .dispatch(&ctx, ListRecords::<R>::new(params.search))
        .await?;
    Ok(Json(records))
}

async fn get_one<R: MasterData>(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
) -> Result<Json<RecordDto<R>>, ApiError> {
    let record = state
        .app
        .queries
        .dispatch(&ctx, GetRecord::<R>::new(parse_id(&id)?))
        .await?;
    Ok(Json(record))
}

async fn update<R: MasterData>(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<R::Patch>,
) -> Result<Json<Message>, ApiError> {
    let id = parse_id(&id)?;
    state
        .app
        .commands
        .dispatch(&ctx, UpdateRecord::<R> { id, patch })
        .await?;
    Ok(message(format!("{} updated successfully!", R::LABEL)))
}

async fn remove<R: MasterData>(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    state
        .app
        .commands
        .dispatch(&ctx, RemoveRecord::<R>::new(parse_id(&id)?))
        .await?;
    Ok(message(format!("{} deleted successfully!", R::LABEL)))
}

async fn change_status<R: MasterData>(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    ApiJson(body): ApiJson<StatusBody<R::Status>>,
) -> Result<Json<Message>, ApiError> {
    state
        .app
        .commands
        .dispatch(
            &ctx,
            ChangeStatus::<R> {
                id: body.id,
                status: body.status,
            },
        )
        .await?;
    Ok(message(format!("{} status updated successfully!", R::LABEL)))
}
