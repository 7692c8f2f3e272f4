use agro_application::command_bus::CommandBus;
use agro_application::dto::{StockDto, StockListDto};
use agro_application::query_bus::QueryBus;
use agro_application::stock::{CreateStock, GetStock, ListStock, RemoveStock, UpdateStock};
use agro_domain::model::{StockLine, StockPatch};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};

use super::{ApiJson, Message, SearchParams, message, parse_id};
use crate::error::ApiError;
use crate::principal::Actor;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stock", post(create).get(list))
        .route("/stock/{id}", get(get_one).patch(update).delete(remove))
}

/// 请求体为入库行数组
async fn create(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    ApiJson(lines): ApiJson<Vec<StockLine>>,
) -> Result<Json<Message>, ApiError> {
    state
        .app
        .commands
        .dispatch(&ctx, CreateStock { lines })
        .await?;
    Ok(message("Stock created successfully!"))
}

async fn list(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Query(params): Query<SearchParams>,
) -> Result<Json<StockListDto>, ApiError> {
    let stock = state
        .app
        .queries
        .dispatch(
            &ctx,
            ListStock {
                search: params.search,
            },
        )
        .await?;
    Ok(Json(stock))
}

async fn get_one(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
) -> Result<Json<StockDto>, ApiError> {
    let stock = state
        .app
        .queries
        .dispatch(&ctx, GetStock { id: parse_id(&id)? })
        .await?;
    Ok(Json(stock))
}

async fn update(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<StockPatch>,
) -> Result<Json<Message>, ApiError> {
    let id = parse_id(&id)?;
    state
        .app
        .commands
        .dispatch(&ctx, UpdateStock { id, patch })
        .await?;
    Ok(message("Stock updated successfully!"))
}

async fn remove(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    state
        .app
        .commands
        .dispatch(&ctx, RemoveStock { id: parse_id(&id)? })
        .await?;
    Ok(message("Stock deleted successfully!"))
}
