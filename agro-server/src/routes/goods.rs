use agro_application::dto::{GoodsDto, GoodsListDto};
use agro_application::goods::{GetGoods, ListGoods};
use agro_application::query_bus::QueryBus;
use agro_domain::model::Goods;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use super::master_data::resource_routes;
use super::{SearchParams, parse_id};
use crate::error::ApiError;
use crate::principal::Actor;
use crate::state::AppState;

/// 货物路由：写操作同其他主数据，读操作展开买家
pub fn routes() -> Router<AppState> {
    resource_routes::<Goods>(get(list), get(get_one))
}

async fn list(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Query(params): Query<SearchParams>,
) -> Result<Json<GoodsListDto>, ApiError> {
    let goods = state
        .app
        .queries
        .dispatch(
            &ctx,
            ListGoods {
                search: params.search,
            },
        )
        .await?;
    Ok(Json(goods))
}

async fn get_one(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
) -> Result<Json<GoodsDto>, ApiError> {
    let goods = state
        .app
        .queries
        .dispatch(&ctx, GetGoods { id: parse_id(&id)? })
        .await?;
    Ok(Json(goods))
}
