use agro_application::dashboard::DashboardCounts;
use agro_application::dto::DashboardCountsDto;
use agro_application::query_bus::QueryBus;
use axum::{Json, Router, extract::State, routing::get};

use crate::error::ApiError;
use crate::principal::Actor;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/counts", get(counts))
}

async fn counts(
    State(state): State<AppState>,
    Actor(ctx): Actor,
) -> Result<Json<DashboardCountsDto>, ApiError> {
    let counts = state.app.queries.dispatch(&ctx, DashboardCounts).await?;
    Ok(Json(counts))
}
