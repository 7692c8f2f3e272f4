//! 仪表盘计数
//!
use crate::context::AppContext;
use crate::dto::DashboardCountsDto;
use crate::error::AppError;
use crate::inmemory_query_bus::InMemoryQueryBus;
use crate::query::Query;
use crate::query_handler::QueryHandler;
use agro_domain::model::{Agent, Buyer, Machine, Seller, Worker};
use agro_domain::persist::{RecordFilter, RecordRepository};
use async_trait::async_trait;
use std::sync::Arc;

/// 当前用户名下各类记录数量；超级管理员同样只统计自己的记录
pub struct DashboardCounts;

impl Query for DashboardCounts {
    const NAME: &'static str = "DashboardCounts";
    type Dto = DashboardCountsDto;
}

pub struct DashboardHandler {
    agents: Arc<dyn RecordRepository<Agent>>,
    buyers: Arc<dyn RecordRepository<Buyer>>,
    machines: Arc<dyn RecordRepository<Machine>>,
    sellers: Arc<dyn RecordRepository<Seller>>,
    workers: Arc<dyn RecordRepository<Worker>>,
}

impl DashboardHandler {
    pub fn new(
        agents: Arc<dyn RecordRepository<Agent>>,
        buyers: Arc<dyn RecordRepository<Buyer>>,
        machines: Arc<dyn RecordRepository<Machine>>,
        sellers: Arc<dyn RecordRepository<Seller>>,
        workers: Arc<dyn RecordRepository<Worker>>,
    ) -> Self {
        Self {
            agents,
            buyers,
            machines,
            sellers,
            workers,
        }
    }

    pub fn register(self: Arc<Self>, queries: &InMemoryQueryBus) -> Result<(), AppError> {
        queries.register::<DashboardCounts, _>(self)
    }
}

#[async_trait]
impl QueryHandler<DashboardCounts> for DashboardHandler {
    async fn handle(
        &self,
        ctx: &AppContext,
        _q: DashboardCounts,
    ) -> Result<DashboardCountsDto, AppError> {
        let filter = RecordFilter::owned_by(ctx.actor().clone());
        let (agent_count, buyer_count, machine_count, seller_count, worker_count) = tokio::try_join!(
            self.agents.count(&filter),
            self.buyers.count(&filter),
            self.machines.count(&filter),
            self.sellers.count(&filter),
            self.workers.count(&filter),
        )?;

        Ok(DashboardCountsDto {
            agent_count,
            buyer_count,
            machine_count,
            seller_count,
            worker_count,
        })
    }
}
