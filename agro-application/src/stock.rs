//! 库存用例：批量入库（校验机器编号）、更新、删除、列表与详情
//!
use crate::command::Command;
use crate::command_handler::CommandHandler;
use crate::context::AppContext;
use crate::dto::{StockDto, StockListDto};
use crate::error::AppError;
use crate::inmemory_command_bus::InMemoryCommandBus;
use crate::inmemory_query_bus::InMemoryQueryBus;
use crate::query::Query;
use crate::query_handler::QueryHandler;
use agro_domain::domain_service::{DomainService, StockReconciliation, StockReconciliationInput};
use agro_domain::error::DomainError;
use agro_domain::model::{Machine, Stock, StockLine, StockPatch};
use agro_domain::persist::{RecordFilter, RecordRepository};
use agro_domain::record::{OwnerId, Record, RecordHeader, RecordId};
use agro_domain::specification::Specification;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// 批量入库；任一行的机器编号不存在则整批不写
pub struct CreateStock {
    pub lines: Vec<StockLine>,
}

pub struct UpdateStock {
    pub id: RecordId,
    pub patch: StockPatch,
}

pub struct RemoveStock {
    pub id: RecordId,
}

pub struct ListStock {
    pub search: Option<String>,
}

pub struct GetStock {
    pub id: RecordId,
}

impl Command for CreateStock {
    const NAME: &'static str = "CreateStock";
}

impl Command for UpdateStock {
    const NAME: &'static str = "UpdateStock";
}

impl Command for RemoveStock {
    const NAME: &'static str = "RemoveStock";
}

impl Query for ListStock {
    const NAME: &'static str = "ListStock";
    type Dto = StockListDto;
}

impl Query for GetStock {
    const NAME: &'static str = "GetStock";
    type Dto = StockDto;
}

pub struct StockHandler {
    stock: Arc<dyn RecordRepository<Stock>>,
    machines: Arc<dyn RecordRepository<Machine>>,
    reconciliation: StockReconciliation,
}

impl StockHandler {
    pub fn new(
        stock: Arc<dyn RecordRepository<Stock>>,
        machines: Arc<dyn RecordRepository<Machine>>,
    ) -> Self {
        Self {
            stock,
            machines,
            reconciliation: StockReconciliation,
        }
    }

    pub fn register(
        self: Arc<Self>,
        commands: &InMemoryCommandBus,
        queries: &InMemoryQueryBus,
    ) -> Result<(), AppError> {
        commands.register::<CreateStock, _>(self.clone())?;
        commands.register::<UpdateStock, _>(self.clone())?;
        commands.register::<RemoveStock, _>(self.clone())?;
        queries.register::<ListStock, _>(self.clone())?;
        queries.register::<GetStock, _>(self)?;
        Ok(())
    }

    async fn machines_of(&self, owner: &OwnerId) -> Result<Vec<Machine>, AppError> {
        Ok(self
            .machines
            .list(&RecordFilter::owned_by(owner.clone()))
            .await?)
    }

    async fn load_visible(&self, ctx: &AppContext, id: &RecordId) -> Result<Stock, AppError> {
        match self.stock.find(id).await? {
            Some(stock) if ctx.principal.can_access(&stock) => Ok(stock),
            _ => Err(DomainError::not_found("Stock", id).into()),
        }
    }

    // 展开机器引用；同一机器只查询一次
    async fn populate(&self, stock: Vec<Stock>) -> Result<Vec<StockDto>, AppError> {
        let mut cache: HashMap<RecordId, Option<Machine>> = HashMap::new();
        let mut out = Vec::with_capacity(stock.len());
        for line in stock {
            let machine = match cache.get(&line.machine) {
                Some(m) => m.clone(),
                None => {
                    let m = self.machines.find(&line.machine).await?;
                    cache.insert(line.machine.clone(), m.clone());
                    m
                }
            };
            out.push(StockDto::new(line, machine));
        }
        Ok(out)
    }
}

#[async_trait]
impl CommandHandler<CreateStock> for StockHandler {
    async fn handle(&self, ctx: &AppContext, cmd: CreateStock) -> Result<(), AppError> {
        let owner = ctx.actor();
        let machines = self.machines_of(owner).await?;
        let resolved = self
            .reconciliation
            .execute(StockReconciliationInput {
                lines: cmd.lines,
                machines,
            })
            .await
            .inspect_err(|err| tracing::info!(%err, "stock batch rejected"))?;

        let batch: Vec<Stock> = resolved
            .into_iter()
            .map(|r| Stock::from_line(RecordHeader::created_by(owner), r.line, r.machine))
            .collect();
        let inserted = self.stock.insert_all(batch).await?;

        tracing::info!(count = inserted.len(), owner = %owner, "stock created");
        Ok(())
    }
}

#[async_trait]
impl CommandHandler<UpdateStock> for StockHandler {
    async fn handle(&self, ctx: &AppContext, cmd: UpdateStock) -> Result<(), AppError> {
        let mut stock = self.load_visible(ctx, &cmd.id).await?;

        // 机器编号在记录所属用户的机器中解析
        let machine = match cmd.patch.machine.as_deref() {
            Some(number) => {
                let machines = self.machines_of(stock.owner()).await?;
                let found = machines
                    .iter()
                    .find(|m| m.machine_number == number)
                    .map(|m| m.id().clone())
                    .ok_or_else(|| DomainError::NotFound {
                        reason: format!("Machine numbers {number} not found"),
                    })?;
                Some(found)
            }
            None => None,
        };

        stock.apply_patch(cmd.patch, machine);
        stock.audit_mut().touch(ctx.actor());
        self.stock.replace(stock).await?;

        tracing::info!(id = %cmd.id, "stock updated");
        Ok(())
    }
}

#[async_trait]
impl CommandHandler<RemoveStock> for StockHandler {
    async fn handle(&self, ctx: &AppContext, cmd: RemoveStock) -> Result<(), AppError> {
        let stock = self.load_visible(ctx, &cmd.id).await?;
        self.stock
            .remove(stock.id())
            .await?
            .ok_or_else(|| DomainError::not_found("Stock", &cmd.id))?;

        tracing::info!(id = %cmd.id, "stock removed");
        Ok(())
    }
}

#[async_trait]
impl QueryHandler<ListStock> for StockHandler {
    async fn handle(&self, ctx: &AppContext, q: ListStock) -> Result<StockListDto, AppError> {
        // 检索词还需匹配展开后的机器编号，因此先按范围取出再过滤
        let filter = RecordFilter::new(ctx.principal.scope()).with_search(q.search.as_deref());
        let stock = self
            .stock
            .list(&RecordFilter::new(filter.scope().clone()))
            .await?;
        let views = self.populate(stock).await?;

        let views = match filter.term() {
            None => views,
            Some(term) => views
                .into_iter()
                .filter(|v| {
                    term.matches_text(&v.serial_number)
                        || term.matches_text(&v.kind)
                        || v.machine.as_ref().is_some_and(|m| term.is_satisfied_by(m))
                })
                .collect(),
        };
        Ok(StockListDto(views))
    }
}

#[async_trait]
impl QueryHandler<GetStock> for StockHandler {
    async fn handle(&self, ctx: &AppContext, q: GetStock) -> Result<StockDto, AppError> {
        let stock = self.load_visible(ctx, &q.id).await?;
        let machine = self.machines.find(&stock.machine).await?;
        Ok(StockDto::new(stock, machine))
    }
}
