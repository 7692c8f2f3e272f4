//! 应用装配：创建仓储、编码分配器，并把全部处理器注册到总线
//!
use crate::dashboard::DashboardHandler;
use crate::error::AppError;
use crate::goods::GoodsHandler;
use crate::inmemory_command_bus::InMemoryCommandBus;
use crate::inmemory_query_bus::InMemoryQueryBus;
use crate::master_data::MasterDataHandler;
use crate::stock::StockHandler;
use agro_domain::code_allocator::CodeAllocator;
use agro_domain::model::{Agent, Buyer, Goods, Machine, Seller, Stock, Worker};
use agro_domain::persist::{
    InMemoryRecordRepository, InMemorySequenceStore, MasterDataStore, RecordRepository,
    SequenceStore,
};
use bon::Builder;
use std::sync::Arc;

/// 各类记录的存储
#[derive(Clone)]
pub struct Stores {
    pub agents: Arc<dyn MasterDataStore<Agent>>,
    pub buyers: Arc<dyn MasterDataStore<Buyer>>,
    pub sellers: Arc<dyn MasterDataStore<Seller>>,
    pub workers: Arc<dyn MasterDataStore<Worker>>,
    pub machines: Arc<dyn MasterDataStore<Machine>>,
    pub goods: Arc<dyn MasterDataStore<Goods>>,
    pub stock: Arc<dyn RecordRepository<Stock>>,
    pub sequences: Arc<dyn SequenceStore>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            agents: Arc::new(InMemoryRecordRepository::<Agent>::new()),
            buyers: Arc::new(InMemoryRecordRepository::<Buyer>::new()),
            sellers: Arc::new(InMemoryRecordRepository::<Seller>::new()),
            workers: Arc::new(InMemoryRecordRepository::<Worker>::new()),
            machines: Arc::new(InMemoryRecordRepository::<Machine>::new()),
            goods: Arc::new(InMemoryRecordRepository::<Goods>::new()),
            stock: Arc::new(InMemoryRecordRepository::<Stock>::new()),
            sequences: Arc::new(InMemorySequenceStore::new()),
        }
    }
}

/// 装配选项
#[derive(Debug, Clone, Builder)]
pub struct AppOptions {
    /// 编码冲突时最多尝试次数
    #[builder(default = agro_domain::code_allocator::DEFAULT_MAX_ATTEMPTS)]
    pub code_attempts: usize,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// 已装配的应用：命令总线与查询总线
#[derive(Clone)]
pub struct Application {
    pub commands: Arc<InMemoryCommandBus>,
    pub queries: Arc<InMemoryQueryBus>,
}

impl Application {
    pub fn new(stores: Stores, options: AppOptions) -> Result<Self, AppError> {
        let commands = InMemoryCommandBus::new();
        let queries = InMemoryQueryBus::new();
        let allocator =
            CodeAllocator::new(stores.sequences.clone()).with_max_attempts(options.code_attempts);

        Arc::new(MasterDataHandler::new(stores.agents.clone(), allocator.clone()))
            .register(&commands, &queries)?;
        Arc::new(MasterDataHandler::new(stores.buyers.clone(), allocator.clone()))
            .register(&commands, &queries)?;
        Arc::new(MasterDataHandler::new(stores.sellers.clone(), allocator.clone()))
            .register(&commands, &queries)?;
        Arc::new(MasterDataHandler::new(stores.workers.clone(), allocator.clone()))
            .register(&commands, &queries)?;
        Arc::new(MasterDataHandler::new(stores.machines.clone(), allocator.clone()))
            .register(&commands, &queries)?;
        Arc::new(MasterDataHandler::new(stores.goods.clone(), allocator))
            .register_commands(&commands)?;
        Arc::new(GoodsHandler::new(
            Arc::new(stores.goods.clone()),
            Arc::new(stores.buyers.clone()),
        ))
        .register(&queries)?;

        let machines: Arc<dyn RecordRepository<Machine>> = Arc::new(stores.machines.clone());
        Arc::new(StockHandler::new(stores.stock.clone(), machines.clone()))
            .register(&commands, &queries)?;

        Arc::new(DashboardHandler::new(
            Arc::new(stores.agents.clone()),
            Arc::new(stores.buyers.clone()),
            machines,
            Arc::new(stores.sellers.clone()),
            Arc::new(stores.workers.clone()),
        ))
        .register(&queries)?;

        tracing::info!(
            commands = commands.registered_commands().len(),
            queries = queries.registered_queries().len(),
            "application assembled"
        );

        Ok(Self {
            commands: Arc::new(commands),
            queries: Arc::new(queries),
        })
    }

    /// 全内存存储的应用
    pub fn in_memory(options: AppOptions) -> Result<Self, AppError> {
        Self::new(Stores::in_memory(), options)
    }
}
