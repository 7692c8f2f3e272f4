//! 主数据用例：创建（自动分配编码）、部分更新、删除、切换状态、列表与详情
//!
//! 同一套命令/查询对所有 `MasterData` 记录通用，每类记录注册一个 `MasterDataHandler<R>`。
//!
use crate::command::Command;
use crate::command_handler::CommandHandler;
use crate::context::AppContext;
use crate::dto::{RecordDto, RecordListDto};
use crate::error::AppError;
use crate::inmemory_command_bus::InMemoryCommandBus;
use crate::inmemory_query_bus::InMemoryQueryBus;
use crate::query::Query;
use crate::query_handler::QueryHandler;
use agro_domain::code_allocator::CodeAllocator;
use agro_domain::error::DomainError;
use agro_domain::persist::{MasterDataStore, RecordFilter};
use agro_domain::record::{MasterData, RecordHeader, RecordId};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

/// 创建记录，编码由系统分配
pub struct CreateRecord<R: MasterData> {
    pub draft: R::Draft,
}

/// 部分更新；编码与归属不可修改
pub struct UpdateRecord<R: MasterData> {
    pub id: RecordId,
    pub patch: R::Patch,
}

pub struct RemoveRecord<R: MasterData> {
    pub id: RecordId,
    _marker: PhantomData<fn() -> R>,
}

pub struct ChangeStatus<R: MasterData> {
    pub id: RecordId,
    pub status: R::Status,
}

/// 列表：普通用户仅见自己的记录，超级管理员可见全部
pub struct ListRecords<R: MasterData> {
    pub search: Option<String>,
    _marker: PhantomData<fn() -> R>,
}

impl<R: MasterData> ListRecords<R> {
    pub fn new(search: Option<String>) -> Self {
        Self {
            search,
            _marker: PhantomData,
        }
    }
}

pub struct GetRecord<R: MasterData> {
    pub id: RecordId,
    _marker: PhantomData<fn() -> R>,
}

impl<R: MasterData> GetRecord<R> {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

impl<R: MasterData> RemoveRecord<R> {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

impl<R: MasterData> Command for CreateRecord<R> {
    const NAME: &'static str = "CreateRecord";
}

impl<R: MasterData> Command for UpdateRecord<R> {
    const NAME: &'static str = "UpdateRecord";
}

impl<R: MasterData> Command for RemoveRecord<R> {
    const NAME: &'static str = "RemoveRecord";
}

impl<R: MasterData> Command for ChangeStatus<R> {
    const NAME: &'static str = "ChangeStatus";
}

impl<R: MasterData> Query for ListRecords<R> {
    const NAME: &'static str = "ListRecords";
    type Dto = RecordListDto<R>;
}

impl<R: MasterData> Query for GetRecord<R> {
    const NAME: &'static str = "GetRecord";
    type Dto = RecordDto<R>;
}

/// 某一类主数据的全部命令与查询处理器
pub struct MasterDataHandler<R: MasterData> {
    store: Arc<dyn MasterDataStore<R>>,
    allocator: CodeAllocator,
}

impl<R: MasterData> MasterDataHandler<R> {
    pub fn new(store: Arc<dyn MasterDataStore<R>>, allocator: CodeAllocator) -> Self {
        Self { store, allocator }
    }

    /// 将本处理器注册到命令/查询总线
    pub fn register(
        self: Arc<Self>,
        commands: &InMemoryCommandBus,
        queries: &InMemoryQueryBus,
    ) -> Result<(), AppError> {
        self.clone().register_commands(commands)?;
        queries.register::<ListRecords<R>, _>(self.clone())?;
        queries.register::<GetRecord<R>, _>(self)?;
        Ok(())
    }

    /// 仅注册命令；查询需要展开引用的记录类型另有查询处理器
    pub fn register_commands(
        self: Arc<Self>,
        commands: &InMemoryCommandBus,
    ) -> Result<(), AppError> {
        commands.register::<CreateRecord<R>, _>(self.clone())?;
        commands.register::<UpdateRecord<R>, _>(self.clone())?;
        commands.register::<RemoveRecord<R>, _>(self.clone())?;
        commands.register::<ChangeStatus<R>, _>(self)?;
        Ok(())
    }

    // 其他用户的记录对普通用户表现为不存在
    async fn load_visible(&self, ctx: &AppContext, id: &RecordId) -> Result<R, AppError> {
        match self.store.find(id).await? {
            Some(record) if ctx.principal.can_access(&record) => Ok(record),
            _ => Err(DomainError::not_found(R::LABEL, id).into()),
        }
    }
}

#[async_trait]
impl<R: MasterData> CommandHandler<CreateRecord<R>> for MasterDataHandler<R> {
    async fn handle(&self, ctx: &AppContext, cmd: CreateRecord<R>) -> Result<(), AppError> {
        let prefix = R::prefix()?;
        let owner = ctx.actor();

        let record = self
            .allocator
            .allocate_with_retry(&prefix, self.store.as_ref(), |code| {
                let record = R::from_draft(RecordHeader::created_by(owner), code, cmd.draft.clone());
                let store = self.store.clone();
                async move { store.insert(record).await }
            })
            .await?;

        tracing::info!(kind = R::KIND, code = %record.code(), owner = %owner, "record created");
        Ok(())
    }
}

#[async_trait]
impl<R: MasterData> CommandHandler<UpdateRecord<R>> for MasterDataHandler<R> {
    async fn handle(&self, ctx: &AppContext, cmd: UpdateRecord<R>) -> Result<(), AppError> {
        let mut record = self.load_visible(ctx, &cmd.id).await?;
        record.apply_patch(cmd.patch);
        record.audit_mut().touch(ctx.actor());
        let record = self.store.replace(record).await?;

        tracing::info!(kind = R::KIND, code = %record.code(), "record updated");
        Ok(())
    }
}

#[async_trait]
impl<R: MasterData> CommandHandler<RemoveRecord<R>> for MasterDataHandler<R> {
    async fn handle(&self, ctx: &AppContext, cmd: RemoveRecord<R>) -> Result<(), AppError> {
        let record = self.load_visible(ctx, &cmd.id).await?;
        self.store
            .remove(record.id())
            .await?
            .ok_or_else(|| DomainError::not_found(R::LABEL, &cmd.id))?;

        tracing::info!(kind = R::KIND, code = %record.code(), "record removed");
        Ok(())
    }
}

#[async_trait]
impl<R: MasterData> CommandHandler<ChangeStatus<R>> for MasterDataHandler<R> {
    async fn handle(&self, ctx: &AppContext, cmd: ChangeStatus<R>) -> Result<(), AppError> {
        let mut record = self.load_visible(ctx, &cmd.id).await?;
        record.set_status(cmd.status);
        record.audit_mut().touch(ctx.actor());
        let record = self.store.replace(record).await?;

        tracing::info!(kind = R::KIND, code = %record.code(), "record status changed");
        Ok(())
    }
}

#[async_trait]
impl<R: MasterData> QueryHandler<ListRecords<R>> for MasterDataHandler<R> {
    async fn handle(
        &self,
        ctx: &AppContext,
        q: ListRecords<R>,
    ) -> Result<RecordListDto<R>, AppError> {
        let filter = RecordFilter::new(ctx.principal.scope()).with_search(q.search.as_deref());
        let records = self.store.list(&filter).await?;
        Ok(RecordListDto(records))
    }
}

#[async_trait]
impl<R: MasterData> QueryHandler<GetRecord<R>> for MasterDataHandler<R> {
    async fn handle(&self, ctx: &AppContext, q: GetRecord<R>) -> Result<RecordDto<R>, AppError> {
        self.load_visible(ctx, &q.id).await.map(RecordDto)
    }
}
