use crate::{command::Command, context::AppContext, error::AppError};
use async_trait::async_trait;

/// 命令处理器；一个处理器可为多种命令实现本 trait（如 `MasterDataHandler<R>`）
///
/// 返回 `AppError::Domain` 时由接口层映射为对应的 HTTP 状态。
#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError>;
}
