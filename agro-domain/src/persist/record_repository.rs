use crate::error::DomainResult;
use crate::persist::RecordFilter;
use crate::record::{Record, RecordId};
use crate::value_object::{Code, Prefix};
use async_trait::async_trait;
use std::sync::Arc;

/// 记录仓储
///
/// `insert`/`replace` 在任一唯一字段重复时返回 `DomainError::Conflict`。
#[async_trait]
pub trait RecordRepository<R>: Send + Sync
where
    R: Record,
{
    async fn insert(&self, record: R) -> DomainResult<R>;

    /// 原子批量写入：任一行冲突则全部不写
    async fn insert_all(&self, records: Vec<R>) -> DomainResult<Vec<R>>;

    async fn find(&self, id: &RecordId) -> DomainResult<Option<R>>;

    async fn list(&self, filter: &RecordFilter) -> DomainResult<Vec<R>>;

    async fn count(&self, filter: &RecordFilter) -> DomainResult<usize>;

    /// 按标识整体替换；记录不存在时返回 `NotFound`
    async fn replace(&self, record: R) -> DomainResult<R>;

    async fn remove(&self, id: &RecordId) -> DomainResult<Option<R>>;
}

#[async_trait]
impl<R, T> RecordRepository<R> for Arc<T>
where
    R: Record,
    T: RecordRepository<R> + ?Sized,
{
    async fn insert(&self, record: R) -> DomainResult<R> {
        (**self).insert(record).await
    }

    async fn insert_all(&self, records: Vec<R>) -> DomainResult<Vec<R>> {
        (**self).insert_all(records).await
    }

    async fn find(&self, id: &RecordId) -> DomainResult<Option<R>> {
        (**self).find(id).await
    }

    async fn list(&self, filter: &RecordFilter) -> DomainResult<Vec<R>> {
        (**self).list(filter).await
    }

    async fn count(&self, filter: &RecordFilter) -> DomainResult<usize> {
        (**self).count(filter).await
    }

    async fn replace(&self, record: R) -> DomainResult<R> {
        (**self).replace(record).await
    }

    async fn remove(&self, id: &RecordId) -> DomainResult<Option<R>> {
        (**self).remove(id).await
    }
}

/// 编码来源：读取某前缀下当前最大的编码
///
/// 比较按解析后的数值进行，不按字符串。
#[async_trait]
pub trait CodeSource: Send + Sync {
    async fn highest_code(&self, prefix: &Prefix) -> DomainResult<Option<Code>>;
}

#[async_trait]
impl<T> CodeSource for Arc<T>
where
    T: CodeSource + ?Sized,
{
    async fn highest_code(&self, prefix: &Prefix) -> DomainResult<Option<Code>> {
        (**self).highest_code(prefix).await
    }
}

/// 主数据存储：既能读写记录，也能提供编码来源
pub trait MasterDataStore<R: Record>: RecordRepository<R> + CodeSource {}

impl<R, T> MasterDataStore<R> for T
where
    R: Record,
    T: RecordRepository<R> + CodeSource,
{
}
