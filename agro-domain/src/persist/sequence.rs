//! 编码序列存储
//!
//! 每个前缀一个只增不减的计数器。`advance(prefix, floor)` 原子地把计数器设为
//! `max(counter, floor) + 1` 并返回新值，因此删除记录后编码也不会被复用。
//!
use crate::error::{DomainError, DomainResult};
use crate::value_object::Prefix;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

#[async_trait]
pub trait SequenceStore: Send + Sync {
    /// 原子推进并返回下一个序号
    async fn advance(&self, prefix: &Prefix, floor: u64) -> DomainResult<u64>;
}

#[async_trait]
impl<T> SequenceStore for Arc<T>
where
    T: SequenceStore + ?Sized,
{
    async fn advance(&self, prefix: &Prefix, floor: u64) -> DomainResult<u64> {
        (**self).advance(prefix, floor).await
    }
}

/// 内存序列存储，按前缀分片加锁
#[derive(Default)]
pub struct InMemorySequenceStore {
    counters: DashMap<Prefix, u64>,
}

impl InMemorySequenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SequenceStore for InMemorySequenceStore {
    async fn advance(&self, prefix: &Prefix, floor: u64) -> DomainResult<u64> {
        let mut counter = self.counters.entry(prefix.clone()).or_insert(0);
        let next = (*counter)
            .max(floor)
            .checked_add(1)
            .ok_or_else(|| DomainError::SequenceExhausted {
                prefix: prefix.to_string(),
            })?;
        *counter = next;
        Ok(next)
    }
}

/// Postgres 序列存储：`code_sequences` 表中每个前缀一行
#[cfg(feature = "infra-sqlx")]
pub struct PgSequenceStore {
    pool: sqlx::PgPool,
}

#[cfg(feature = "infra-sqlx")]
impl PgSequenceStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> DomainResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS code_sequences (
                prefix TEXT PRIMARY KEY,
                value  BIGINT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(feature = "infra-sqlx")]
#[async_trait]
impl SequenceStore for PgSequenceStore {
    async fn advance(&self, prefix: &Prefix, floor: u64) -> DomainResult<u64> {
        let exhausted = || DomainError::SequenceExhausted {
            prefix: prefix.to_string(),
        };
        let floor = i64::try_from(floor).map_err(|_| exhausted())?;

        let value: i64 = sqlx::query_scalar(
            "INSERT INTO code_sequences (prefix, value) VALUES ($1, $2 + 1)
             ON CONFLICT (prefix)
             DO UPDATE SET value = GREATEST(code_sequences.value, $2) + 1
             RETURNING value",
        )
        .bind(prefix.as_str())
        .bind(floor)
        .fetch_one(&self.pool)
        .await?;

        u64::try_from(value).map_err(|_| exhausted())
    }
}
