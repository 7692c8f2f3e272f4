use crate::error::{DomainError, DomainResult};
use crate::persist::{CodeSource, RecordFilter, RecordRepository};
use crate::record::{Coded, Record, RecordId};
use crate::specification::Specification;
use crate::value_object::{Code, Prefix};
use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};

/// 内存记录仓储
///
/// 保持写入顺序；唯一约束检查与写入在同一把写锁内完成。
pub struct InMemoryRecordRepository<R> {
    records: RwLock<Vec<R>>,
}

impl<R> Default for InMemoryRecordRepository<R> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<R: Record> InMemoryRecordRepository<R> {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> DomainError {
    DomainError::Repository {
        reason: "in-memory store lock poisoned".to_string(),
    }
}

// 与 `existing` 中（除自身外）任一记录的唯一字段重复
fn check_unique<R: Record>(existing: &[R], candidate: &R) -> DomainResult<()> {
    for (field, value) in candidate.unique_fields() {
        let taken = existing
            .iter()
            .filter(|r| r.id() != candidate.id())
            .any(|r| r.unique_fields().iter().any(|(f, v)| *f == field && *v == value));
        if taken {
            return Err(DomainError::Conflict {
                field: field.to_string(),
                value,
            });
        }
    }
    Ok(())
}

#[async_trait]
impl<R: Record> RecordRepository<R> for InMemoryRecordRepository<R> {
    async fn insert(&self, record: R) -> DomainResult<R> {
        let mut records = self.records.write().map_err(poisoned)?;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(DomainError::Conflict {
                field: "id".to_string(),
                value: record.id().to_string(),
            });
        }
        check_unique(&records, &record)?;
        records.push(record.clone());
        Ok(record)
    }

    async fn insert_all(&self, batch: Vec<R>) -> DomainResult<Vec<R>> {
        let mut records = self.records.write().map_err(poisoned)?;
        let mut staged: Vec<R> = records.clone();
        for record in &batch {
            if staged.iter().any(|r| r.id() == record.id()) {
                return Err(DomainError::Conflict {
                    field: "id".to_string(),
                    value: record.id().to_string(),
                });
            }
            check_unique(&staged, record)?;
            staged.push(record.clone());
        }
        *records = staged;
        Ok(batch)
    }

    async fn find(&self, id: &RecordId) -> DomainResult<Option<R>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn list(&self, filter: &RecordFilter) -> DomainResult<Vec<R>> {
        let spec = filter.to_specification::<R>();
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .filter(|r| spec.is_satisfied_by(r))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &RecordFilter) -> DomainResult<usize> {
        let spec = filter.to_specification::<R>();
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.iter().filter(|r| spec.is_satisfied_by(r)).count())
    }

    async fn replace(&self, record: R) -> DomainResult<R> {
        let mut records = self.records.write().map_err(poisoned)?;
        let Some(pos) = records.iter().position(|r| r.id() == record.id()) else {
            return Err(DomainError::not_found(R::KIND, record.id()));
        };
        check_unique(&records, &record)?;
        records[pos] = record.clone();
        Ok(record)
    }

    async fn remove(&self, id: &RecordId) -> DomainResult<Option<R>> {
        let mut records = self.records.write().map_err(poisoned)?;
        let pos = records.iter().position(|r| r.id() == id);
        Ok(pos.map(|pos| records.remove(pos)))
    }
}

#[async_trait]
impl<R: Coded> CodeSource for InMemoryRecordRepository<R> {
    async fn highest_code(&self, prefix: &Prefix) -> DomainResult<Option<Code>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .map(|r| r.code())
            .filter(|c| c.prefix() == prefix)
            .max()
            .cloned())
    }
}
