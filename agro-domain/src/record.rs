//! 记录（Record）基础抽象
//!
//! 所有业务记录共享同一个头部结构：标识（`RecordId`）、所属用户（`OwnerId`）、
//! 审计信息（`Audit`），可编码的记录另有人类可读编码（`Code`）。
//! 头部由 `#[record]` 宏按结构注入，不依赖继承。
//!
use crate::error::DomainResult;
use crate::value_object::{Audit, Code, Prefix};
use agro_macros::entity_id;
use bon::Builder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// 记录标识（UUID v4）
#[entity_id]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// 所属用户标识，由上游认证网关给出，对本系统不透明
#[entity_id]
pub struct OwnerId(String);

impl OwnerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 持久化记录
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// 记录类型名（用于日志与错误信息）
    const KIND: &'static str;

    fn id(&self) -> &RecordId;

    fn owner(&self) -> &OwnerId;

    fn audit(&self) -> &Audit;

    fn audit_mut(&mut self) -> &mut Audit;

    /// 参与文本检索的字段值
    fn search_fields(&self) -> Vec<String>;

    /// 存储层唯一约束字段 (字段名, 值)
    fn unique_fields(&self) -> Vec<(&'static str, String)>;
}

/// 带有人类可读编码的记录
pub trait Coded: Record {
    const PREFIX: &'static str;

    fn code(&self) -> &Code;

    fn prefix() -> DomainResult<Prefix> {
        Prefix::new(Self::PREFIX)
    }
}

/// 新建记录的头部
#[derive(Debug, Clone, Builder)]
pub struct RecordHeader {
    #[builder(default = RecordId::generate())]
    pub id: RecordId,
    pub owner: OwnerId,
    pub audit: Audit,
}

impl RecordHeader {
    /// 以 `owner` 身份新建
    pub fn created_by(owner: &OwnerId) -> Self {
        Self::builder()
            .owner(owner.clone())
            .audit(Audit::created(owner))
            .build()
    }
}

/// 主数据：有编码、可按集合暴露、可部分更新并可切换状态的记录
pub trait MasterData: Coded {
    /// URL 集合名，例如 `agents`
    const COLLECTION: &'static str;

    /// 面向用户的名称，例如 `Agent`
    const LABEL: &'static str;

    /// 创建载荷
    type Draft: Clone + DeserializeOwned + Send + Sync + 'static;

    /// 部分更新载荷
    type Patch: DeserializeOwned + Send + Sync + 'static;

    /// 状态类型
    type Status: Clone + Serialize + DeserializeOwned + Send + Sync + 'static;

    fn from_draft(header: RecordHeader, code: Code, draft: Self::Draft) -> Self;

    fn apply_patch(&mut self, patch: Self::Patch);

    fn status(&self) -> &Self::Status;

    fn set_status(&mut self, status: Self::Status);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_display_and_parse() {
        let id = RecordId::generate();
        let parsed: RecordId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_header_created_by() {
        let owner = OwnerId::new("u-1".into());
        let a = RecordHeader::created_by(&owner);
        let b = RecordHeader::created_by(&owner);
        assert_ne!(a.id, b.id);
        assert_eq!(a.owner, owner);
        assert_eq!(a.audit.created_by, owner);
    }
}
