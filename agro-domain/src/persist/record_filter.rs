use crate::record::{OwnerId, Record};
use crate::specification::{AnyRecord, BoxSpecification, MatchesTerm, OwnedBy, Specification};

/// 查询可见范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// 仅限某个用户的记录
    Owner(OwnerId),
    /// 全部记录（超级管理员）
    All,
}

/// 列表/计数查询条件
#[derive(Debug, Clone)]
pub struct RecordFilter {
    scope: Scope,
    term: Option<MatchesTerm>,
}

impl RecordFilter {
    pub fn new(scope: Scope) -> Self {
        Self { scope, term: None }
    }

    pub fn owned_by(owner: OwnerId) -> Self {
        Self::new(Scope::Owner(owner))
    }

    pub fn all() -> Self {
        Self::new(Scope::All)
    }

    /// 设置检索词；空白检索词视为未设置
    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.term = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(MatchesTerm::new);
        self
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn term(&self) -> Option<&MatchesTerm> {
        self.term.as_ref()
    }

    /// 组合为规约：范围 AND 检索词
    pub fn to_specification<R: Record>(&self) -> BoxSpecification<R> {
        let scope: BoxSpecification<R> = match &self.scope {
            Scope::Owner(owner) => Box::new(OwnedBy(owner.clone())),
            Scope::All => Box::new(AnyRecord),
        };
        match &self.term {
            Some(term) => Box::new(scope.and(term.clone())),
            None => scope,
        }
    }
}
