//! 规约（Specification）
//!
//! 把记录筛选规则封装为可组合的对象：按所属用户（`OwnedBy`）、
//! 按检索词（`MatchesTerm`），并可用 AND 组合。
//!
use crate::record::{OwnerId, Record};

/// 规约模式的核心 trait
pub trait Specification<T>: Send + Sync {
    /// 检查候选对象是否满足规约
    fn is_satisfied_by(&self, candidate: &T) -> bool;

    /// 与另一个规约进行 AND 组合
    fn and<S>(self, other: S) -> AndSpecification<T>
    where
        Self: Sized + 'static,
        S: Specification<T> + 'static,
    {
        AndSpecification::new(Box::new(self), Box::new(other))
    }
}

pub type BoxSpecification<T> = Box<dyn Specification<T>>;

impl<T> Specification<T> for BoxSpecification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.as_ref().is_satisfied_by(candidate)
    }
}

/// AND 组合规约
pub struct AndSpecification<T> {
    left: BoxSpecification<T>,
    right: BoxSpecification<T>,
}

impl<T> AndSpecification<T> {
    pub fn new(left: BoxSpecification<T>, right: BoxSpecification<T>) -> Self {
        Self { left, right }
    }
}

impl<T> Specification<T> for AndSpecification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.left.is_satisfied_by(candidate) && self.right.is_satisfied_by(candidate)
    }
}

/// 任意记录
pub struct AnyRecord;

impl<R: Record> Specification<R> for AnyRecord {
    fn is_satisfied_by(&self, _: &R) -> bool {
        true
    }
}

/// 属于指定用户的记录
pub struct OwnedBy(pub OwnerId);

impl<R: Record> Specification<R> for OwnedBy {
    fn is_satisfied_by(&self, candidate: &R) -> bool {
        candidate.owner() == &self.0
    }
}

/// 任一检索字段包含检索词（不区分大小写，按字面匹配）
#[derive(Debug, Clone)]
pub struct MatchesTerm {
    needle: String,
}

impl MatchesTerm {
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.to_lowercase(),
        }
    }

    pub fn matches_text(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.needle)
    }
}

impl<R: Record> Specification<R> for MatchesTerm {
    fn is_satisfied_by(&self, candidate: &R) -> bool {
        candidate
            .search_fields()
            .iter()
            .any(|field| self.matches_text(field))
    }
}
