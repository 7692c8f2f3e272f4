//! 持久化（persist）
//!
//! 定义记录仓储与编码来源接口、按用户/检索词的查询过滤器，
//! 以及每个前缀一个计数器的序列存储：
//! - 记录读写与唯一约束（`RecordRepository`，内存实现 `InMemoryRecordRepository`）；
//! - 读取某前缀当前最大编码（`CodeSource`）；
//! - 原子推进的编码计数器（`SequenceStore`，内存实现与可选的 Postgres 实现）。
//!
mod in_memory;
mod record_filter;
mod record_repository;
pub mod sequence;

pub use in_memory::InMemoryRecordRepository;
pub use record_filter::{RecordFilter, Scope};
pub use record_repository::{CodeSource, MasterDataStore, RecordRepository};
pub use sequence::{InMemorySequenceStore, SequenceStore};

#[cfg(feature = "infra-sqlx")]
pub use sequence::PgSequenceStore;
