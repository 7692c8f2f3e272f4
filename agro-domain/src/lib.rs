//! 农贸业务领域层（agro-domain）
//!
//! 提供多租户主数据后台的领域模型与通用构件：
//! - 值对象（`value_object`）：编码前缀、人类可读编码、审计信息
//! - 记录抽象（`record`）与业务模型（`model`）：代理人、买家、卖家、工人、机器、货物、库存
//! - 编码分配器（`code_allocator`）：按前缀分配不重复、单调递增的编码
//! - 仓储与序列存储（`persist`）
//! - 规约（`specification`）与领域服务（`domain_service`）
//!
//! 本 crate 与传输层解耦；Postgres 序列存储通过 `infra-sqlx` 特性启用。
//!
//! 典型用法：
//! 1. 为每类记录准备一个 `RecordRepository`（例如 `InMemoryRecordRepository`）；
//! 2. 以 `SequenceStore` 构造一个共享的 `CodeAllocator`；
//! 3. 创建记录时调用 `allocate_with_retry`，在闭包中组装记录并写入仓储。
//!
pub mod code_allocator;
pub mod domain_service;
pub mod error;
pub mod model;
pub mod persist;
pub mod record;
pub mod specification;
pub mod value_object;

// 允许在本 crate 内部通过 ::agro_domain 进行自引用，
// 以便过程宏在本 crate 内也能解析到 ::agro_domain 路径。
extern crate self as agro_domain;
