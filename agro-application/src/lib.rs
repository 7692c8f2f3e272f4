//! 应用层：命令/查询、处理器与总线，以及各业务用例
//!
pub mod app;
pub mod command;
pub mod command_bus;
pub mod command_handler;
pub mod context;
pub mod dashboard;
pub mod dto;
pub mod error;
pub mod goods;
pub mod inmemory_command_bus;
pub mod inmemory_query_bus;
pub mod master_data;
pub mod query;
pub mod query_bus;
pub mod query_handler;
pub mod stock;

pub use app::{AppOptions, Application, Stores};
pub use inmemory_command_bus::InMemoryCommandBus;
pub use inmemory_query_bus::InMemoryQueryBus;
