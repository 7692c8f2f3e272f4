//! 业务记录模型
//!
//! 每种主数据一个模块：定义记录本身、创建载荷（Draft）与部分更新载荷（Patch）。
//!
mod agent;
mod buyer;
mod goods;
mod machine;
mod seller;
mod stock;
mod worker;

pub use agent::{Agent, AgentDraft, AgentPatch};
pub use buyer::{Buyer, BuyerDraft, BuyerPatch};
pub use goods::{Goods, GoodsDraft, GoodsPatch, GoodsStatus};
pub use machine::{Machine, MachineDraft, MachinePatch};
pub use seller::{Seller, SellerDraft, SellerPatch};
pub use stock::{Stock, StockLine, StockPatch};
pub use worker::{Worker, WorkerDraft, WorkerPatch};

/// 用 `Some` 的值覆盖字段
pub(crate) fn patch_field<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}
