use agro_domain::model::{Buyer, Goods, GoodsStatus, Machine, Stock};
use agro_domain::record::{Coded, OwnerId, Record, RecordId};
use agro_domain::value_object::{Audit, Code};
use chrono::NaiveDate;
use serde::Serialize;

/// 数据传输对象（DTO）
///
/// - 作为应用层的输出载体，面向接口序列化友好；
/// - 保持只读特性与简洁结构，适配不同用例的返回需求。
pub trait Dto: Serialize + Send + Sync + 'static {}

/// 单条记录
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct RecordDto<R>(pub R);

impl<R: Record> Dto for RecordDto<R> {}

/// 记录列表
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct RecordListDto<R>(pub Vec<R>);

impl<R: Record> Dto for RecordListDto<R> {}

/// 库存视图：`machine` 展开为机器记录；机器已被删除时为 `null`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDto {
    pub id: RecordId,
    pub owner: OwnerId,
    pub serial_number: String,
    pub machine: Option<Machine>,
    pub meter: f64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub audit: Audit,
}

impl StockDto {
    pub fn new(stock: Stock, machine: Option<Machine>) -> Self {
        Self {
            id: stock.id().clone(),
            owner: stock.owner().clone(),
            audit: stock.audit().clone(),
            serial_number: stock.serial_number,
            machine,
            meter: stock.meter,
            kind: stock.kind,
        }
    }
}

impl Dto for StockDto {}

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct StockListDto(pub Vec<StockDto>);

impl Dto for StockListDto {}

/// 货物视图：`buyer` 展开为买家记录；买家已被删除时为 `null`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsDto {
    pub id: RecordId,
    pub code: Code,
    pub owner: OwnerId,
    pub product_name: String,
    pub quantity: String,
    pub weight: String,
    pub rate: String,
    pub gst_no: String,
    pub buyer: Option<Buyer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub status: GoodsStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl GoodsDto {
    pub fn new(goods: Goods, buyer: Option<Buyer>) -> Self {
        Self {
            id: goods.id().clone(),
            code: goods.code().clone(),
            owner: goods.owner().clone(),
            audit: goods.audit().clone(),
            product_name: goods.product_name,
            quantity: goods.quantity,
            weight: goods.weight,
            rate: goods.rate,
            gst_no: goods.gst_no,
            buyer,
            interest_rate: goods.interest_rate,
            due_date: goods.due_date,
            status: goods.status,
            image: goods.image,
        }
    }
}

impl Dto for GoodsDto {}

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct GoodsListDto(pub Vec<GoodsDto>);

impl Dto for GoodsListDto {}

/// 仪表盘计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCountsDto {
    pub agent_count: usize,
    pub buyer_count: usize,
    pub machine_count: usize,
    pub seller_count: usize,
    pub worker_count: usize,
}

impl Dto for DashboardCountsDto {}
