//! 货物查询：列表与详情中展开买家引用
//!
//! 货物的写操作仍由 `MasterDataHandler<Goods>` 处理。
//!
use crate::context::AppContext;
use crate::dto::{GoodsDto, GoodsListDto};
use crate::error::AppError;
use crate::inmemory_query_bus::InMemoryQueryBus;
use crate::query::Query;
use crate::query_handler::QueryHandler;
use agro_domain::error::DomainError;
use agro_domain::model::{Buyer, Goods};
use agro_domain::persist::{RecordFilter, RecordRepository};
use agro_domain::record::RecordId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

pub struct ListGoods {
    pub search: Option<String>,
}

pub struct GetGoods {
    pub id: RecordId,
}

impl Query for ListGoods {
    const NAME: &'static str = "ListGoods";
    type Dto = GoodsListDto;
}

impl Query for GetGoods {
    const NAME: &'static str = "GetGoods";
    type Dto = GoodsDto;
}

pub struct GoodsHandler {
    goods: Arc<dyn RecordRepository<Goods>>,
    buyers: Arc<dyn RecordRepository<Buyer>>,
}

impl GoodsHandler {
    pub fn new(
        goods: Arc<dyn RecordRepository<Goods>>,
        buyers: Arc<dyn RecordRepository<Buyer>>,
    ) -> Self {
        Self { goods, buyers }
    }

    pub fn register(self: Arc<Self>, queries: &InMemoryQueryBus) -> Result<(), AppError> {
        queries.register::<ListGoods, _>(self.clone())?;
        queries.register::<GetGoods, _>(self)?;
        Ok(())
    }

    async fn load_visible(&self, ctx: &AppContext, id: &RecordId) -> Result<Goods, AppError> {
        match self.goods.find(id).await? {
            Some(goods) if ctx.principal.can_access(&goods) => Ok(goods),
            _ => Err(DomainError::not_found("Goods", id).into()),
        }
    }

    // 展开买家引用；同一买家只查询一次
    async fn populate(&self, goods: Vec<Goods>) -> Result<Vec<GoodsDto>, AppError> {
        let mut cache: HashMap<RecordId, Option<Buyer>> = HashMap::new();
        let mut out = Vec::with_capacity(goods.len());
        for item in goods {
            let buyer = match cache.get(&item.buyer) {
                Some(b) => b.clone(),
                None => {
                    let b = self.buyers.find(&item.buyer).await?;
                    cache.insert(item.buyer.clone(), b.clone());
                    b
                }
            };
            out.push(GoodsDto::new(item, buyer));
        }
        Ok(out)
    }
}

#[async_trait]
impl QueryHandler<ListGoods> for GoodsHandler {
    async fn handle(&self, ctx: &AppContext, q: ListGoods) -> Result<GoodsListDto, AppError> {
        let filter = RecordFilter::new(ctx.principal.scope()).with_search(q.search.as_deref());
        let goods = self.goods.list(&filter).await?;
        Ok(GoodsListDto(self.populate(goods).await?))
    }
}

#[async_trait]
impl QueryHandler<GetGoods> for GoodsHandler {
    async fn handle(&self, ctx: &AppContext, q: GetGoods) -> Result<GoodsDto, AppError> {
        let goods = self.load_visible(ctx, &q.id).await?;
        let buyer = self.buyers.find(&goods.buyer).await?;
        Ok(GoodsDto::new(goods, buyer))
    }
}
