use super::patch_field;
use crate::record::{MasterData, RecordHeader, RecordId};
use crate::value_object::Code;
use agro_macros::{record, value_object};
use bon::Builder;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 货款状态
#[value_object]
pub enum GoodsStatus {
    #[default]
    Pending,
    Paid,
    #[serde(rename = "Over Due Date")]
    OverDueDate,
    #[serde(rename = "Paid (Over Due Date)")]
    PaidOverDueDate,
}

/// 货物，售予某个买家
#[record(
    kind = "goods",
    prefix = "GDS",
    search = [code, product_name, gst_no],
    unique = [gst_no]
)]
#[serde(rename_all = "camelCase")]
pub struct Goods {
    pub product_name: String,
    pub quantity: String,
    pub weight: String,
    pub rate: String,
    pub gst_no: String,
    pub buyer: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub status: GoodsStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct GoodsDraft {
    pub product_name: String,
    #[serde(default)]
    #[builder(default)]
    pub quantity: String,
    pub weight: String,
    pub rate: String,
    pub gst_no: String,
    pub buyer: RecordId,
    #[serde(default)]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<GoodsStatus>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsPatch {
    pub product_name: Option<String>,
    pub quantity: Option<String>,
    pub weight: Option<String>,
    pub rate: Option<String>,
    pub gst_no: Option<String>,
    pub buyer: Option<RecordId>,
    pub interest_rate: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<GoodsStatus>,
    pub image: Option<String>,
}

impl MasterData for Goods {
    const COLLECTION: &'static str = "goods";
    const LABEL: &'static str = "Goods";

    type Draft = GoodsDraft;
    type Patch = GoodsPatch;
    type Status = GoodsStatus;

    fn from_draft(header: RecordHeader, code: Code, draft: GoodsDraft) -> Self {
        Self {
            id: header.id,
            code,
            owner: header.owner,
            audit: header.audit,
            product_name: draft.product_name,
            quantity: draft.quantity,
            weight: draft.weight,
            rate: draft.rate,
            gst_no: draft.gst_no,
            buyer: draft.buyer,
            interest_rate: draft.interest_rate,
            due_date: draft.due_date,
            status: draft.status.unwrap_or_default(),
            image: draft.image,
        }
    }

    fn apply_patch(&mut self, patch: GoodsPatch) {
        patch_field(&mut self.product_name, patch.product_name);
        patch_field(&mut self.quantity, patch.quantity);
        patch_field(&mut self.weight, patch.weight);
        patch_field(&mut self.rate, patch.rate);
        patch_field(&mut self.gst_no, patch.gst_no);
        patch_field(&mut self.buyer, patch.buyer);
        patch_field(&mut self.status, patch.status);
        if patch.interest_rate.is_some() {
            self.interest_rate = patch.interest_rate;
        }
        if patch.due_date.is_some() {
            self.due_date = patch.due_date;
        }
        if patch.image.is_some() {
            self.image = patch.image;
        }
    }

    fn status(&self) -> &GoodsStatus {
        &self.status
    }

    fn set_status(&mut self, status: GoodsStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goods_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&GoodsStatus::OverDueDate).unwrap(),
            "\"Over Due Date\""
        );
        let s: GoodsStatus = serde_json::from_str("\"Paid (Over Due Date)\"").unwrap();
        assert_eq!(s, GoodsStatus::PaidOverDueDate);
        assert_eq!(GoodsStatus::default(), GoodsStatus::Pending);
        assert!(serde_json::from_str::<GoodsStatus>("\"Overdue\"").is_err());
    }

    #[test]
    fn test_goods_draft_from_wire() {
        let buyer = RecordId::generate();
        let draft: GoodsDraft = serde_json::from_value(serde_json::json!({
            "productName": "Cotton",
            "weight": "120kg",
            "rate": "55",
            "gstNo": "GST-1",
            "buyer": buyer.to_string(),
            "dueDate": "2024-12-31",
            "interestRate": 5.0
        }))
        .unwrap();
        assert_eq!(draft.buyer, buyer);
        assert!(draft.status.is_none());
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2024, 12, 31));
    }
}
