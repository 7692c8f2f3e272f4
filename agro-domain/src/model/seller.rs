use super::patch_field;
use crate::record::{MasterData, RecordHeader};
use crate::value_object::Code;
use agro_macros::record;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 卖家
#[record(
    kind = "seller",
    prefix = "SELL",
    search = [code, name, gst_no, phone, shop_address],
    unique = [phone, gst_no]
)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub name: String,
    pub phone: String,
    pub gst_no: String,
    pub shop_address: String,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct SellerDraft {
    pub name: String,
    pub phone: String,
    pub gst_no: String,
    #[serde(default)]
    #[builder(default)]
    pub shop_address: String,
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub gst_no: Option<String>,
    pub shop_address: Option<String>,
    pub status: Option<bool>,
    pub image: Option<String>,
}

impl MasterData for Seller {
    const COLLECTION: &'static str = "sellers";
    const LABEL: &'static str = "Seller";

    type Draft = SellerDraft;
    type Patch = SellerPatch;
    type Status = bool;

    fn from_draft(header: RecordHeader, code: Code, draft: SellerDraft) -> Self {
        Self {
            id: header.id,
            code,
            owner: header.owner,
            audit: header.audit,
            name: draft.name,
            phone: draft.phone,
            gst_no: draft.gst_no,
            shop_address: draft.shop_address,
            status: draft.status.unwrap_or(true),
            image: draft.image,
        }
    }

    fn apply_patch(&mut self, patch: SellerPatch) {
        patch_field(&mut self.name, patch.name);
        patch_field(&mut self.phone, patch.phone);
        patch_field(&mut self.gst_no, patch.gst_no);
        patch_field(&mut self.shop_address, patch.shop_address);
        patch_field(&mut self.status, patch.status);
        if patch.image.is_some() {
            self.image = patch.image;
        }
    }

    fn status(&self) -> &bool {
        &self.status
    }

    fn set_status(&mut self, status: bool) {
        self.status = status;
    }
}
