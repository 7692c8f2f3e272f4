use super::patch_field;
use crate::record::{MasterData, RecordHeader};
use crate::value_object::Code;
use agro_macros::record;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 买家
#[record(kind = "buyer", prefix = "BUYR", search = [code, name, phone, address], unique = [phone])]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct BuyerDraft {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    #[builder(default)]
    pub address: String,
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<bool>,
    pub image: Option<String>,
}

impl MasterData for Buyer {
    const COLLECTION: &'static str = "buyers";
    const LABEL: &'static str = "Buyer";

    type Draft = BuyerDraft;
    type Patch = BuyerPatch;
    type Status = bool;

    fn from_draft(header: RecordHeader, code: Code, draft: BuyerDraft) -> Self {
        Self {
            id: header.id,
            code,
            owner: header.owner,
            audit: header.audit,
            name: draft.name,
            phone: draft.phone,
            address: draft.address,
            status: draft.status.unwrap_or(true),
            image: draft.image,
        }
    }

    fn apply_patch(&mut self, patch: BuyerPatch) {
        patch_field(&mut self.name, patch.name);
        patch_field(&mut self.phone, patch.phone);
        patch_field(&mut self.address, patch.address);
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
