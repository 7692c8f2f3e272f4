use super::patch_field;
use crate::record::{MasterData, RecordHeader};
use crate::value_object::Code;
use agro_macros::record;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 工人（编码前缀 FAR）
#[record(
    kind = "worker",
    prefix = "FAR",
    search = [code, name, aadhar_no, phone, current_address, permanent_address, reference_name],
    unique = [phone]
)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub name: String,
    pub phone: String,
    pub aadhar_no: String,
    pub current_address: String,
    pub permanent_address: String,
    pub reference_name: String,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct WorkerDraft {
    pub name: String,
    pub phone: String,
    pub aadhar_no: String,
    pub current_address: String,
    pub permanent_address: String,
    pub reference_name: String,
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub aadhar_no: Option<String>,
    pub current_address: Option<String>,
    pub permanent_address: Option<String>,
    pub reference_name: Option<String>,
    pub status: Option<bool>,
    pub image: Option<String>,
}

impl MasterData for Worker {
    const COLLECTION: &'static str = "workers";
    const LABEL: &'static str = "Worker";

    type Draft = WorkerDraft;
    type Patch = WorkerPatch;
    type Status = bool;

    fn from_draft(header: RecordHeader, code: Code, draft: WorkerDraft) -> Self {
        Self {
            id: header.id,
            code,
            owner: header.owner,
            audit: header.audit,
            name: draft.name,
            phone: draft.phone,
            aadhar_no: draft.aadhar_no,
            current_address: draft.current_address,
            permanent_address: draft.permanent_address,
            reference_name: draft.reference_name,
            status: draft.status.unwrap_or(true),
            image: draft.image,
        }
    }

    fn apply_patch(&mut self, patch: WorkerPatch) {
        patch_field(&mut self.name, patch.name);
        patch_field(&mut self.phone, patch.phone);
        patch_field(&mut self.aadhar_no, patch.aadhar_no);
        patch_field(&mut self.current_address, patch.current_address);
        patch_field(&mut self.permanent_address, patch.permanent_address);
        patch_field(&mut self.reference_name, patch.reference_name);
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
