use super::patch_field;
use crate::record::{MasterData, RecordHeader};
use crate::value_object::Code;
use agro_macros::record;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 代理人
#[record(kind = "agent", prefix = "AGNT", search = [code, name, phone], unique = [phone])]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub name: String,
    pub phone: String,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct AgentDraft {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub status: Option<bool>,
    pub image: Option<String>,
}

impl MasterData for Agent {
    const COLLECTION: &'static str = "agents";
    const LABEL: &'static str = "Agent";

    type Draft = AgentDraft;
    type Patch = AgentPatch;
    type Status = bool;

    fn from_draft(header: RecordHeader, code: Code, draft: AgentDraft) -> Self {
        Self {
            id: header.id,
            code,
            owner: header.owner,
            audit: header.audit,
            name: draft.name,
            phone: draft.phone,
            status: draft.status.unwrap_or(true),
            image: draft.image,
        }
    }

    fn apply_patch(&mut self, patch: AgentPatch) {
        patch_field(&mut self.name, patch.name);
        patch_field(&mut self.phone, patch.phone);
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
