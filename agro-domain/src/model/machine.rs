use super::patch_field;
use crate::record::{MasterData, RecordHeader};
use crate::value_object::Code;
use agro_macros::record;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 机器；库存行通过 `machine_number` 引用
#[record(
    kind = "machine",
    prefix = "MCH",
    search = [code, machine_number, floor],
    unique = [machine_number]
)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub machine_number: String,
    pub floor: String,
    pub status: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct MachineDraft {
    pub machine_number: String,
    pub floor: String,
    #[serde(default)]
    pub status: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachinePatch {
    pub machine_number: Option<String>,
    pub floor: Option<String>,
    pub status: Option<bool>,
}

impl MasterData for Machine {
    const COLLECTION: &'static str = "machines";
    const LABEL: &'static str = "Machine";

    type Draft = MachineDraft;
    type Patch = MachinePatch;
    type Status = bool;

    fn from_draft(header: RecordHeader, code: Code, draft: MachineDraft) -> Self {
        Self {
            id: header.id,
            code,
            owner: header.owner,
            audit: header.audit,
            machine_number: draft.machine_number,
            floor: draft.floor,
            status: draft.status.unwrap_or(true),
        }
    }

    fn apply_patch(&mut self, patch: MachinePatch) {
        patch_field(&mut self.machine_number, patch.machine_number);
        patch_field(&mut self.floor, patch.floor);
        patch_field(&mut self.status, patch.status);
    }

    fn status(&self) -> &bool {
        &self.status
    }

    fn set_status(&mut self, status: bool) {
        self.status = status;
    }
}
