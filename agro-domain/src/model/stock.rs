use super::patch_field;
use crate::record::{RecordHeader, RecordId};
use agro_macros::record;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 库存行；不带编码，通过序列号识别
#[record(kind = "stock", search = [serial_number, kind])]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub serial_number: String,
    pub machine: RecordId,
    pub meter: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// 批量入库的一行，`machine` 为机器编号（machine number）
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(on(String, into))]
pub struct StockLine {
    pub serial_number: String,
    pub machine: String,
    pub meter: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// 库存部分更新；`machine` 为机器编号
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPatch {
    pub serial_number: Option<String>,
    pub machine: Option<String>,
    pub meter: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl Stock {
    /// 由已解析出机器标识的入库行创建
    pub fn from_line(header: RecordHeader, line: StockLine, machine: RecordId) -> Self {
        Self {
            id: header.id,
            owner: header.owner,
            audit: header.audit,
            serial_number: line.serial_number,
            machine,
            meter: line.meter,
            kind: line.kind,
        }
    }

    /// 应用除机器引用以外的字段；机器编号需先解析为标识
    pub fn apply_patch(&mut self, patch: StockPatch, machine: Option<RecordId>) {
        patch_field(&mut self.serial_number, patch.serial_number);
        patch_field(&mut self.meter, patch.meter);
        patch_field(&mut self.kind, patch.kind);
        patch_field(&mut self.machine, machine);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_line_uses_type_on_the_wire() {
        let line: StockLine = serde_json::from_str(
            r#"{"serialNumber":"SN-1","machine":"M-7","meter":12.5,"type":"roll"}"#,
        )
        .unwrap();
        assert_eq!(line.kind, "roll");
        assert_eq!(line.machine, "M-7");

        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["type"], "roll");
        assert!(json.get("kind").is_none());
    }
}
