//! 领域服务（Domain Service）
//!
//! 封装不属于单条记录的领域逻辑，以纯接口方式定义输入/输出与错误并支持异步执行。
//!
use crate::error::{DomainError, DomainResult};
use crate::model::{Machine, StockLine};
use crate::record::{Record, RecordId};
use async_trait::async_trait;
use std::collections::HashMap;

/// 领域服务：封装不属于单条记录的领域逻辑
#[async_trait]
pub trait DomainService: Send + Sync {
    type Input;
    type Output;
    type Error;

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 待对账的入库行与用户名下的机器
#[derive(Debug, Clone)]
pub struct StockReconciliationInput {
    pub lines: Vec<StockLine>,
    pub machines: Vec<Machine>,
}

/// 已解析出机器标识的入库行
#[derive(Debug, Clone)]
pub struct ResolvedStockLine {
    pub line: StockLine,
    pub machine: RecordId,
}

/// 库存对账：把每个入库行的机器编号解析为机器记录标识
///
/// 任一机器编号不存在时整体失败，错误中按首次出现顺序列出去重后的未知编号。
#[derive(Debug, Clone, Copy, Default)]
pub struct StockReconciliation;

impl StockReconciliation {
    pub fn reconcile(
        &self,
        lines: Vec<StockLine>,
        machines: &[Machine],
    ) -> DomainResult<Vec<ResolvedStockLine>> {
        let by_number: HashMap<&str, &RecordId> = machines
            .iter()
            .map(|m| (m.machine_number.as_str(), m.id()))
            .collect();

        let mut unknown: Vec<&str> = Vec::new();
        for line in &lines {
            let number = line.machine.as_str();
            if !by_number.contains_key(number) && !unknown.contains(&number) {
                unknown.push(number);
            }
        }
        if !unknown.is_empty() {
            return Err(DomainError::NotFound {
                reason: format!("Machine numbers {} not found", unknown.join(",")),
            });
        }

        Ok(lines
            .into_iter()
            .filter_map(|line| {
                let machine = by_number.get(line.machine.as_str()).map(|id| (*id).clone())?;
                Some(ResolvedStockLine { line, machine })
            })
            .collect())
    }
}

#[async_trait]
impl DomainService for StockReconciliation {
    type Input = StockReconciliationInput;
    type Output = Vec<ResolvedStockLine>;
    type Error = DomainError;

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
        self.reconcile(input.lines, &input.machines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MachineDraft;
    use crate::record::{Coded, MasterData, OwnerId, RecordHeader};
    use crate::value_object::Code;

    fn machine(n: u64, number: &str) -> Machine {
        let owner = OwnerId::new("u-1".into());
        Machine::from_draft(
            RecordHeader::created_by(&owner),
            Code::new(Machine::prefix().unwrap(), n).unwrap(),
            MachineDraft::builder().machine_number(number).floor("G").build(),
        )
    }

    fn line(serial: &str, machine: &str) -> StockLine {
        StockLine::builder()
            .serial_number(serial)
            .machine(machine)
            .meter(10.0)
            .kind("roll")
            .build()
    }

    #[tokio::test]
    async fn test_resolves_every_line() {
        let machines = vec![machine(1, "M-1"), machine(2, "M-2")];
        let out = StockReconciliation
            .execute(StockReconciliationInput {
                lines: vec![line("S1", "M-2"), line("S2", "M-1"), line("S3", "M-2")],
                machines: machines.clone(),
            })
            .await
            .unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(&out[0].machine, machines[1].id());
        assert_eq!(&out[1].machine, machines[0].id());
        assert_eq!(out[2].line.serial_number, "S3");
    }

    #[test]
    fn test_unknown_numbers_are_listed_once_in_first_seen_order() {
        let machines = vec![machine(1, "M-1")];
        let err = StockReconciliation
            .reconcile(
                vec![line("S1", "M-9"), line("S2", "M-1"), line("S3", "M-7"), line("S4", "M-9")],
                &machines,
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "not found: Machine numbers M-9,M-7 not found");
    }
}
