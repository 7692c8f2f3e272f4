//! 编码分配演示：按前缀为新记录分配编码，删除后不复用
//!
//! 运行：cargo run -p agro-domain --example code_allocation
//!
use agro_domain::code_allocator::CodeAllocator;
use agro_domain::model::{Agent, AgentDraft};
use agro_domain::persist::{InMemoryRecordRepository, InMemorySequenceStore, RecordRepository};
use agro_domain::record::{Coded, MasterData, OwnerId, Record, RecordHeader};
use anyhow::Result as AnyResult;
use std::sync::Arc;

#[tokio::main]
async fn main() -> AnyResult<()> {
    let allocator = CodeAllocator::new(Arc::new(InMemorySequenceStore::new()));
    let agents = Arc::new(InMemoryRecordRepository::<Agent>::new());
    let owner = OwnerId::new("demo-user".to_string());
    let prefix = Agent::prefix()?;

    let mut created = Vec::new();
    for (name, phone) in [("Ravi", "9000000001"), ("Meena", "9000000002"), ("Arjun", "9000000003")] {
        let draft = AgentDraft::builder().name(name).phone(phone).build();
        let agent = allocator
            .allocate_with_retry(&prefix, agents.as_ref(), |code| {
                let record = Agent::from_draft(RecordHeader::created_by(&owner), code, draft.clone());
                let repo = agents.clone();
                async move { repo.insert(record).await }
            })
            .await?;
        println!("created {} -> {}", agent.name, agent.code());
        created.push(agent);
    }

    if let Some(last) = created.last() {
        agents.remove(last.id()).await?;
        println!("removed {}", last.code());
    }

    let draft = AgentDraft::builder().name("Kiran").phone("9000000004").build();
    let agent = allocator
        .allocate_with_retry(&prefix, agents.as_ref(), |code| {
            let record = Agent::from_draft(RecordHeader::created_by(&owner), code, draft.clone());
            let repo = agents.clone();
            async move { repo.insert(record).await }
        })
        .await?;
    println!("created {} -> {} (previous code not reused)", agent.name, agent.code());

    Ok(())
}
