use agro_domain::code_allocator::CodeAllocator;
use agro_domain::error::{DomainError, DomainResult};
use agro_domain::model::{Agent, AgentDraft, Machine, MachineDraft};
use agro_domain::persist::{
    InMemoryRecordRepository, InMemorySequenceStore, RecordFilter, RecordRepository,
};
use agro_domain::record::{Coded, MasterData, OwnerId, Record, RecordHeader};
use agro_domain::value_object::Code;
use anyhow::Result as AnyResult;
use std::collections::HashSet;
use std::sync::Arc;

struct Fixture {
    allocator: CodeAllocator,
    agents: Arc<InMemoryRecordRepository<Agent>>,
    machines: Arc<InMemoryRecordRepository<Machine>>,
    owner: OwnerId,
}

impl Fixture {
    fn new() -> Self {
        Self {
            allocator: CodeAllocator::new(Arc::new(InMemorySequenceStore::new())),
            agents: Arc::new(InMemoryRecordRepository::new()),
            machines: Arc::new(InMemoryRecordRepository::new()),
            owner: OwnerId::new("u-1".to_string()),
        }
    }

    async fn create_agent(&self, phone: &str) -> DomainResult<Agent> {
        create_agent(&self.allocator, &self.agents, &self.owner, phone).await
    }

    async fn create_machine(&self, number: &str) -> DomainResult<Machine> {
        let prefix = Machine::prefix()?;
        let draft = MachineDraft::builder().machine_number(number).floor("G").build();
        self.allocator
            .allocate_with_retry(&prefix, self.machines.as_ref(), |code| {
                let record =
                    Machine::from_draft(RecordHeader::created_by(&self.owner), code, draft.clone());
                let repo = self.machines.clone();
                async move { repo.insert(record).await }
            })
            .await
    }
}

async fn create_agent(
    allocator: &CodeAllocator,
    repo: &Arc<InMemoryRecordRepository<Agent>>,
    owner: &OwnerId,
    phone: &str,
) -> DomainResult<Agent> {
    let prefix = Agent::prefix()?;
    let draft = AgentDraft::builder().name("Agent").phone(phone).build();
    allocator
        .allocate_with_retry(&prefix, repo.as_ref(), |code| {
            let record = Agent::from_draft(RecordHeader::created_by(owner), code, draft.clone());
            let repo = repo.clone();
            async move { repo.insert(record).await }
        })
        .await
}

#[tokio::test]
async fn first_code_for_empty_collection() -> AnyResult<()> {
    let fx = Fixture::new();
    let agent = fx.create_agent("9000000001").await?;
    assert_eq!(agent.code().to_string(), "AGNT001");
    Ok(())
}

#[tokio::test]
async fn next_code_follows_maximum_with_gaps() -> AnyResult<()> {
    let fx = Fixture::new();
    let prefix = Agent::prefix()?;
    for (n, phone) in [(1, "1"), (2, "2"), (5, "5")] {
        let draft = AgentDraft::builder().name("Legacy").phone(phone).build();
        let agent = Agent::from_draft(
            RecordHeader::created_by(&fx.owner),
            Code::new(prefix.clone(), n)?,
            draft,
        );
        fx.agents.insert(agent).await?;
    }

    let agent = fx.create_agent("6").await?;
    assert_eq!(agent.code().to_string(), "AGNT006");
    Ok(())
}

#[tokio::test]
async fn prefixes_do_not_interfere() -> AnyResult<()> {
    let fx = Fixture::new();
    for i in 0..3 {
        fx.create_agent(&format!("900000000{i}")).await?;
    }
    let machine = fx.create_machine("M-1").await?;
    assert_eq!(machine.code().to_string(), "MCH001");

    let agent = fx.create_agent("9000000009").await?;
    assert_eq!(agent.code().to_string(), "AGNT004");
    Ok(())
}

#[tokio::test]
async fn deleted_codes_are_never_reused() -> AnyResult<()> {
    let fx = Fixture::new();
    let mut last = None;
    for i in 1..=7 {
        last = Some(fx.create_agent(&format!("phone-{i}")).await?);
    }
    let seventh = last.ok_or_else(|| anyhow::anyhow!("no agent created"))?;
    assert_eq!(seventh.code().to_string(), "AGNT007");

    fx.agents.remove(seventh.id()).await?;

    let next = fx.create_agent("phone-8").await?;
    assert_eq!(next.code().to_string(), "AGNT008");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_distinct_codes() -> AnyResult<()> {
    let allocator = CodeAllocator::new(Arc::new(InMemorySequenceStore::new()));
    let repo = Arc::new(InMemoryRecordRepository::<Agent>::new());
    let owner = OwnerId::new("u-1".to_string());

    let mut handles = Vec::new();
    for i in 0..64 {
        let allocator = allocator.clone();
        let repo = repo.clone();
        let owner = owner.clone();
        handles.push(tokio::spawn(async move {
            create_agent(&allocator, &repo, &owner, &format!("phone-{i}")).await
        }));
    }

    let mut codes = HashSet::new();
    for handle in handles {
        let agent = handle.await??;
        assert!(codes.insert(agent.code().to_string()), "duplicate code");
    }

    assert_eq!(codes.len(), 64);
    assert_eq!(repo.count(&RecordFilter::all()).await?, 64);
    assert!(codes.contains("AGNT001"));
    assert!(codes.contains("AGNT064"));
    Ok(())
}

#[tokio::test]
async fn width_grows_past_three_digits() -> AnyResult<()> {
    let fx = Fixture::new();
    let prefix = Agent::prefix()?;
    let draft = AgentDraft::builder().name("Legacy").phone("999").build();
    fx.agents
        .insert(Agent::from_draft(
            RecordHeader::created_by(&fx.owner),
            Code::new(prefix, 999)?,
            draft,
        ))
        .await?;

    let agent = fx.create_agent("1000").await?;
    assert_eq!(agent.code().to_string(), "AGNT1000");
    Ok(())
}

#[tokio::test]
async fn duplicate_phone_is_a_conflict_not_a_retry() -> AnyResult<()> {
    let fx = Fixture::new();
    fx.create_agent("9000000001").await?;

    let err = fx.create_agent("9000000001").await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict { ref field, .. } if field == "phone"));

    // 失败的写入也消耗了一个序号
    let agent = fx.create_agent("9000000002").await?;
    assert_eq!(agent.code().to_string(), "AGNT003");
    Ok(())
}
