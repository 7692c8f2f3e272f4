use agro_application::command_bus::CommandBus;
use agro_application::context::AppContext;
use agro_application::dashboard::DashboardCounts;
use agro_application::master_data::{CreateRecord, ListRecords};
use agro_application::query_bus::QueryBus;
use agro_application::stock::{CreateStock, ListStock};
use agro_application::{AppOptions, Application};
use agro_domain::model::{Machine, MachineDraft, StockLine};
use agro_domain::record::Coded;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = Application::in_memory(AppOptions::default())?;
    let ctx = AppContext::for_user("demo-user");

    for number in ["M-1", "M-2"] {
        app.commands
            .dispatch(
                &ctx,
                CreateRecord::<Machine> {
                    draft: MachineDraft::builder()
                        .machine_number(number)
                        .floor("ground")
                        .build(),
                },
            )
            .await?;
    }

    let machines = app
        .queries
        .dispatch(&ctx, ListRecords::<Machine>::new(None))
        .await?;
    for m in &machines.0 {
        println!("machine {} -> {}", m.code(), m.machine_number);
    }

    app.commands
        .dispatch(
            &ctx,
            CreateStock {
                lines: vec![
                    StockLine::builder()
                        .serial_number("SN-1")
                        .machine("M-1")
                        .meter(120.0)
                        .kind("cotton")
                        .build(),
                    StockLine::builder()
                        .serial_number("SN-2")
                        .machine("M-2")
                        .meter(80.5)
                        .kind("silk")
                        .build(),
                ],
            },
        )
        .await?;

    // 未知机器编号：整批拒绝
    let rejected = app
        .commands
        .dispatch(
            &ctx,
            CreateStock {
                lines: vec![
                    StockLine::builder()
                        .serial_number("SN-3")
                        .machine("M-9")
                        .meter(1.0)
                        .kind("wool")
                        .build(),
                ],
            },
        )
        .await;
    if let Err(err) = rejected {
        println!("rejected: {err}");
    }

    let stock = app
        .queries
        .dispatch(&ctx, ListStock { search: Some("m-2".into()) })
        .await?;
    println!("{}", serde_json::to_string_pretty(&stock)?);

    let counts = app.queries.dispatch(&ctx, DashboardCounts).await?;
    println!("{}", serde_json::to_string(&counts)?);
    Ok(())
}
