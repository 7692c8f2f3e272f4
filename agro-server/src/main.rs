use agro_server::{Config, init_tracing, start_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load()?;
    start_server(config).await
}
