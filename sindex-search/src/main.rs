use clap::Parser;
use eyre::Result;
use sindex_search::config::Config;
use sindex_search::server;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cfg = Config::parse();

    let listener = TcpListener::bind(&cfg.listen).await?;
    info!(
        "search server listening on {} (index root {})",
        cfg.listen,
        cfg.index_root.display()
    );
    server::serve(listener, cfg.index_root).await
}
