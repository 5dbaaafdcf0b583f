use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use inlinekv_engine::Db;
use inlinekv_server::{acceptor, Aof, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();

    let aof = match Aof::open(&config.aof_path).await {
        Ok(aof) => Arc::new(aof),
        Err(err) => {
            tracing::error!(%err, path = %config.aof_path, "failed to open AOF file");
            return ExitCode::FAILURE;
        }
    };

    let db = Arc::new(Db::new());
    let addr = config.bind_addr();

    if let Err(err) = acceptor::run(&addr, db, aof).await {
        tracing::error!(%err, %addr, "server failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
