//! # Acceptor
//!
//! Purpose: Bind the listening socket and spawn an independent handler task
//! per accepted connection. Runs until the process is terminated; there is
//! no graceful shutdown.

use std::sync::Arc;

use inlinekv_common::Error;
use inlinekv_engine::Db;
use tokio::net::TcpListener;

use crate::aof::Aof;
use crate::connection::handle_connection;

/// Binds `addr` and serves connections forever, handing each one off to its
/// own task against the shared `db` and `aof`.
pub async fn run(addr: &str, db: Arc<Db>, aof: Arc<Aof>) -> Result<(), Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    serve(listener, db, aof).await
}

/// Serves connections forever on an already-bound listener. Split out from
/// [`run`] so tests can bind to an ephemeral port and learn its address
/// before the accept loop starts.
pub async fn serve(listener: TcpListener, db: Arc<Db>, aof: Arc<Aof>) -> Result<(), Error> {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(%err, "accept failed");
                continue;
            }
        };

        let db = Arc::clone(&db);
        let aof = Arc::clone(&aof);
        tokio::spawn(async move {
            handle_connection(stream, peer, db, aof).await;
        });
    }
}
