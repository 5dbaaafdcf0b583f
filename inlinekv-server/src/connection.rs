//! # Connection Handler
//!
//! Purpose: Drive one accepted socket through the Open/Dispatching/Error/
//! Closed state machine: read a line, dispatch it, write the reply, repeat
//! until EOF or a terminating fault.
//!
//! ## Design Principles
//!
//! 1. **One Task Per Connection**: each accepted socket gets its own Tokio
//!    task; nothing here blocks another connection's progress.
//! 2. **Error Isolation**: a fault on this connection never touches another
//!    connection or the shared store beyond the store's own lock.
//! 3. **AOF Before Dispatch**: a write-set verb's raw line is mirrored to
//!    the AOF before its handler runs, matching the dispatcher contract
//!    even when the handler itself then rejects the request.

use std::net::SocketAddr;
use std::sync::Arc;

use inlinekv_engine::Db;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::aof::{is_write_command, Aof};
use crate::dispatch::dispatch;
use crate::protocol::{parse_line, trim_line_ending, Reply};

/// Runs the read/dispatch/reply loop for one connection until the peer
/// closes it, a read fails, or a handler fault requires termination.
pub async fn handle_connection(stream: TcpStream, peer: SocketAddr, db: Arc<Db>, aof: Arc<Aof>) {
    tracing::info!(%peer, "connection opened");

    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(%peer, %err, "connection read failed");
                break;
            }
        }

        let Some(request) = parse_line(trim_line_ending(&line)) else {
            continue;
        };

        if is_write_command(&request.verb) {
            if let Err(err) = aof.append(&line).await {
                tracing::error!(%peer, %err, "aof append failed");
                let _ = write_reply(&mut writer, &Reply::error(err)).await;
                break;
            }
        }

        let outcome = dispatch(&db, &request.verb, &request.args);
        if write_reply(&mut writer, &outcome.reply).await.is_err() {
            break;
        }

        if outcome.terminate {
            break;
        }
    }

    tracing::info!(%peer, "connection closed");
}

async fn write_reply(
    writer: &mut tokio::net::tcp::OwnedWriteHalf,
    reply: &Reply,
) -> std::io::Result<()> {
    let encoded = reply.encode();
    writer.write_all(&encoded).await?;
    writer.flush().await
}
