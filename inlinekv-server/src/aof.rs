//! # Append-Only File Writer
//!
//! Purpose: Durably record the raw request lines of mutating commands, so
//! a restart (even without replay, see the design notes) has a record of
//! what was asked of the store.
//!
//! ## Design Principles
//!
//! 1. **Verbatim Bytes**: the exact request line, terminator included, is
//!    written; the AOF never re-encodes or re-interprets a command.
//! 2. **Flush Per Request**: every append is flushed before the dispatcher
//!    is allowed to reply, not batched.
//! 3. **Own Critical Section**: append+flush is serialized independently of
//!    the store lock, so the store is never held across an await point.

use std::path::Path;

use inlinekv_common::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Verbs whose raw request line is mirrored to the AOF. INCR is
/// deliberately excluded even though it mutates the store, so replaying the
/// log reproduces it byte-for-byte without a counter entry muddying replay.
pub const WRITE_SET: [&str; 4] = ["SET", "DELETE", "FLUSH", "MSET"];

pub fn is_write_command(verb: &str) -> bool {
    WRITE_SET.contains(&verb)
}

/// Append-only durability log for mutating commands.
pub struct Aof {
    file: Mutex<File>,
}

impl Aof {
    /// Opens (creating if necessary) the AOF file for append. Failure here
    /// is fatal to the process, per the server-fault row of the error
    /// taxonomy.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .await?;
        Ok(Aof {
            file: Mutex::new(file),
        })
    }

    /// Appends `line` verbatim and flushes before returning.
    pub async fn append(&self, line: &[u8]) -> Result<(), Error> {
        let mut file = self.file.lock().await;
        file.write_all(line).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_set_matches_mutating_verbs() {
        assert!(is_write_command("SET"));
        assert!(is_write_command("DELETE"));
        assert!(is_write_command("FLUSH"));
        assert!(is_write_command("MSET"));
        assert!(!is_write_command("GET"));
        assert!(!is_write_command("INCR"));
        assert!(!is_write_command("MGET"));
        assert!(!is_write_command("DBSIZE"));
        assert!(!is_write_command("KEYS"));
    }

    #[tokio::test]
    async fn append_writes_verbatim_bytes() {
        let dir = std::env::temp_dir().join(format!("inlinekv-aof-test-{}", std::process::id()));
        let aof = Aof::open(&dir).await.unwrap();
        aof.append(b"SET name Gemini\n").await.unwrap();
        aof.append(b"DELETE city\n").await.unwrap();
        drop(aof);

        let contents = tokio::fs::read(&dir).await.unwrap();
        assert_eq!(contents, b"SET name Gemini\nDELETE city\n");
        let _ = tokio::fs::remove_file(&dir).await;
    }
}
