//! # Server Configuration
//!
//! Purpose: Parse host/port/AOF-path overrides from the command line, so
//! the defaults match the standard `127.0.0.1:1234` bind and `server.aof`
//! log path when no flags are passed.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "inlinekv-server", about = "In-memory key-value store server")]
pub struct Config {
    /// Address to bind the listening socket to.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// TCP port to bind the listening socket to.
    #[arg(long, default_value_t = 1234)]
    pub port: u16,

    /// Path to the append-only command log.
    #[arg(long, default_value = "server.aof")]
    pub aof_path: String,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
