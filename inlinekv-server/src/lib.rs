//! Protocol codec, AOF writer, dispatcher, connection handler, and acceptor
//! for the inline-protocol key-value store.

pub mod acceptor;
pub mod aof;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod protocol;

pub use aof::Aof;
pub use config::Config;
