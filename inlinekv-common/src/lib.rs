// inlinekv-common - Shared error types for the inline KV protocol server

mod error;

pub use error::Error;

/// Convenience alias for results flowing through dispatch and the engine.
pub type Result<T> = std::result::Result<T, Error>;
