use thiserror::Error;

/// Errors surfaced while dispatching or executing a single request.
///
/// Every variant's `Display` text is what the server writes back verbatim
/// after the `-ERROR: ` prefix (see the connection handler), so wording here
/// is part of the wire contract, not just diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// A handler received a number of arguments its shape does not accept.
    #[error("wrong number of arguments for '{0}'")]
    WrongArity(&'static str),

    /// INCR was invoked against a value that does not parse as an i64, or
    /// the increment would overflow i64.
    #[error("Value is not an integer or out of range")]
    NotAnInteger,

    /// The append-only file could not be opened or written to.
    #[error("aof error: {0}")]
    Aof(#[from] std::io::Error),
}
