//! # Storage Engine Trait
//!
//! Purpose: Decouple the dispatcher from the concrete storage
//! representation, the way the storage layer does for its own backends.
//!
//! ## Design Principles
//!
//! 1. **Strategy Pattern**: Callers depend on `KvEngine`, not on `Db`
//!    directly, so a different backend could be swapped in later without
//!    touching the dispatcher.
//! 2. **TTL Fast Path**: Expiration is checked on access; there is no
//!    background sweep requirement.
//! 3. **Byte-Oriented**: Keys and values are opaque `Bytes`; the engine never
//!    interprets them except for `incr`'s numeric parse.

use std::time::Duration;

use bytes::Bytes;
use inlinekv_common::Error;

/// Storage operations backing the command dispatcher.
///
/// Every method here corresponds 1:1 to a row in the Store operation table:
/// `set`, `get`, `delete`, `flush`, `mget`, `mset`, `incr`, `dbsize`, `keys`.
/// Implementations must make each call indivisible with respect to every
/// other call (see the concurrency model in the top-level design notes).
pub trait KvEngine: Send + Sync {
    /// Stores `value` under `key`, unconditionally overwriting any prior
    /// value. If `ttl` is `Some`, the key expires `ttl` from now; if `None`,
    /// any prior expiry is left as-is. A key re-set without a TTL can
    /// therefore still expire under its old deadline.
    fn set(&self, key: Bytes, value: Bytes, ttl: Option<Duration>);

    /// Fetches the current value for `key`, evicting it first if its TTL
    /// has passed. Returns `None` for a missing or just-expired key.
    fn get(&self, key: &[u8]) -> Option<Bytes>;

    /// Removes `key` from both maps. Returns `true` if a live entry was
    /// removed, `false` if the key was absent or already expired.
    fn delete(&self, key: &[u8]) -> bool;

    /// Empties the store entirely, clearing both the value and expiry maps.
    fn flush(&self);

    /// Resolves each key in `keys`, preserving position; expired or missing
    /// keys resolve to `None` at their original index.
    fn mget(&self, keys: &[Bytes]) -> Vec<Option<Bytes>>;

    /// Bulk-sets every pair with no TTL, as a single call.
    fn mset(&self, pairs: &[(Bytes, Bytes)]);

    /// Parses the current value as a signed 64-bit decimal integer
    /// (absent key is treated as `0`), adds one, and stores the decimal
    /// string back. Returns the new value on success. On a parse or
    /// overflow error the stored value is left untouched.
    fn incr(&self, key: &[u8]) -> Result<i64, Error>;

    /// Returns the number of entries currently in the value map, including
    /// any not-yet-evicted expired entries (this is the raw map length per
    /// spec, not a live count).
    fn dbsize(&self) -> usize;

    /// Returns a snapshot of all keys currently in the value map, in
    /// implementation-defined order, with the same raw-length caveat as
    /// `dbsize`.
    fn keys(&self) -> Vec<Bytes>;
}
