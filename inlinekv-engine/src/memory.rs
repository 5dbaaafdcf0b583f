//! # In-Memory Store
//!
//! The one storage backend this crate ships: a single coarse lock guarding
//! a value map and an expiry map, with lazy (read-time) TTL eviction.
//!
//! ## Design Principles
//!
//! 1. **One Critical Section**: `values` and `expiries` sit behind the same
//!    `Mutex`, so every public operation is indivisible end to end, as the
//!    concurrency model requires. This trades away shard-level parallelism
//!    for a correctness guarantee the workload does not need to give up.
//!    See the design notes for why sharding was dropped for this store.
//! 2. **Lazy Expiry**: a key past its deadline is evicted the next time it
//!    is observed by `get`, `mget`, or `incr`; `dbsize` and `keys` report the
//!    raw map, which may still include not-yet-observed expired entries.
//! 3. **Arc-backed Buffers**: keys and values are `Bytes`, so snapshots
//!    (`keys`, `mget`) clone cheaply.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bytes::Bytes;
use inlinekv_common::Error;
use parking_lot::Mutex;

use crate::engine::KvEngine;

struct State {
    values: HashMap<Bytes, Bytes>,
    expiries: HashMap<Bytes, Instant>,
}

impl State {
    fn new() -> Self {
        State {
            values: HashMap::new(),
            expiries: HashMap::new(),
        }
    }

    /// Evicts `key` if its deadline has passed. Returns `true` if the key
    /// is now absent (either evicted here or already missing).
    fn evict_if_expired(&mut self, key: &[u8], now: Instant) -> bool {
        match self.expiries.get(key) {
            Some(&deadline) if deadline <= now => {
                self.values.remove(key);
                self.expiries.remove(key);
                true
            }
            Some(_) => false,
            None => !self.values.contains_key(key),
        }
    }

    fn get_live(&mut self, key: &[u8], now: Instant) -> Option<Bytes> {
        if self.evict_if_expired(key, now) {
            return None;
        }
        self.values.get(key).cloned()
    }
}

/// In-memory, single-lock implementation of [`KvEngine`].
pub struct Db {
    state: Mutex<State>,
}

impl Default for Db {
    fn default() -> Self {
        Self::new()
    }
}

impl Db {
    pub fn new() -> Self {
        Db {
            state: Mutex::new(State::new()),
        }
    }
}

impl KvEngine for Db {
    fn set(&self, key: Bytes, value: Bytes, ttl: Option<Duration>) {
        let mut state = self.state.lock();
        state.values.insert(key.clone(), value);
        if let Some(ttl) = ttl {
            state.expiries.insert(key, Instant::now() + ttl);
        }
        // No `else` branch: SET without EX intentionally does not clear a
        // prior expiry, so a key re-set without EX can still expire under
        // its old deadline.
    }

    fn get(&self, key: &[u8]) -> Option<Bytes> {
        let mut state = self.state.lock();
        state.get_live(key, Instant::now())
    }

    fn delete(&self, key: &[u8]) -> bool {
        let mut state = self.state.lock();
        let removed = state.values.remove(key).is_some();
        state.expiries.remove(key);
        removed
    }

    fn flush(&self) {
        let mut state = self.state.lock();
        state.values.clear();
        state.expiries.clear();
    }

    fn mget(&self, keys: &[Bytes]) -> Vec<Option<Bytes>> {
        let mut state = self.state.lock();
        let now = Instant::now();
        keys.iter().map(|k| state.get_live(k, now)).collect()
    }

    fn mset(&self, pairs: &[(Bytes, Bytes)]) {
        let mut state = self.state.lock();
        for (key, value) in pairs {
            state.values.insert(key.clone(), value.clone());
        }
    }

    fn incr(&self, key: &[u8]) -> Result<i64, Error> {
        let mut state = self.state.lock();
        let now = Instant::now();
        let current = state.get_live(key, now);

        let current_value: i64 = match current {
            None => 0,
            Some(bytes) => std::str::from_utf8(&bytes)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or(Error::NotAnInteger)?,
        };

        let next = current_value.checked_add(1).ok_or(Error::NotAnInteger)?;
        state
            .values
            .insert(Bytes::copy_from_slice(key), Bytes::from(next.to_string()));
        Ok(next)
    }

    fn dbsize(&self) -> usize {
        self.state.lock().values.len()
    }

    fn keys(&self) -> Vec<Bytes> {
        self.state.lock().values.keys().cloned().collect()
    }
}
