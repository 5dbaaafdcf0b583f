//! # Command Dispatcher
//!
//! Purpose: Map a verb to its handler, validate arity, execute it against
//! the store, and produce a reply. Everything here is synchronous, since
//! handlers only ever touch in-memory maps.
//!
//! ## Design Principles
//!
//! 1. **Small Table, Linear Scan**: nine verbs is too small a table to
//!    justify a `HashMap`; a linear scan over a static array is both the
//!    simplest and the fastest option at this size.
//! 2. **Typed Arity Errors**: a wrong argument count is a value
//!    (`Error::WrongArity`), not a panic, so the caller decides how to
//!    surface it.
//! 3. **INCR Is Not a Handler Fault**: its type error is recoverable by the
//!    connection (see `is_recoverable`), unlike every other dispatch error.

use std::time::Duration;

use bytes::Bytes;
use inlinekv_common::Error;
use inlinekv_engine::{Db, KvEngine};

use crate::protocol::Reply;

type Handler = fn(&Db, &[Bytes]) -> Result<Reply, Error>;

const TABLE: &[(&str, Handler)] = &[
    ("SET", handle_set),
    ("GET", handle_get),
    ("DELETE", handle_delete),
    ("FLUSH", handle_flush),
    ("MGET", handle_mget),
    ("MSET", handle_mset),
    ("INCR", handle_incr),
    ("DBSIZE", handle_dbsize),
    ("KEYS", handle_keys),
];

/// Looks up the handler for `verb` (already upper-cased by the codec).
fn lookup(verb: &str) -> Option<Handler> {
    TABLE.iter().find(|(name, _)| *name == verb).map(|(_, f)| *f)
}

/// Outcome of one dispatch: the reply to send, and whether the connection
/// must close after sending it.
pub struct Outcome {
    pub reply: Reply,
    pub terminate: bool,
}

/// Runs the handler for `verb` against `db` and turns its outcome into a
/// reply. `terminate` is `true` exactly when the connection must be closed
/// after this reply is written (every handler fault except INCR's type
/// error, per the error taxonomy).
pub fn dispatch(db: &Db, verb: &str, args: &[Bytes]) -> Outcome {
    let Some(handler) = lookup(verb) else {
        return Outcome {
            reply: Reply::unknown_command(),
            terminate: false,
        };
    };

    match handler(db, args) {
        Ok(reply) => Outcome {
            reply,
            terminate: false,
        },
        Err(err) => Outcome {
            terminate: !is_recoverable(&err),
            reply: Reply::error(err),
        },
    }
}

/// INCR's numeric type error continues the connection; every other
/// dispatch-time error (arity mismatches, AOF faults surfaced this way)
/// terminates it, per the error taxonomy.
fn is_recoverable(err: &Error) -> bool {
    matches!(err, Error::NotAnInteger)
}

fn handle_set(db: &Db, args: &[Bytes]) -> Result<Reply, Error> {
    if args.len() < 2 {
        return Err(Error::WrongArity("SET"));
    }
    let key = args[0].clone();
    let value = args[1].clone();

    let ttl = if args.len() >= 4 && args[2].eq_ignore_ascii_case(b"EX") {
        std::str::from_utf8(&args[3])
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
    } else {
        None
    };

    db.set(key, value, ttl);
    Ok(Reply::Simple("OK"))
}

fn handle_get(db: &Db, args: &[Bytes]) -> Result<Reply, Error> {
    if args.len() != 1 {
        return Err(Error::WrongArity("GET"));
    }
    Ok(Reply::Bulk(db.get(&args[0])))
}

fn handle_delete(db: &Db, args: &[Bytes]) -> Result<Reply, Error> {
    if args.len() != 1 {
        return Err(Error::WrongArity("DELETE"));
    }
    let removed = db.delete(&args[0]);
    Ok(Reply::Integer(if removed { 1 } else { 0 }))
}

fn handle_flush(db: &Db, args: &[Bytes]) -> Result<Reply, Error> {
    if !args.is_empty() {
        return Err(Error::WrongArity("FLUSH"));
    }
    db.flush();
    Ok(Reply::Simple("OK"))
}

fn handle_mget(db: &Db, args: &[Bytes]) -> Result<Reply, Error> {
    let values = db.mget(args);
    Ok(Reply::Array(values.into_iter().map(Reply::Bulk).collect()))
}

fn handle_mset(db: &Db, args: &[Bytes]) -> Result<Reply, Error> {
    let mut pairs = Vec::with_capacity(args.len() / 2);
    let mut chunks = args.chunks_exact(2);
    for chunk in &mut chunks {
        pairs.push((chunk[0].clone(), chunk[1].clone()));
    }
    db.mset(&pairs);
    Ok(Reply::Simple("OK"))
}

fn handle_incr(db: &Db, args: &[Bytes]) -> Result<Reply, Error> {
    if args.len() != 1 {
        return Err(Error::WrongArity("INCR"));
    }
    db.incr(&args[0]).map(Reply::Integer)
}

fn handle_dbsize(db: &Db, args: &[Bytes]) -> Result<Reply, Error> {
    if !args.is_empty() {
        return Err(Error::WrongArity("DBSIZE"));
    }
    Ok(Reply::Integer(db.dbsize() as i64))
}

fn handle_keys(db: &Db, args: &[Bytes]) -> Result<Reply, Error> {
    if !args.is_empty() {
        return Err(Error::WrongArity("KEYS"));
    }
    let keys = db.keys();
    Ok(Reply::Array(
        keys.into_iter().map(|k| Reply::Bulk(Some(k))).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(s: &str) -> Bytes {
        Bytes::copy_from_slice(s.as_bytes())
    }

    #[test]
    fn unknown_verb_is_reported_without_terminating() {
        let db = Db::new();
        let outcome = dispatch(&db, "NOPE", &[]);
        assert_eq!(outcome.reply, Reply::unknown_command());
        assert!(!outcome.terminate);
    }

    #[test]
    fn set_then_get_roundtrips() {
        let db = Db::new();
        dispatch(&db, "SET", &[b("name"), b("Gemini")]);
        let outcome = dispatch(&db, "GET", &[b("name")]);
        assert_eq!(outcome.reply, Reply::Bulk(Some(b("Gemini"))));
    }

    #[test]
    fn set_with_non_integer_ex_is_ignored_but_still_stores() {
        let db = Db::new();
        let outcome = dispatch(&db, "SET", &[b("k"), b("v"), b("EX"), b("soon")]);
        assert_eq!(outcome.reply, Reply::Simple("OK"));
        assert_eq!(db.get(b"k"), Some(b("v")));
    }

    #[test]
    fn incr_type_error_does_not_terminate_connection() {
        let db = Db::new();
        db.set(b("mykey"), b("hello"), None);
        let outcome = dispatch(&db, "INCR", &[b("mykey")]);
        assert!(!outcome.terminate);
        assert_eq!(
            outcome.reply,
            Reply::error("Value is not an integer or out of range")
        );
    }

    #[test]
    fn wrong_arity_terminates_connection() {
        let db = Db::new();
        let outcome = dispatch(&db, "GET", &[b("too"), b("many")]);
        assert!(outcome.terminate);
    }

    #[test]
    fn mget_with_zero_keys_is_empty_array() {
        let db = Db::new();
        let outcome = dispatch(&db, "MGET", &[]);
        assert_eq!(outcome.reply, Reply::Array(vec![]));
    }
}
