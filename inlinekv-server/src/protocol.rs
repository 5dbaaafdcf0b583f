//! # Inline Protocol Codec
//!
//! Purpose: Parse inbound inline request lines and format outbound RESP
//! subset replies, with no I/O of its own so both directions are
//! unit-testable without a socket.
//!
//! ## Design Principles
//!
//! 1. **Inline, Not Multi-Bulk**: requests are a single whitespace-tokenized
//!    line, not length-prefixed arrays; only replies use RESP framing.
//! 2. **Byte Lengths, Not Char Counts**: bulk string length fields count
//!    bytes of the payload, and a stored value is never re-interpreted.
//! 3. **Verbatim Values**: the codec copies bytes in and out; it never
//!    validates or transforms argument or value content.

use bytes::{BufMut, Bytes, BytesMut};

/// A parsed inline request: an upper-cased verb plus its raw argument bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub verb: String,
    pub args: Vec<Bytes>,
}

/// Tokenizes one request line (already stripped of its trailing `\n`/`\r\n`)
/// on ASCII whitespace. Returns `None` for a line with no tokens at all
/// (e.g. a blank line), which callers should treat as a no-op.
pub fn parse_line(line: &[u8]) -> Option<Request> {
    let mut tokens = line
        .split(|&b| b == b' ' || b == b'\t')
        .filter(|t| !t.is_empty());
    let verb_bytes = tokens.next()?;
    let verb = String::from_utf8_lossy(verb_bytes).to_ascii_uppercase();
    let args = tokens.map(Bytes::copy_from_slice).collect();
    Some(Request { verb, args })
}

/// Strips a single trailing `\n`, and a preceding `\r` if present.
pub fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// A reply value in the RESP subset this server speaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `+<text>\r\n`
    Simple(&'static str),
    /// `-<text>\r\n`; `text` is everything after the leading `-`, including
    /// any `ERR `/`ERROR: ` prefix, since the two error kinds use different
    /// prefixes.
    Error(String),
    /// `:<decimal>\r\n`
    Integer(i64),
    /// `$<len>\r\n<bytes>\r\n`, or `$-1\r\n` for `None`.
    Bulk(Option<Bytes>),
    /// `*<count>\r\n` followed by each element's own encoding.
    Array(Vec<Reply>),
}

impl Reply {
    pub fn unknown_command() -> Reply {
        Reply::Error("ERR unknown command".to_string())
    }

    pub fn error(message: impl std::fmt::Display) -> Reply {
        Reply::Error(format!("ERROR: {message}"))
    }

    pub fn encode_into(&self, out: &mut BytesMut) {
        match self {
            Reply::Simple(text) => {
                out.put_u8(b'+');
                out.put_slice(text.as_bytes());
                out.put_slice(b"\r\n");
            }
            Reply::Error(text) => {
                out.put_u8(b'-');
                out.put_slice(text.as_bytes());
                out.put_slice(b"\r\n");
            }
            Reply::Integer(value) => {
                out.put_u8(b':');
                out.put_slice(value.to_string().as_bytes());
                out.put_slice(b"\r\n");
            }
            Reply::Bulk(None) => out.put_slice(b"$-1\r\n"),
            Reply::Bulk(Some(data)) => {
                out.put_u8(b'$');
                out.put_slice(data.len().to_string().as_bytes());
                out.put_slice(b"\r\n");
                out.put_slice(data);
                out.put_slice(b"\r\n");
            }
            Reply::Array(items) => {
                out.put_u8(b'*');
                out.put_slice(items.len().to_string().as_bytes());
                out.put_slice(b"\r\n");
                for item in items {
                    item.encode_into(out);
                }
            }
        }
    }

    pub fn encode(&self) -> BytesMut {
        let mut out = BytesMut::new();
        self.encode_into(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_verb_and_args() {
        let req = parse_line(b"SET name Gemini").unwrap();
        assert_eq!(req.verb, "SET");
        assert_eq!(req.args, vec![Bytes::from("name"), Bytes::from("Gemini")]);
    }

    #[test]
    fn uppercases_verb_only() {
        let req = parse_line(b"get MixedCaseKey").unwrap();
        assert_eq!(req.verb, "GET");
        assert_eq!(req.args, vec![Bytes::from("MixedCaseKey")]);
    }

    #[test]
    fn collapses_repeated_whitespace() {
        let req = parse_line(b"MGET  k1   k2").unwrap();
        assert_eq!(req.args, vec![Bytes::from("k1"), Bytes::from("k2")]);
    }

    #[test]
    fn blank_line_has_no_request() {
        assert!(parse_line(b"").is_none());
        assert!(parse_line(b"   ").is_none());
    }

    #[test]
    fn trims_crlf_and_lf() {
        assert_eq!(trim_line_ending(b"GET name\r\n"), b"GET name");
        assert_eq!(trim_line_ending(b"GET name\n"), b"GET name");
    }

    #[test]
    fn encodes_simple_string() {
        assert_eq!(&*Reply::Simple("OK").encode(), b"+OK\r\n");
    }

    #[test]
    fn encodes_bulk_string() {
        let reply = Reply::Bulk(Some(Bytes::from("Gemini")));
        assert_eq!(&*reply.encode(), b"$6\r\nGemini\r\n");
    }

    #[test]
    fn encodes_null_bulk() {
        assert_eq!(&*Reply::Bulk(None).encode(), b"$-1\r\n");
    }

    #[test]
    fn encodes_array_of_bulk_strings() {
        let reply = Reply::Array(vec![
            Reply::Bulk(Some(Bytes::from("value1"))),
            Reply::Bulk(Some(Bytes::from("value2"))),
        ]);
        assert_eq!(&*reply.encode(), b"*2\r\n$6\r\nvalue1\r\n$6\r\nvalue2\r\n");
    }

    #[test]
    fn encodes_empty_array() {
        assert_eq!(&*Reply::Array(vec![]).encode(), b"*0\r\n");
    }

    #[test]
    fn encodes_unknown_command_error() {
        assert_eq!(
            &*Reply::unknown_command().encode(),
            b"-ERR unknown command\r\n"
        );
    }

    #[test]
    fn encodes_generic_error() {
        let reply = Reply::error("Value is not an integer or out of range");
        assert_eq!(
            &*reply.encode(),
            b"-ERROR: Value is not an integer or out of range\r\n"
        );
    }
}
