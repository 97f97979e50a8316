use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::frame::{DataType, CRLF};
use crate::store::Entry;

/// Tag carried by every error reply.
pub const ERR: &str = "ERR";

/// A reply to a single request. Numeric variants carry their wire text, so a value read back
/// from the store is echoed exactly as it was set.
#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    Simple(String),
    Error(String),
    Integer(String),
    Double(String),
    Boolean(bool),
    Null,
    Bulk(Bytes),
}

impl Response {
    pub fn ok() -> Response {
        Response::Simple("OK".to_string())
    }

    pub fn integer(value: i64) -> Response {
        Response::Integer(value.to_string())
    }

    /// Builds a simple error carrying the fixed `ERR` tag followed by `detail`.
    pub fn error(detail: impl fmt::Display) -> Response {
        Response::Error(format!("{} {}", ERR, detail))
    }

    pub fn serialize(&self) -> Bytes {
        let mut bytes = BytesMut::new();

        match self {
            Response::Simple(s) => {
                bytes.put_u8(u8::from(DataType::SimpleString));
                bytes.put_slice(s.as_bytes());
            }
            Response::Error(s) => {
                bytes.put_u8(u8::from(DataType::SimpleError));
                bytes.put_slice(s.as_bytes());
            }
            Response::Integer(raw) => {
                bytes.put_u8(u8::from(DataType::Integer));
                bytes.put_slice(raw.as_bytes());
            }
            Response::Double(raw) => {
                bytes.put_u8(u8::from(DataType::Double));
                bytes.put_slice(raw.as_bytes());
            }
            Response::Boolean(b) => {
                bytes.put_u8(u8::from(DataType::Boolean));
                bytes.put_u8(if *b { b't' } else { b'f' });
            }
            Response::Null => {
                bytes.put_u8(u8::from(DataType::Null));
            }
            // $<length>\r\n<data>\r\n
            Response::Bulk(data) => {
                bytes.reserve(data.len() + 16);
                bytes.put_u8(u8::from(DataType::BulkString));
                bytes.put_slice(data.len().to_string().as_bytes());
                bytes.put_slice(CRLF);
                bytes.put_slice(data);
            }
        }

        bytes.put_slice(CRLF);
        bytes.freeze()
    }
}

impl From<Entry> for Response {
    fn from(entry: Entry) -> Self {
        match entry {
            Entry::Integer { raw, .. } => Response::Integer(raw),
            Entry::Double { raw, .. } => Response::Double(raw),
            Entry::Boolean(b) => Response::Boolean(b),
            // A simple string cannot carry line breaks.
            Entry::String(s) if s.contains(['\r', '\n']) => Response::Bulk(Bytes::from(s)),
            Entry::String(s) => Response::Simple(s),
            Entry::Null => Response::Null,
        }
    }
}

impl From<Response> for Bytes {
    fn from(response: Response) -> Self {
        response.serialize()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Simple(s) => write!(f, "+{}", s),
            Response::Error(s) => write!(f, "-{}", s),
            Response::Integer(raw) => write!(f, ":{}", raw),
            Response::Double(raw) => write!(f, ",{}", raw),
            Response::Boolean(b) => write!(f, "#{}", if *b { 't' } else { 'f' }),
            Response::Null => write!(f, "_"),
            Response::Bulk(bytes) => write!(f, "${}", String::from_utf8_lossy(bytes)),
        }
    }
}
