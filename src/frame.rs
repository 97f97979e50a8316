// https://redis.io/docs/reference/protocol-spec

use bytes::Buf;
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;
use thiserror::Error as ThisError;

use crate::commands::CommandKind;

pub(crate) static CRLF: &[u8; 2] = b"\r\n";

#[derive(Debug, ThisError, PartialEq)]
pub enum Error {
    #[error("not enough data is available to parse an entire frame")]
    Incomplete,
    #[error("protocol error; {0}")]
    Malformed(String),
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

/// A decoded client request: the command verb and its raw arguments. Arity is not checked here,
/// each command validates its own arguments when it is executed.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub command: CommandKind,
    pub args: Vec<String>,
}

impl Request {
    pub fn new(command: CommandKind, args: Vec<String>) -> Request {
        Request { command, args }
    }

    /// Parses one `*<n>\r\n($<len>\r\n<data>\r\n){n}` frame, leaving the cursor right after it.
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Self, Error> {
        Self::parse_with_limit(src, usize::MAX)
    }

    /// Like [`Request::parse`], but a bulk string declaring more than `max_bulk_length` bytes
    /// is malformed straight away instead of being waited for.
    pub fn parse_with_limit(
        src: &mut Cursor<&[u8]>,
        max_bulk_length: usize,
    ) -> Result<Self, Error> {
        let mut parts = parse_array(src, max_bulk_length)?.into_iter();

        let verb = parts
            .next()
            .ok_or_else(|| Error::Malformed("empty request".to_string()))?;

        let command =
            CommandKind::from_str(&verb).map_err(|_| Error::UnknownCommand(verb.clone()))?;

        Ok(Request {
            command,
            args: parts.collect(),
        })
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

// *<number-of-elements>\r\n<element-1>...<element-n>
fn parse_array(src: &mut Cursor<&[u8]>, max_bulk_length: usize) -> Result<Vec<String>, Error> {
    expect_data_type(src, DataType::Array)?;
    let length = get_length(src)?;

    // Don't trust the declared length for the allocation.
    let mut parts = Vec::with_capacity(length.min(16));
    for _ in 0..length {
        parts.push(parse_bulk_string(src, max_bulk_length)?);
    }

    Ok(parts)
}

// $<length>\r\n<data>\r\n
fn parse_bulk_string(src: &mut Cursor<&[u8]>, max_length: usize) -> Result<String, Error> {
    expect_data_type(src, DataType::BulkString)?;
    let length = get_length(src)?;
    let invalid_length = || Error::Malformed(format!("invalid bulk length {}", length));

    if length > max_length {
        return Err(invalid_length());
    }

    let start = src.position() as usize;
    let end = start.checked_add(length).ok_or_else(invalid_length)?;
    let frame_end = end.checked_add(CRLF.len()).ok_or_else(invalid_length)?;

    let buf = *src.get_ref();
    if buf.len() < frame_end {
        return Err(Error::Incomplete);
    }
    if &buf[end..frame_end] != CRLF {
        return Err(Error::Malformed(format!(
            "bulk string does not match its declared length {}",
            length
        )));
    }

    src.set_position(frame_end as u64);

    String::from_utf8(buf[start..end].to_vec())
        .map_err(|_| Error::Malformed("invalid UTF-8 string".to_string()))
}

fn expect_data_type(src: &mut Cursor<&[u8]>, expected: DataType) -> Result<(), Error> {
    let byte = get_byte(src)?;
    match DataType::try_from(byte) {
        Ok(data_type) if data_type == expected => Ok(()),
        _ => Err(Error::Malformed(format!(
            "expected '{}', got '{}'",
            u8::from(expected) as char,
            byte.escape_ascii()
        ))),
    }
}

/// Reads a non-negative decimal length terminated by CRLF.
fn get_length(src: &mut Cursor<&[u8]>) -> Result<usize, Error> {
    let line = match get_line(src) {
        Ok(line) => line,
        // A partial length that already holds a non-digit can never become valid.
        Err(Error::Incomplete) => {
            let rest = &src.get_ref()[src.position() as usize..];
            let rest = rest.strip_suffix(b"\r").unwrap_or(rest);
            if rest.iter().all(u8::is_ascii_digit) {
                return Err(Error::Incomplete);
            }
            return Err(Error::Malformed(format!(
                "invalid length '{}'",
                rest.escape_ascii()
            )));
        }
        Err(err) => return Err(err),
    };

    if line.is_empty() || !line.iter().all(u8::is_ascii_digit) {
        return Err(Error::Malformed(format!(
            "invalid length '{}'",
            line.escape_ascii()
        )));
    }

    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| Error::Malformed(format!("invalid length '{}'", line.escape_ascii())))
}

fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let buf: &'a [u8] = *src.get_ref();

    let line_end = buf[start..]
        .windows(2)
        .position(|window| window == CRLF)
        .map(|index| start + index)
        .ok_or(Error::Incomplete)?;

    src.set_position((line_end + CRLF.len()) as u64);

    Ok(&buf[start..line_end])
}

fn get_byte(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }
    Ok(src.get_u8())
}

/// The subset of RESP data types this server reads or writes.
#[derive(Debug, PartialEq)]
pub(crate) enum DataType {
    SimpleString, // '+'
    SimpleError,  // '-'
    Integer,      // ':'
    BulkString,   // '$'
    Array,        // '*'
    Null,         // '_'
    Boolean,      // '#'
    Double,       // ','
}

impl TryFrom<u8> for DataType {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            b'+' => Ok(Self::SimpleString),
            b'-' => Ok(Self::SimpleError),
            b':' => Ok(Self::Integer),
            b'$' => Ok(Self::BulkString),
            b'*' => Ok(Self::Array),
            b'_' => Ok(Self::Null),
            b'#' => Ok(Self::Boolean),
            b',' => Ok(Self::Double),
            _ => Err(Error::Malformed(format!(
                "invalid data type '{}'",
                byte.escape_ascii()
            ))),
        }
    }
}

impl From<DataType> for u8 {
    fn from(value: DataType) -> Self {
        match value {
            DataType::SimpleString => b'+',
            DataType::SimpleError => b'-',
            DataType::Integer => b':',
            DataType::BulkString => b'$',
            DataType::Array => b'*',
            DataType::Null => b'_',
            DataType::Boolean => b'#',
            DataType::Double => b',',
        }
    }
}
