use bytes::{Buf, Bytes, BytesMut};
use std::io::{self, Cursor};
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::frame::{self, Request};

/// Default upper bound for a single buffered frame.
pub const MAX_FRAME_SIZE: usize = 512 * 1024 * 1024;

/// Splits the byte stream of a connection into requests.
///
/// Protocol errors are yielded as items rather than decoder errors, so a bad frame gets an error
/// reply and the connection keeps going. Only I/O errors end the stream.
#[derive(Debug, Clone)]
pub struct RespCodec {
    max_frame_size: usize,
}

impl RespCodec {
    pub fn new(max_frame_size: usize) -> RespCodec {
        RespCodec { max_frame_size }
    }
}

impl Default for RespCodec {
    fn default() -> Self {
        Self::new(MAX_FRAME_SIZE)
    }
}

impl Decoder for RespCodec {
    type Item = Result<Request, frame::Error>;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let mut cursor = Cursor::new(&src[..]);
        let res = Request::parse_with_limit(&mut cursor, self.max_frame_size);
        let position = cursor.position() as usize;

        match res {
            Ok(request) => {
                src.advance(position);
                Ok(Some(Ok(request)))
            }
            Err(frame::Error::Incomplete) if src.len() > self.max_frame_size => {
                src.clear();
                Ok(Some(Err(frame::Error::Malformed(
                    "frame size exceeds limit".to_string(),
                ))))
            }
            // Not enough data to parse a frame.
            Err(frame::Error::Incomplete) => Ok(None),
            // The whole frame was read, only its verb is unknown.
            Err(err @ frame::Error::UnknownCommand(_)) => {
                src.advance(position);
                Ok(Some(Err(err)))
            }
            // There is no telling where the next frame starts.
            Err(err) => {
                src.clear();
                Ok(Some(Err(err)))
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(buf)? {
            Some(item) => Ok(Some(item)),
            None => {
                if !buf.is_empty() {
                    debug!("Discarding {} bytes of an incomplete frame", buf.len());
                    buf.clear();
                }
                Ok(None)
            }
        }
    }
}

impl Encoder<Bytes> for RespCodec {
    type Error = io::Error;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&item);
        Ok(())
    }
}
