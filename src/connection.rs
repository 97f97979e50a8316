use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use std::io;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use uuid::Uuid;

use crate::codec::RespCodec;
use crate::frame::{self, Request};

pub struct Connection {
    pub id: Uuid,
    // Data is read from the socket into the codec's read buffer. When a frame is parsed, the
    // corresponding data is removed from the buffer.
    framed: Framed<TcpStream, RespCodec>,
}

impl Connection {
    pub fn new(stream: TcpStream, codec: RespCodec) -> Connection {
        Connection {
            id: Uuid::new_v4(),
            framed: Framed::new(stream, codec),
        }
    }

    /// Waits for the next complete request. `None` means the peer closed the connection; a
    /// protocol error is returned as `Some(Err(..))` and the connection stays usable.
    pub async fn read_request(&mut self) -> io::Result<Option<Result<Request, frame::Error>>> {
        self.framed.next().await.transpose()
    }

    pub async fn write_response(&mut self, response: Bytes) -> io::Result<()> {
        self.framed.send(response).await
    }
}
