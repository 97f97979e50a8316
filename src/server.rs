use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, instrument, warn};

use crate::codec::RespCodec;
use crate::config::Config;
use crate::connection::Connection;
use crate::engine::Engine;
use crate::response::Response;
use crate::store::Store;
use crate::Error;

pub async fn run(config: Config) -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;

    serve(listener, config).await
}

/// Accepts connections on `listener` forever. All of them share one execution engine.
pub async fn serve(listener: TcpListener, config: Config) -> Result<(), Error> {
    let engine = Engine::spawn(Store::new(), config.queue_capacity);
    let codec = RespCodec::new(config.max_frame_size);

    info!("Server listening on {}", listener.local_addr()?);

    loop {
        let (socket, client_address) = listener.accept().await?;
        let engine = engine.clone();
        let codec = codec.clone();
        info!("Accepted connection from {:?}", client_address);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, client_address, engine, codec).await {
                error!("Connection failed: {}", e);
            }
        });
    }
}

#[instrument(
    name = "connection",
    skip(stream, engine, codec),
    fields(connection_id, client_address)
)]
async fn handle_connection(
    stream: TcpStream,
    client_address: SocketAddr,
    engine: Engine,
    codec: RespCodec,
) -> Result<(), Error> {
    let mut conn = Connection::new(stream, codec);

    tracing::Span::current()
        .record("connection_id", conn.id.to_string())
        .record("client_address", client_address.to_string());

    while let Some(decoded) = conn.read_request().await? {
        let res = match decoded {
            Ok(request) => {
                debug!("Received request from client: {}", request);
                engine.submit(request).await?
            }
            Err(err) => {
                warn!("Rejected request: {}", err);
                Response::error(err).serialize()
            }
        };

        debug!("Sending response to client: {:?}", res);
        conn.write_response(res).await?;
    }

    info!("Connection closed");
    Ok(())
}
