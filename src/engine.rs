use bytes::Bytes;
use thiserror::Error as ThisError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::commands::executable::Executable;
use crate::commands::Command;
use crate::frame::Request;
use crate::response::Response;
use crate::store::Store;

#[derive(Debug, ThisError, PartialEq)]
pub enum Error {
    #[error("execution engine is not running")]
    Closed,
}

/// A queued request together with the channel its encoded response goes back on.
#[derive(Debug)]
struct Job {
    request: Request,
    reply: oneshot::Sender<Bytes>,
}

/// Handle to the single worker that owns the [`Store`].
///
/// Any number of connections can hold a clone and submit concurrently; the worker takes jobs off
/// one FIFO queue and runs them one at a time, so every read and write of the store happens in
/// queue order and the store needs no locking.
#[derive(Clone, Debug)]
pub struct Engine {
    sender: mpsc::Sender<Job>,
}

impl Engine {
    /// Spawns the worker on the current runtime. It stops once every handle has been dropped.
    pub fn spawn(store: Store, queue_capacity: usize) -> Engine {
        let (sender, receiver) = mpsc::channel(queue_capacity.max(1));

        tokio::spawn(process_jobs(store, receiver));

        Engine { sender }
    }

    /// Enqueues `request` and waits for its encoded response.
    pub async fn submit(&self, request: Request) -> Result<Bytes, Error> {
        let (reply, response) = oneshot::channel();

        self.sender
            .send(Job { request, reply })
            .await
            .map_err(|_| Error::Closed)?;

        response.await.map_err(|_| Error::Closed)
    }
}

async fn process_jobs(mut store: Store, mut receiver: mpsc::Receiver<Job>) {
    info!("Execution engine started");

    while let Some(Job { request, reply }) = receiver.recv().await {
        debug!("Executing {}", request);
        let response = execute(request, &mut store);
        debug!("Result {}", response);

        if reply.send(response.serialize()).is_err() {
            debug!("Requester went away before the response was delivered");
        }
    }

    info!("Execution engine stopped");
}

/// Runs one request against the store. Handler failures become `ERR` replies, nothing here
/// fails the worker.
pub fn execute(request: Request, store: &mut Store) -> Response {
    match Command::try_from(request).and_then(|cmd| cmd.exec(store)) {
        Ok(response) => response,
        Err(err) => Response::error(err),
    }
}
