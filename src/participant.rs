//! Outbound message queues, one per seat.
//!
//! Every message for a seat goes through that seat's FIFO channel, and a
//! dedicated writer task owns the write half of the socket. Closing an
//! outbox drops the sender; the writer then drains whatever is still
//! queued, shuts the socket down and exits.

use crate::error::TransportError;
use crate::protocol::ServerMessage;
use std::sync::{Mutex, PoisonError};
use strum::IntoEnumIterator;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace};
use wythoff_rules::Seat;

/// Receiving end of an outbox, consumed by a writer task.
pub type Inbox = mpsc::UnboundedReceiver<ServerMessage>;

/// Sending end of one seat's message queue.
#[derive(Debug)]
pub struct Outbox {
    tx: Mutex<Option<mpsc::UnboundedSender<ServerMessage>>>,
}

impl Outbox {
    /// Creates a connected outbox/inbox pair.
    pub fn channel() -> (Self, Inbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx: Mutex::new(Some(tx)),
            },
            rx,
        )
    }

    /// Queues a message. Returns `false` if the outbox is closed or the
    /// writer has gone away.
    pub fn send(&self, msg: ServerMessage) -> bool {
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        match tx.as_ref() {
            Some(tx) => tx.send(msg).is_ok(),
            None => false,
        }
    }

    /// Stops accepting messages. Already-queued messages are still written.
    ///
    /// Returns `true` if this call did the closing.
    pub fn close(&self) -> bool {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }
}

/// The two seats' outboxes, indexed by arrival order.
#[derive(Debug)]
pub struct Participants {
    outboxes: [Outbox; 2],
}

impl Participants {
    /// Binds seat 0 and seat 1.
    pub fn new(seat0: Outbox, seat1: Outbox) -> Self {
        Self {
            outboxes: [seat0, seat1],
        }
    }

    /// Queues `msg` for `seat`. A seat whose peer is gone is skipped.
    #[instrument(level = "trace", skip(self, msg), fields(seat = %seat))]
    pub fn send(&self, seat: Seat, msg: ServerMessage) {
        trace!(%msg, "Queueing message");
        if !self.outboxes[seat.index()].send(msg) {
            debug!("Outbox closed, message dropped");
        }
    }

    /// Queues the same message for both seats.
    pub fn broadcast(&self, msg: ServerMessage) {
        for seat in Seat::iter() {
            self.send(seat, msg.clone());
        }
    }

    /// Closes both outboxes. Returns how many were still open.
    pub fn close_all(&self) -> usize {
        self.outboxes.iter().filter(|o| o.close()).count()
    }
}

/// Spawns the writer task for one seat.
///
/// Each message is written followed by a newline. When the inbox is
/// closed and drained the writer shuts down its half of the connection.
pub fn spawn_writer<W>(seat: Seat, writer: W, inbox: Inbox) -> JoinHandle<Result<(), TransportError>>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(write_loop(seat, writer, inbox))
}

#[instrument(skip(writer, inbox), fields(seat = %seat))]
async fn write_loop<W>(seat: Seat, mut writer: W, mut inbox: Inbox) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(msg) = inbox.recv().await {
        let mut text = msg.to_string();
        text.push('\n');
        writer.write_all(text.as_bytes()).await?;
        writer.flush().await?;
        trace!(%msg, "Message delivered");
    }

    debug!("Outbox closed, shutting down writer");
    writer.shutdown().await?;
    Ok(())
}
