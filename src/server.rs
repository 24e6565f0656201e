//! TCP game server: binds two players, runs one game, then exits.

use crate::codec::{Submission, SubmissionCodec};
use crate::config::ServerConfig;
use crate::error::TransportError;
use crate::game::GameSession;
use crate::participant::{self, Outbox, Participants};
use crate::protocol::ServerMessage;
use crate::session::SessionPhase;
use futures::StreamExt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::codec::FramedRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use wythoff_rules::{Piles, Seat};

/// A bound listener waiting to host a single game.
#[derive(Debug)]
pub struct GameServer {
    listener: TcpListener,
    piles: Piles,
    phase: watch::Sender<SessionPhase>,
}

/// A participant connected but not yet in a running session.
struct Pending {
    seat: Seat,
    addr: SocketAddr,
    reader: OwnedReadHalf,
    outbox: Outbox,
    writer: JoinHandle<Result<(), TransportError>>,
}

impl GameServer {
    /// Binds the listener described by `config`.
    #[instrument(skip(config), fields(addr = %config.bind_addr()))]
    pub async fn bind(config: &ServerConfig) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(config.bind_addr()).await?;
        info!(addr = %listener.local_addr()?, "Listening");
        let (phase, _) = watch::channel(SessionPhase::WaitingForPlayers);
        Ok(Self {
            listener,
            piles: config.piles(),
            phase,
        })
    }

    /// Follows the hosted session through its lifecycle.
    ///
    /// Starts at [`SessionPhase::WaitingForPlayers`], moves to
    /// [`SessionPhase::InProgress`] once both seats are bound and the game
    /// is announced, and ends at [`SessionPhase::GameOver`] when teardown
    /// begins.
    pub fn phase(&self) -> watch::Receiver<SessionPhase> {
        self.phase.subscribe()
    }

    /// Address actually bound (useful when the port was 0).
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.listener.local_addr()?)
    }

    /// Hosts one game to completion.
    ///
    /// Waits for two connections, runs the game, refuses any further
    /// connection while it is running, and returns once both connections
    /// have been flushed and closed. The listener is closed on return.
    #[instrument(skip(self), fields(piles = %self.piles))]
    pub async fn run(self) -> Result<(), TransportError> {
        info!("Waiting for connections");

        let first = self.admit(Seat::Zero).await?;
        let second = self.admit(Seat::One).await?;

        let session = Arc::new(GameSession::new(
            self.piles,
            Participants::new(first.outbox, second.outbox),
        ));
        session.start();
        self.set_phase(SessionPhase::InProgress);

        let mut readers = Vec::with_capacity(2);
        let mut writers = Vec::with_capacity(2);
        for (seat, addr, reader, writer) in [
            (first.seat, first.addr, first.reader, first.writer),
            (second.seat, second.addr, second.reader, second.writer),
        ] {
            debug!(%seat, %addr, "Spawning read loop");
            readers.push(tokio::spawn(read_loop(
                seat,
                reader,
                Arc::clone(&session),
                session.closed(),
            )));
            writers.push((seat, writer));
        }

        self.refuse_until(session.closed()).await;
        self.set_phase(SessionPhase::GameOver);
        drop(self.listener);
        info!("Listener closed");

        for reader in readers {
            if let Err(e) = reader.await {
                warn!(error = %e, "Read loop panicked");
                session.abort();
            }
        }

        for (seat, writer) in writers {
            match writer.await {
                Ok(Ok(())) => debug!(%seat, "Writer finished"),
                // Peer may already be gone; nothing left to deliver to.
                Ok(Err(e)) => debug!(%seat, error = %e, "Writer ended with error"),
                Err(e) => warn!(%seat, error = %e, "Writer panicked"),
            }
        }

        info!(final_state = ?session.state(), "Session finished");
        Ok(())
    }

    fn set_phase(&self, phase: SessionPhase) {
        info!(%phase, "Session phase changed");
        self.phase.send_replace(phase);
    }

    #[instrument(skip(self), fields(seat = %seat))]
    async fn admit(&self, seat: Seat) -> Result<Pending, TransportError> {
        let (stream, addr) = self.listener.accept().await?;
        info!(%addr, "Player {} is connected", seat);

        let (read_half, write_half) = stream.into_split();
        let (outbox, inbox) = Outbox::channel();
        let writer = participant::spawn_writer(seat, write_half, inbox);
        outbox.send(ServerMessage::Connected);

        Ok(Pending {
            seat,
            addr,
            reader: read_half,
            outbox,
            writer,
        })
    }

    async fn refuse_until(&self, closed: CancellationToken) {
        loop {
            tokio::select! {
                _ = closed.cancelled() => return,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        info!(%addr, "Refusing extra connection");
                        tokio::spawn(refuse(stream));
                    }
                    Err(e) => warn!(error = %e, "Accept failed"),
                },
            }
        }
    }
}

async fn refuse(mut stream: TcpStream) {
    let text = format!("{}\n", ServerMessage::SessionFull);
    if let Err(e) = stream.write_all(text.as_bytes()).await {
        debug!(error = %e, "Could not tell extra connection the game is full");
    }
    if let Err(e) = stream.shutdown().await {
        debug!(error = %e, "Could not close extra connection");
    }
}

/// Reads lines from one participant until the game ends or the peer goes away.
///
/// Lines that are too long or not UTF-8 are rejected as malformed moves and
/// reading continues. Only end of stream or a read error counts as the
/// participant leaving.
#[instrument(skip(reader, session, closed), fields(seat = %seat))]
pub async fn read_loop<R>(
    seat: Seat,
    reader: R,
    session: Arc<GameSession>,
    closed: CancellationToken,
) where
    R: AsyncRead + Unpin,
{
    let mut lines = FramedRead::new(reader, SubmissionCodec::new());
    loop {
        let next = tokio::select! {
            _ = closed.cancelled() => {
                debug!("Session closed, stopping read loop");
                break;
            }
            next = lines.next() => next,
        };

        let submitted = match next {
            Some(Ok(Submission::Line(line))) => {
                info!("Received move from Player {}: {:?}", seat, line);
                session.submit(seat, &line)
            }
            Some(Ok(Submission::Unreadable)) => {
                warn!("Unreadable line from Player {}", seat);
                session.submit_unreadable(seat)
            }
            None => {
                info!("Player {} disconnected", seat);
                session.disconnect(seat);
                break;
            }
            Some(Err(e)) => {
                warn!(error = %e, "Error reading from Player {}", seat);
                session.disconnect(seat);
                break;
            }
        };

        if submitted.is_err() {
            debug!("Session no longer accepting moves");
            break;
        }
    }
}
