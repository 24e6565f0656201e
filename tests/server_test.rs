//! End-to-end tests for the TCP game server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use wythoff_games::{
    GameServer, GameSession, Inbox, MAX_LINE_LENGTH, Outbox, Participants, Piles, Seat,
    ServerConfig, ServerMessage, SessionPhase, TransportError, read_loop,
};

const WAIT: Duration = Duration::from_secs(5);

struct TestPlayer {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestPlayer {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("Connect failed");
        let (read_half, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    async fn line(&mut self) -> Option<String> {
        timeout(WAIT, self.lines.next_line())
            .await
            .expect("Timed out waiting for server")
            .expect("Read failed")
    }

    async fn expect(&mut self, expected: &[&str]) {
        for want in expected {
            assert_eq!(self.line().await.as_deref(), Some(*want));
        }
    }

    async fn expect_closed(&mut self) {
        assert_eq!(self.line().await, None);
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("Write failed");
    }
}

async fn start_server(pile0: u32, pile1: u32) -> (SocketAddr, JoinHandle<Result<(), TransportError>>) {
    let config = ServerConfig::default()
        .with_host("127.0.0.1".to_string())
        .with_port(0)
        .with_pile0(pile0)
        .with_pile1(pile1);
    let server = GameServer::bind(&config).await.expect("Bind failed");
    let addr = server.local_addr().expect("No local addr");
    (addr, tokio::spawn(server.run()))
}

/// Connects both players in seat order and consumes the opening messages.
async fn seat_players(addr: SocketAddr, piles: &str) -> (TestPlayer, TestPlayer) {
    let mut p0 = TestPlayer::connect(addr).await;
    p0.expect(&["Connected to server."]).await;
    let mut p1 = TestPlayer::connect(addr).await;
    p1.expect(&["Connected to server."]).await;

    let piles = format!("Current Piles: {piles}");
    p0.expect(&["Game starting...", "---", &piles, "It's your turn!"]).await;
    p1.expect(&["Game starting...", "---", &piles, "It is Player 0's turn."]).await;
    (p0, p1)
}

async fn finished(server: JoinHandle<Result<(), TransportError>>) {
    timeout(WAIT, server)
        .await
        .expect("Server did not finish")
        .expect("Server panicked")
        .expect("Server returned error");
}

#[tokio::test]
async fn test_full_game_over_tcp() {
    let (addr, server) = start_server(5, 10).await;
    let (mut p0, mut p1) = seat_players(addr, "[5, 10]").await;

    p1.send("0 1").await;
    p1.expect(&[
        "Received error from server: \"It's not your turn.\"",
        "Please wait for your turn.",
    ])
    .await;

    p0.send("abc").await;
    p0.expect(&[
        "Received error from server: \"Invalid input format.\"",
        "Please enter a valid move.",
    ])
    .await;

    p0.send("0 9").await;
    p0.expect(&[
        "Received error from server: \"Illegal move: not enough objects in pile 0\"",
        "Please enter a valid move.",
    ])
    .await;

    p0.send("2 5").await;
    p0.expect(&["---", "Current Piles: [0, 5]", "It is Player 1's turn."]).await;
    p1.expect(&["---", "Current Piles: [0, 5]", "It's your turn!"]).await;

    p1.send("1 5").await;
    p1.expect(&[
        "---",
        "Current Piles: [0, 0]",
        "Congratulations! You win!",
        "Server has closed the connection.",
    ])
    .await;
    p1.expect_closed().await;

    p0.expect(&[
        "---",
        "Current Piles: [0, 0]",
        "Game over. Player 1 is the winner.",
        "Server has closed the connection.",
    ])
    .await;
    p0.expect_closed().await;

    finished(server).await;
}

#[tokio::test]
async fn test_disconnect_forfeits_to_opponent() {
    let (addr, server) = start_server(5, 10).await;
    let (p0, mut p1) = seat_players(addr, "[5, 10]").await;

    drop(p0);

    p1.expect(&[
        "Player 0 disconnected. You win by forfeit.",
        "Server has closed the connection.",
    ])
    .await;
    p1.expect_closed().await;

    finished(server).await;
}

#[tokio::test]
async fn test_third_connection_is_refused() {
    let (addr, server) = start_server(1, 0).await;
    let (mut p0, mut p1) = seat_players(addr, "[1, 0]").await;

    let mut extra = TestPlayer::connect(addr).await;
    extra
        .expect(&["Game is full. Server has closed the connection."])
        .await;
    extra.expect_closed().await;

    p0.send("0 1").await;
    p0.expect(&[
        "---",
        "Current Piles: [0, 0]",
        "Congratulations! You win!",
        "Server has closed the connection.",
    ])
    .await;
    p0.expect_closed().await;
    p1.expect(&["---", "Current Piles: [0, 0]", "Game over. Player 0 is the winner."])
        .await;

    finished(server).await;

    // Listener is gone once the single session is over.
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_phase_follows_session_lifecycle() {
    let config = ServerConfig::default()
        .with_host("127.0.0.1".to_string())
        .with_port(0)
        .with_pile0(1)
        .with_pile1(0);
    let server = GameServer::bind(&config).await.expect("Bind failed");
    let addr = server.local_addr().expect("No local addr");
    let mut phase = server.phase();
    assert_eq!(*phase.borrow(), SessionPhase::WaitingForPlayers);
    let server = tokio::spawn(server.run());

    let (mut p0, _p1) = seat_players(addr, "[1, 0]").await;
    timeout(WAIT, phase.wait_for(|p| *p == SessionPhase::InProgress))
        .await
        .expect("Timed out waiting for game start")
        .expect("Server dropped phase");

    p0.send("0 1").await;
    finished(server).await;
    assert_eq!(*phase.borrow(), SessionPhase::GameOver);
}

fn local_session(piles: Piles) -> (Arc<GameSession>, Inbox, Inbox) {
    let (out0, in0) = Outbox::channel();
    let (out1, in1) = Outbox::channel();
    let session = GameSession::new(piles, Participants::new(out0, out1));
    (Arc::new(session), in0, in1)
}

async fn received(inbox: &mut Inbox) -> Vec<ServerMessage> {
    let mut msgs = Vec::new();
    while let Some(msg) = timeout(WAIT, inbox.recv()).await.expect("Outbox never closed") {
        msgs.push(msg);
    }
    msgs
}

/// Feeds `input` to seat 0's read loop, then hangs up.
async fn read_then_hang_up(input: &[u8]) -> (Vec<ServerMessage>, Vec<ServerMessage>, Piles) {
    let (session, mut in0, mut in1) = local_session(Piles::new(5, 10));
    read_loop(Seat::Zero, input, Arc::clone(&session), session.closed()).await;
    (received(&mut in0).await, received(&mut in1).await, session.state().piles())
}

#[tokio::test]
async fn test_read_loop_rejects_non_utf8_line_and_keeps_reading() {
    let (seat0, seat1, piles) = read_then_hang_up(b"0 \xff1\n0 1\n").await;

    let after = Piles::new(4, 10);
    assert_eq!(
        seat0,
        vec![
            ServerMessage::InvalidFormat,
            ServerMessage::PileState { piles: after },
            ServerMessage::TurnNotice { turn: Seat::One },
        ]
    );
    // The forfeit comes from hanging up at the end, not from the bad line.
    assert_eq!(
        seat1,
        vec![
            ServerMessage::PileState { piles: after },
            ServerMessage::YourTurn,
            ServerMessage::OpponentLeft {
                opponent: Seat::Zero
            },
        ]
    );
    assert_eq!(piles, after);
}

#[tokio::test]
async fn test_read_loop_rejects_over_long_line_and_keeps_reading() {
    let mut input = vec![b'7'; MAX_LINE_LENGTH * 4];
    input.extend_from_slice(b"\n0 1\n");
    let (seat0, _, piles) = read_then_hang_up(&input).await;

    assert_eq!(seat0.first(), Some(&ServerMessage::InvalidFormat));
    assert_eq!(seat0.len(), 3);
    assert_eq!(piles, Piles::new(4, 10));
}

#[tokio::test]
async fn test_over_long_line_over_tcp_is_rejected() {
    let (addr, server) = start_server(5, 10).await;
    let (mut p0, p1) = seat_players(addr, "[5, 10]").await;

    p0.send(&"1".repeat(MAX_LINE_LENGTH + 1)).await;
    p0.expect(&[
        "Received error from server: \"Invalid input format.\"",
        "Please enter a valid move.",
    ])
    .await;

    p0.send("0 5").await;
    p0.expect(&["---", "Current Piles: [0, 10]", "It is Player 1's turn."]).await;

    drop(p0);
    drop(p1);
    finished(server).await;
}
