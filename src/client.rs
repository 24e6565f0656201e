//! Interactive terminal client.
//!
//! Echoes every server line and asks the user for a move whenever the
//! server says it is their turn or asks them to try again.

use crate::error::TransportError;
use crate::protocol::{CLOSED_CUE, RETRY_CUE, YOUR_TURN_CUE};
use futures::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, info, instrument};

/// Shown before reading a move from the user.
pub const MOVE_PROMPT: &str = "Enter move (pile_index count; use 2 for both): ";

/// Longest server line the client will buffer.
pub const MAX_SERVER_LINE: usize = 4096;

/// What the client should do after a server line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    /// Print and keep reading.
    Continue,
    /// Ask the user for a move.
    Prompt,
    /// The server is closing; stop.
    Stop,
}

/// Classifies a server line by the cue it carries.
pub fn classify(line: &str) -> LineAction {
    if line.contains(YOUR_TURN_CUE) || line.contains(RETRY_CUE) {
        LineAction::Prompt
    } else if line.contains(CLOSED_CUE) {
        LineAction::Stop
    } else {
        LineAction::Continue
    }
}

/// Connects to `host:port` and plays on stdin/stdout.
#[instrument]
pub async fn connect(host: &str, port: u16) -> Result<(), TransportError> {
    let stream = TcpStream::connect((host, port)).await?;
    info!(peer = %stream.peer_addr()?, "Connected");

    let (read_half, write_half) = stream.into_split();
    play(
        read_half,
        write_half,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

/// Runs the client loop over arbitrary streams.
///
/// Returns when the server announces it is closing, when the server
/// hangs up, or when user input runs out. A server line longer than
/// [`MAX_SERVER_LINE`] is an error.
pub async fn play<S, W, I, O>(
    server: S,
    mut to_server: W,
    input: I,
    mut output: O,
) -> Result<(), TransportError>
where
    S: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut server = FramedRead::new(server, LinesCodec::new_with_max_length(MAX_SERVER_LINE));
    let mut input = input.lines();

    while let Some(line) = server.next().await.transpose()? {
        output.write_all(format!("{line}\n").as_bytes()).await?;

        match classify(&line) {
            LineAction::Continue => {}
            LineAction::Stop => {
                debug!("Server closing");
                break;
            }
            LineAction::Prompt => {
                output.write_all(MOVE_PROMPT.as_bytes()).await?;
                output.flush().await?;

                let Some(mv) = input.next_line().await? else {
                    debug!("Input closed");
                    break;
                };
                to_server.write_all(format!("{}\n", mv.trim()).as_bytes()).await?;
                to_server.flush().await?;
            }
        }
    }

    output.flush().await?;
    if let Err(e) = to_server.shutdown().await {
        debug!(error = %e, "Could not close connection to server");
    }
    Ok(())
}
