//! Line framing for participant input.
//!
//! Wraps [`LinesCodec`] so that a line which is too long or not UTF-8
//! comes out as [`Submission::Unreadable`] instead of an error. A decoder
//! error would end the `FramedRead` stream, and bad text from a player is
//! a rejected move, not a dropped connection.

use std::io;
use tokio_util::bytes::BytesMut;
use tokio_util::codec::{Decoder, LinesCodec, LinesCodecError};
use tracing::debug;

/// Longest line accepted from a participant, excluding the newline.
pub const MAX_LINE_LENGTH: usize = 1024;

/// One framed line from a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// A complete UTF-8 line.
    Line(String),
    /// A line that was over-long or not valid UTF-8. Its bytes are discarded.
    Unreadable,
}

/// Newline-delimited decoder with a length cap.
#[derive(Debug, Clone)]
pub struct SubmissionCodec {
    lines: LinesCodec,
}

impl SubmissionCodec {
    /// Codec capped at [`MAX_LINE_LENGTH`].
    pub fn new() -> Self {
        Self::with_max_length(MAX_LINE_LENGTH)
    }

    /// Codec capped at `max_length` bytes per line.
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(max_length),
        }
    }
}

impl Default for SubmissionCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn recover(
    decoded: Result<Option<String>, LinesCodecError>,
) -> Result<Option<Submission>, LinesCodecError> {
    match decoded {
        Ok(line) => Ok(line.map(Submission::Line)),
        Err(LinesCodecError::MaxLineLengthExceeded) => {
            debug!("Line too long, discarding");
            Ok(Some(Submission::Unreadable))
        }
        // LinesCodec only raises InvalidData itself, after consuming the line.
        Err(LinesCodecError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
            debug!(error = %e, "Line is not UTF-8");
            Ok(Some(Submission::Unreadable))
        }
        Err(e) => Err(e),
    }
}

impl Decoder for SubmissionCodec {
    type Item = Submission;
    type Error = LinesCodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Submission>, LinesCodecError> {
        recover(self.lines.decode(buf))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Submission>, LinesCodecError> {
        recover(self.lines.decode_eof(buf))
    }
}
