//! Tests for participant line framing.

use tokio_util::bytes::BytesMut;
use tokio_util::codec::Decoder;
use wythoff_games::{MAX_LINE_LENGTH, Submission, SubmissionCodec};

fn decode_all(codec: &mut SubmissionCodec, bytes: &[u8]) -> Vec<Submission> {
    let mut buf = BytesMut::from(bytes);
    let mut out = Vec::new();
    while let Some(item) = codec.decode_eof(&mut buf).expect("Decoder failed") {
        out.push(item);
    }
    out
}

fn line(text: &str) -> Submission {
    Submission::Line(text.to_string())
}

#[test]
fn test_splits_lines_and_strips_carriage_return() {
    let mut codec = SubmissionCodec::new();
    assert_eq!(
        decode_all(&mut codec, b"0 1\r\n2 3\n1 1"),
        vec![line("0 1"), line("2 3"), line("1 1")]
    );
}

#[test]
fn test_non_utf8_line_is_unreadable_and_decoding_continues() {
    let mut codec = SubmissionCodec::new();
    assert_eq!(
        decode_all(&mut codec, b"0 \xff1\n0 1\n"),
        vec![Submission::Unreadable, line("0 1")]
    );
}

#[test]
fn test_over_long_line_is_discarded_once() {
    let mut codec = SubmissionCodec::with_max_length(8);
    assert_eq!(
        decode_all(&mut codec, b"0 123456789\n0 1\n"),
        vec![Submission::Unreadable, line("0 1")]
    );
}

#[test]
fn test_line_at_the_cap_is_accepted() {
    let mut codec = SubmissionCodec::new();
    let text = "x".repeat(MAX_LINE_LENGTH);
    let bytes = format!("{text}\n");
    assert_eq!(decode_all(&mut codec, bytes.as_bytes()), vec![line(&text)]);
}

#[test]
fn test_partial_line_waits_for_newline() {
    let mut codec = SubmissionCodec::new();
    let mut buf = BytesMut::from(&b"0 "[..]);
    assert_eq!(codec.decode(&mut buf).expect("Decoder failed"), None);
    buf.extend_from_slice(b"1\n");
    assert_eq!(
        codec.decode(&mut buf).expect("Decoder failed"),
        Some(line("0 1"))
    );
}
