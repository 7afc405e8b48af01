//! Error type for permessage-deflate decoding.

use derive_more::{Display, Error};

/// Errors that can occur while decompressing a stream of WebSocket frames.
///
/// Every variant is fatal for the stream it was produced on. The decoder releases its inflater and
/// refuses further frames once an error has been returned. Use [`close_code`](Self::close_code)
/// to pick the status for the closing handshake.
#[derive(Debug, Display, Error)]
#[non_exhaustive]
pub enum DeflateError {
    /// A new text or binary message started before the previous fragmented message finished.
    #[display("Received a new message while a fragmented message is still in progress.")]
    MessageInProgress,

    /// A continuation frame of a compressed message had RSV1 set.
    #[display("Received a continuation frame with the compression bit set.")]
    CompressedContinuation,

    /// Compressed payload was rejected by the inflater.
    #[display("Invalid compressed payload: {_0}")]
    Inflate(flate2::DecompressError),

    /// Inflater stopped consuming input before the payload was exhausted.
    #[display("Compressed payload could not be consumed.")]
    Stalled,

    /// Decompressed message reached the configured size limit.
    #[display("Decompressed message reached size limit.")]
    Overflow,

    /// Decoder already failed on an earlier frame.
    #[display("Decoder has been terminated by a previous error.")]
    Terminated,
}

impl DeflateError {
    /// Returns the RFC 6455 close status code matching this error.
    ///
    /// - `1002` (protocol error) for frame sequencing violations.
    /// - `1007` (invalid frame payload data) for corrupt compressed data.
    /// - `1009` (message too big) when the size limit was hit.
    pub fn close_code(&self) -> u16 {
        match self {
            DeflateError::MessageInProgress
            | DeflateError::CompressedContinuation
            | DeflateError::Terminated => 1002,
            DeflateError::Inflate(_) | DeflateError::Stalled => 1007,
            DeflateError::Overflow => 1009,
        }
    }
}

impl From<flate2::DecompressError> for DeflateError {
    fn from(err: flate2::DecompressError) -> Self {
        DeflateError::Inflate(err)
    }
}
