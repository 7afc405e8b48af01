//! Per-message decompression skip policy.

use crate::frame::Frame;

/// Decides whether a message should bypass decompression.
///
/// The filter is consulted once per message, on its first frame, and sees that frame exactly as
/// it arrived: compressed payload and original reserved bits. The answer holds for every
/// continuation of the message.
///
/// Any `Fn(&Frame) -> bool` closure is a filter:
///
/// ```
/// use actix_ws_deflate::{DeflateDecoder, OpCode};
///
/// // leave small text messages compressed
/// let decoder = DeflateDecoder::with_filter(|frame: &actix_ws_deflate::Frame| {
///     frame.opcode() == OpCode::Text && frame.len() < 100
/// });
/// # drop(decoder);
/// ```
pub trait FrameFilter {
    /// Returns `true` if the message started by `frame` must be passed through as-is.
    fn must_skip(&self, frame: &Frame) -> bool;
}

impl<F> FrameFilter for F
where
    F: Fn(&Frame) -> bool,
{
    #[inline]
    fn must_skip(&self, frame: &Frame) -> bool {
        (self)(frame)
    }
}

/// Filter that never skips; every compressed message is decompressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeverSkip;

impl FrameFilter for NeverSkip {
    #[inline]
    fn must_skip(&self, _: &Frame) -> bool {
        false
    }
}

/// Filter that always skips; frames are passed through still compressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlwaysSkip;

impl FrameFilter for AlwaysSkip {
    #[inline]
    fn must_skip(&self, _: &Frame) -> bool {
        true
    }
}
