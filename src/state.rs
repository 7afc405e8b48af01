use tracing::trace;

use crate::{
    error::DeflateError,
    filter::FrameFilter,
    frame::{Frame, RsvBits},
    inflate::Inflater,
};

/// How the frames of a message are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    /// Payload is inflated and RSV1 is cleared.
    Decompress,

    /// Frame is forwarded unchanged. Covers both filtered messages and messages that were never
    /// compressed.
    Skip,
}

/// Compression bookkeeping for the message currently being received.
///
/// Owns the inflater for the duration of a compressed message, and across messages when the
/// sliding window is retained.
#[derive(Debug, Default)]
pub(crate) struct CompressionState {
    /// A decompression sequence is open.
    active: bool,

    /// The open message was exempted by the filter.
    skipped: bool,

    /// Decompressed bytes produced for the open message so far.
    inflated: usize,

    inflater: Option<Inflater>,
}

impl CompressionState {
    /// Records the decision for a message starting with `frame`.
    ///
    /// The filter is consulted here and only here.
    pub(crate) fn begin_message<F>(
        &mut self,
        frame: &Frame,
        filter: &F,
    ) -> Result<Decision, DeflateError>
    where
        F: FrameFilter + ?Sized,
    {
        if self.is_open() {
            return Err(DeflateError::MessageInProgress);
        }

        let skip = filter.must_skip(frame);
        let compressed = frame.rsv().contains(RsvBits::RSV1);

        self.skipped = skip;
        self.active = compressed && !skip;
        self.inflated = 0;

        trace!(
            "{} message: compressed = {}, skipped = {}",
            frame.opcode(),
            compressed,
            skip
        );

        Ok(self.continuation())
    }

    /// Decision recorded for the open message.
    pub(crate) fn continuation(&self) -> Decision {
        if self.active {
            Decision::Decompress
        } else {
            Decision::Skip
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.active || self.skipped
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    /// Bytes the open message may still grow by before reaching `max_size`.
    pub(crate) fn remaining(&self, max_size: usize) -> usize {
        max_size.saturating_sub(self.inflated)
    }

    pub(crate) fn record_inflated(&mut self, len: usize) {
        self.inflated += len;
    }

    /// Inflater of the open sequence, created on first use.
    pub(crate) fn inflater(&mut self) -> &mut Inflater {
        self.inflater.get_or_insert_with(Inflater::new)
    }

    #[cfg(test)]
    pub(crate) fn has_inflater(&self) -> bool {
        self.inflater.is_some()
    }

    /// Ends the current message.
    ///
    /// With `retain_window` the inflater survives so the next compressed message can reference
    /// data from this one.
    pub(crate) fn close(&mut self, retain_window: bool) {
        self.active = false;
        self.skipped = false;
        self.inflated = 0;

        if !retain_window {
            self.inflater = None;
        }
    }

    /// Tears down the sequence after an error. Nothing is kept.
    pub(crate) fn abort(&mut self) {
        self.close(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{AlwaysSkip, NeverSkip};

    fn compressed_start(fin: bool) -> Frame {
        Frame::binary(fin, RsvBits::RSV1, &b"\x00"[..])
    }

    #[test]
    fn test_begin_compressed() {
        let mut state = CompressionState::default();
        assert!(!state.is_open());

        let decision = state.begin_message(&compressed_start(false), &NeverSkip).unwrap();
        assert_eq!(decision, Decision::Decompress);
        assert!(state.is_open());
        assert!(state.is_active());
        assert_eq!(state.continuation(), Decision::Decompress);

        state.close(false);
        assert!(!state.is_open());
        assert_eq!(state.continuation(), Decision::Skip);
    }

    #[test]
    fn test_begin_uncompressed() {
        let mut state = CompressionState::default();

        let frame = Frame::text(false, RsvBits::RSV3, &b"plain"[..]);
        assert_eq!(state.begin_message(&frame, &NeverSkip).unwrap(), Decision::Skip);
        assert!(!state.is_open());

        // plain messages do not block the next one
        assert!(state.begin_message(&frame, &NeverSkip).is_ok());
    }

    #[test]
    fn test_begin_skipped() {
        let mut state = CompressionState::default();

        let decision = state.begin_message(&compressed_start(false), &AlwaysSkip).unwrap();
        assert_eq!(decision, Decision::Skip);
        assert!(state.is_open());
        assert!(!state.is_active());
        assert_eq!(state.continuation(), Decision::Skip);

        assert!(matches!(
            state.begin_message(&compressed_start(true), &AlwaysSkip),
            Err(DeflateError::MessageInProgress)
        ));
    }

    #[test]
    fn test_begin_while_open() {
        let mut state = CompressionState::default();
        state.begin_message(&compressed_start(false), &NeverSkip).unwrap();

        assert!(matches!(
            state.begin_message(&compressed_start(true), &NeverSkip),
            Err(DeflateError::MessageInProgress)
        ));
        assert!(state.is_active());
    }

    #[test]
    fn test_filter_called_once_per_message() {
        use std::cell::Cell;

        let calls = Cell::new(0);
        let filter = |_: &Frame| {
            calls.set(calls.get() + 1);
            false
        };

        let mut state = CompressionState::default();
        state.begin_message(&compressed_start(false), &filter).unwrap();
        state.continuation();
        state.continuation();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_inflater_lifecycle() {
        let mut state = CompressionState::default();
        assert!(!state.has_inflater());

        state.begin_message(&compressed_start(false), &NeverSkip).unwrap();
        state.inflater();
        assert!(state.has_inflater());

        state.close(true);
        assert!(state.has_inflater());

        state.begin_message(&compressed_start(false), &NeverSkip).unwrap();
        state.abort();
        assert!(!state.has_inflater());
        assert!(!state.is_open());
    }

    #[test]
    fn test_remaining() {
        let mut state = CompressionState::default();
        state.begin_message(&compressed_start(false), &NeverSkip).unwrap();

        assert_eq!(state.remaining(10), 10);
        state.record_inflated(4);
        assert_eq!(state.remaining(10), 6);
        state.record_inflated(8);
        assert_eq!(state.remaining(10), 0);

        state.close(true);
        assert_eq!(state.remaining(10), 10);
    }
}
