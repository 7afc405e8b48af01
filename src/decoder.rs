//! Message decompressor.

use bytes::BytesMut;
use tracing::{debug, trace};

use crate::{
    config::DeflateDecoderConfig,
    error::DeflateError,
    filter::{FrameFilter, NeverSkip},
    frame::{Frame, RsvBits},
    state::{CompressionState, Decision},
};

/// Decompresses permessage-deflate frames of a single WebSocket stream.
///
/// Frames must be fed in the order they were received. Each data frame produces exactly one
/// output frame: compressed frames come out with their payload inflated and RSV1 cleared, all
/// other reserved bits untouched. Uncompressed frames, control frames and frames of messages
/// exempted by the [filter](FrameFilter) are returned as they are.
///
/// Every error is fatal. After returning one, the decoder has released its inflater and answers
/// all further frames with [`DeflateError::Terminated`].
///
/// ```
/// use actix_ws_deflate::{DeflateDecoder, Frame, RsvBits};
///
/// let mut decoder = DeflateDecoder::new();
///
/// let frame = Frame::text(
///     true,
///     RsvBits::RSV1,
///     &b"\xf2H\xcd\xc9\xc9W\x08\xcf/\xcaI\x01\0"[..],
/// );
/// let frame = decoder.decode(frame).unwrap();
///
/// assert_eq!(&frame.payload()[..], b"Hello World");
/// assert!(frame.rsv().is_empty());
/// ```
#[derive(Debug)]
pub struct DeflateDecoder<F = NeverSkip> {
    config: DeflateDecoderConfig,
    filter: F,
    state: CompressionState,
    terminated: bool,
}

impl DeflateDecoder<NeverSkip> {
    /// Constructs decoder that decompresses every compressed message.
    pub fn new() -> Self {
        Self::with_config(DeflateDecoderConfig::default(), NeverSkip)
    }
}

impl Default for DeflateDecoder<NeverSkip> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FrameFilter> DeflateDecoder<F> {
    /// Constructs decoder with a skip filter and default configuration.
    pub fn with_filter(filter: F) -> Self {
        Self::with_config(DeflateDecoderConfig::default(), filter)
    }

    /// Constructs decoder with a skip filter and explicit configuration.
    pub fn with_config(config: DeflateDecoderConfig, filter: F) -> Self {
        Self {
            config,
            filter,
            state: CompressionState::default(),
            terminated: false,
        }
    }

    /// Decoder configuration.
    pub fn config(&self) -> &DeflateDecoderConfig {
        &self.config
    }

    /// Returns `true` while a compressed message has been started but not finished.
    pub fn is_decompressing(&self) -> bool {
        self.state.is_active()
    }

    /// Returns `true` if a previous error has made this decoder unusable.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Decodes one frame.
    pub fn decode(&mut self, frame: Frame) -> Result<Frame, DeflateError> {
        if self.terminated {
            return Err(DeflateError::Terminated);
        }

        // control frames may be interleaved with fragments and never carry compressed data
        if !frame.opcode().is_data() {
            return Ok(frame);
        }

        self.decode_data(frame).map_err(|err| {
            debug!("permessage-deflate decoding failed: {}", err);
            self.state.abort();
            self.terminated = true;
            err
        })
    }

    fn decode_data(&mut self, frame: Frame) -> Result<Frame, DeflateError> {
        let decision = if frame.is_continuation() {
            if self.state.is_active() && frame.rsv().contains(RsvBits::RSV1) {
                return Err(DeflateError::CompressedContinuation);
            }

            self.state.continuation()
        } else {
            self.state.begin_message(&frame, &self.filter)?
        };

        let fin = frame.fin();

        let frame = match decision {
            Decision::Skip => frame,
            Decision::Decompress => self.inflate(frame)?,
        };

        if fin {
            self.state.close(!self.config.is_no_context_takeover());
        }

        Ok(frame)
    }

    fn inflate(&mut self, frame: Frame) -> Result<Frame, DeflateError> {
        let (opcode, fin, rsv, payload) = frame.into_parts();

        let limit = self.state.remaining(self.config.get_max_size());
        let mut output = BytesMut::with_capacity(payload.len().saturating_mul(2).min(limit));

        let inflater = self.state.inflater();
        inflater.feed(&payload, &mut output, limit)?;
        if fin {
            inflater.finish(&mut output, limit)?;
        }

        self.state.record_inflated(output.len());

        trace!(
            "inflated {} frame: {} -> {} bytes, fin = {}",
            opcode,
            payload.len(),
            output.len(),
            fin
        );

        Ok(Frame::new(opcode, fin, rsv - RsvBits::RSV1, output.freeze()))
    }
}
