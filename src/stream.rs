use std::{
    pin::Pin,
    task::{Context, Poll},
};

use futures_core::{ready, Stream};
use pin_project_lite::pin_project;

use crate::{decoder::DeflateDecoder, error::DeflateError, filter::FrameFilter, frame::Frame};

pin_project! {
    /// Stream of frames with permessage-deflate payloads inflated.
    ///
    /// Wraps a stream of frames, e.g. the output of a WebSocket codec, and runs every item through
    /// a [`DeflateDecoder`]. Errors from the inner stream are forwarded untouched. After the
    /// decoder fails, its error is yielded once and the stream ends.
    pub struct Decompressed<S, F> {
        #[pin]
        stream: S,
        decoder: DeflateDecoder<F>,
        done: bool,
    }
}

impl<S, F> Decompressed<S, F> {
    /// Constructs stream adapter.
    pub fn new(stream: S, decoder: DeflateDecoder<F>) -> Self {
        Self {
            stream,
            decoder,
            done: false,
        }
    }

    /// Returns a reference to the decoder.
    pub fn decoder(&self) -> &DeflateDecoder<F> {
        &self.decoder
    }

    /// Consumes the adapter, returning the inner stream and the decoder.
    pub fn into_parts(self) -> (S, DeflateDecoder<F>) {
        (self.stream, self.decoder)
    }
}

impl<S, F, E> Stream for Decompressed<S, F>
where
    S: Stream<Item = Result<Frame, E>>,
    F: FrameFilter,
    E: From<DeflateError>,
{
    type Item = Result<Frame, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        match ready!(this.stream.poll_next(cx)) {
            Some(Ok(frame)) => match this.decoder.decode(frame) {
                Ok(frame) => Poll::Ready(Some(Ok(frame))),
                Err(err) => {
                    *this.done = true;
                    Poll::Ready(Some(Err(err.into())))
                }
            },
            Some(Err(err)) => Poll::Ready(Some(Err(err))),
            None => {
                *this.done = true;
                Poll::Ready(None)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            self.stream.size_hint()
        }
    }
}

impl<F> DeflateDecoder<F> {
    /// Wraps `stream` so that its frames are decoded by this decoder.
    pub fn decode_stream<S>(self, stream: S) -> Decompressed<S, F> {
        Decompressed::new(stream, self)
    }
}
