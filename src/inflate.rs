//! Streaming raw-deflate inflater.

use bytes::BytesMut;
use flate2::{Decompress, FlushDecompress, Status};
use tracing::trace;

use crate::error::DeflateError;

/// Tail that permessage-deflate senders strip from every compressed message.
///
/// See [RFC 7692 §7.2.2](https://datatracker.ietf.org/doc/html/rfc7692#section-7.2.2).
pub(crate) const DEFLATE_TRAILER: [u8; 4] = [0x00, 0x00, 0xff, 0xff];

const BUF_SIZE: usize = 2048;

/// Raw DEFLATE decompressor for one stream.
///
/// Input may end anywhere inside a block; the rest of the block can be fed later. Output is
/// appended to the caller's buffer in the order it is produced.
#[derive(Debug)]
pub(crate) struct Inflater {
    decompress: Decompress,

    /// Last input ended exactly on a final (BFINAL) block.
    stream_end: bool,
}

impl Inflater {
    pub(crate) fn new() -> Self {
        Self {
            decompress: Decompress::new(false),
            stream_end: false,
        }
    }

    /// Inflates all of `input`, appending to `output`.
    ///
    /// Fails with [`DeflateError::Overflow`] if `output` would grow beyond `limit` bytes.
    pub(crate) fn feed(
        &mut self,
        input: &[u8],
        output: &mut BytesMut,
        limit: usize,
    ) -> Result<(), DeflateError> {
        self.drive(input, FlushDecompress::None, output, limit)
    }

    /// Feeds the stripped trailer and flushes everything that is pending.
    ///
    /// A stream that already ended on a final block has nothing to terminate; the trailer is not
    /// fed in that case.
    pub(crate) fn finish(&mut self, output: &mut BytesMut, limit: usize) -> Result<(), DeflateError> {
        if self.stream_end {
            self.reset();
            return Ok(());
        }

        self.drive(&DEFLATE_TRAILER, FlushDecompress::Sync, output, limit)
    }

    pub(crate) fn reset(&mut self) {
        self.decompress.reset(false);
        self.stream_end = false;
    }

    fn drive(
        &mut self,
        input: &[u8],
        flush: FlushDecompress,
        output: &mut BytesMut,
        limit: usize,
    ) -> Result<(), DeflateError> {
        if self.stream_end && !input.is_empty() {
            self.reset();
        }

        let mut buf = [0u8; BUF_SIZE];
        let mut offset = 0;

        loop {
            let total_in = self.decompress.total_in();
            let total_out = self.decompress.total_out();

            let status = self.decompress.decompress(&input[offset..], &mut buf, flush)?;

            let read = (self.decompress.total_in() - total_in) as usize;
            let written = (self.decompress.total_out() - total_out) as usize;
            offset += read;

            if output.len() + written > limit {
                return Err(DeflateError::Overflow);
            }
            output.extend_from_slice(&buf[..written]);

            match status {
                Status::StreamEnd => {
                    if offset >= input.len() {
                        self.stream_end = true;
                        return Ok(());
                    }

                    // whatever follows a final block starts a new stream
                    trace!(
                        "deflate stream ended with {} input bytes left",
                        input.len() - offset
                    );
                    self.reset();
                }

                Status::Ok | Status::BufError => {
                    // a full output buffer may leave more output pending
                    if offset >= input.len() && written < buf.len() {
                        return Ok(());
                    }

                    if read == 0 && written == 0 {
                        return Err(DeflateError::Stalled);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use flate2::{Compress, Compression, FlushCompress};

    use super::*;

    fn deflate(compress: &mut Compress, data: &[u8], flush: FlushCompress) -> Vec<u8> {
        let start = compress.total_in();
        let mut out = Vec::with_capacity(data.len() + 64);

        loop {
            let consumed = (compress.total_in() - start) as usize;
            out.reserve(256);
            compress
                .compress_vec(&data[consumed..], &mut out, flush)
                .unwrap();

            let consumed = (compress.total_in() - start) as usize;
            if consumed == data.len() && out.len() < out.capacity() {
                break;
            }
        }

        out
    }

    #[test]
    fn test_inflate_hello_world() {
        let mut inflater = Inflater::new();
        let mut out = BytesMut::new();

        inflater
            .feed(b"\xf2H\xcd\xc9\xc9W\x08\xcf/\xcaI\x01\0", &mut out, usize::MAX)
            .unwrap();
        inflater.finish(&mut out, usize::MAX).unwrap();
        assert_eq!(&out[..], b"Hello World");

        // context is kept between messages
        let mut out = BytesMut::new();
        inflater.feed(b"\xf2@0\x01\0", &mut out, usize::MAX).unwrap();
        inflater.finish(&mut out, usize::MAX).unwrap();
        assert_eq!(&out[..], b"Hello World");
    }

    #[test]
    fn test_inflate_byte_by_byte() {
        let data = b"a fairly repetitive payload, a fairly repetitive payload".repeat(20);
        let mut compressed = deflate(
            &mut Compress::new(Compression::best(), false),
            &data,
            FlushCompress::Sync,
        );
        assert!(compressed.ends_with(&DEFLATE_TRAILER));
        compressed.truncate(compressed.len() - 4);

        let mut inflater = Inflater::new();
        let mut out = BytesMut::new();
        for byte in compressed.chunks(1) {
            inflater.feed(byte, &mut out, usize::MAX).unwrap();
        }
        inflater.finish(&mut out, usize::MAX).unwrap();

        assert_eq!(&out[..], &data[..]);
    }

    #[test]
    fn test_inflate_output_larger_than_buffer() {
        let data = vec![b'x'; BUF_SIZE * 8 + 17];
        let mut compressed = deflate(
            &mut Compress::new(Compression::default(), false),
            &data,
            FlushCompress::Sync,
        );
        compressed.truncate(compressed.len() - 4);
        assert!(compressed.len() < BUF_SIZE);

        let mut inflater = Inflater::new();
        let mut out = BytesMut::new();
        inflater.feed(&compressed, &mut out, usize::MAX).unwrap();
        inflater.finish(&mut out, usize::MAX).unwrap();

        assert_eq!(out.len(), data.len());
    }

    #[test]
    fn test_inflate_restarts_after_final_block() {
        let mut input = deflate(
            &mut Compress::new(Compression::default(), false),
            b"first stream",
            FlushCompress::Finish,
        );
        input.extend(deflate(
            &mut Compress::new(Compression::default(), false),
            b" and the second",
            FlushCompress::Finish,
        ));

        let mut inflater = Inflater::new();
        let mut out = BytesMut::new();
        inflater.feed(&input, &mut out, usize::MAX).unwrap();
        inflater.finish(&mut out, usize::MAX).unwrap();

        assert_eq!(&out[..], b"first stream and the second");
    }

    #[test]
    fn test_inflate_limit() {
        let data = vec![0u8; 4096];
        let mut compressed = deflate(
            &mut Compress::new(Compression::default(), false),
            &data,
            FlushCompress::Sync,
        );
        compressed.truncate(compressed.len() - 4);

        let mut inflater = Inflater::new();
        let mut out = BytesMut::new();
        let res = inflater
            .feed(&compressed, &mut out, 1024)
            .and_then(|_| inflater.finish(&mut out, 1024));
        assert!(matches!(res, Err(DeflateError::Overflow)));
    }

    #[test]
    fn test_inflate_invalid() {
        let mut inflater = Inflater::new();
        let mut out = BytesMut::new();
        assert!(matches!(
            inflater.feed(b"Hello World", &mut out, usize::MAX),
            Err(DeflateError::Inflate(_))
        ));
    }
}
