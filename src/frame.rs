use std::fmt;

use bitflags::bitflags;
use bytes::Bytes;
use tracing::error;

/// Operation codes defined in [RFC 6455 §11.8].
///
/// [RFC 6455 §11.8]: https://datatracker.ietf.org/doc/html/rfc6455#section-11.8
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum OpCode {
    /// Indicates a continuation frame of a fragmented message.
    Continue,

    /// Indicates a text data frame.
    Text,

    /// Indicates a binary data frame.
    Binary,

    /// Indicates a close control frame.
    Close,

    /// Indicates a ping control frame.
    Ping,

    /// Indicates a pong control frame.
    Pong,

    /// Indicates an invalid opcode was received.
    Bad,
}

impl OpCode {
    /// Returns `true` for opcodes that carry (part of) a data message.
    #[inline]
    pub fn is_data(self) -> bool {
        matches!(self, OpCode::Continue | OpCode::Text | OpCode::Binary)
    }

    /// Returns `true` for close, ping and pong frames.
    #[inline]
    pub fn is_control(self) -> bool {
        matches!(self, OpCode::Close | OpCode::Ping | OpCode::Pong)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use OpCode::*;

        match self {
            Continue => write!(f, "CONTINUE"),
            Text => write!(f, "TEXT"),
            Binary => write!(f, "BINARY"),
            Close => write!(f, "CLOSE"),
            Ping => write!(f, "PING"),
            Pong => write!(f, "PONG"),
            Bad => write!(f, "BAD"),
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> u8 {
        use self::OpCode::*;

        match op {
            Continue => 0,
            Text => 1,
            Binary => 2,
            Close => 8,
            Ping => 9,
            Pong => 10,
            Bad => {
                error!("Attempted to convert invalid opcode to u8. This is a bug.");
                8 // if this somehow happens, a close frame will help us tear down quickly
            }
        }
    }
}

impl From<u8> for OpCode {
    fn from(byte: u8) -> OpCode {
        use self::OpCode::*;

        match byte {
            0 => Continue,
            1 => Text,
            2 => Binary,
            8 => Close,
            9 => Ping,
            10 => Pong,
            _ => Bad,
        }
    }
}

bitflags! {
    /// Reserved bits of a WebSocket frame header.
    ///
    /// Values match the bit positions in the first header byte, so `RsvBits::from_bits_truncate`
    /// can be applied to that byte directly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RsvBits: u8 {
        /// Used by permessage-deflate to mark the first frame of a compressed message.
        const RSV1 = 0b0100_0000;
        /// Reserved for extensions.
        const RSV2 = 0b0010_0000;
        /// Reserved for extensions.
        const RSV3 = 0b0001_0000;
    }
}

/// A single WebSocket data or control frame, after header parsing and unmasking.
///
/// Frames are immutable once built. Decoding stages consume a frame and return a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    opcode: OpCode,
    fin: bool,
    rsv: RsvBits,
    payload: Bytes,
}

impl Frame {
    /// Constructs a frame from its parts.
    pub fn new(opcode: OpCode, fin: bool, rsv: RsvBits, payload: impl Into<Bytes>) -> Self {
        Self {
            opcode,
            fin,
            rsv,
            payload: payload.into(),
        }
    }

    /// Constructs a text frame.
    pub fn text(fin: bool, rsv: RsvBits, payload: impl Into<Bytes>) -> Self {
        Self::new(OpCode::Text, fin, rsv, payload)
    }

    /// Constructs a binary frame.
    pub fn binary(fin: bool, rsv: RsvBits, payload: impl Into<Bytes>) -> Self {
        Self::new(OpCode::Binary, fin, rsv, payload)
    }

    /// Constructs a continuation frame.
    pub fn continuation(fin: bool, rsv: RsvBits, payload: impl Into<Bytes>) -> Self {
        Self::new(OpCode::Continue, fin, rsv, payload)
    }

    /// Frame opcode.
    #[inline]
    pub fn opcode(&self) -> OpCode {
        self.opcode
    }

    /// Returns `true` if this is the last fragment of its message.
    #[inline]
    pub fn fin(&self) -> bool {
        self.fin
    }

    /// Reserved header bits.
    #[inline]
    pub fn rsv(&self) -> RsvBits {
        self.rsv
    }

    /// Frame payload.
    #[inline]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Length of the payload in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Returns `true` if the payload is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Returns `true` for continuation frames.
    #[inline]
    pub fn is_continuation(&self) -> bool {
        self.opcode == OpCode::Continue
    }

    /// Consumes the frame, returning its payload.
    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    /// Consumes the frame, returning `(opcode, fin, rsv, payload)`.
    pub fn into_parts(self) -> (OpCode, bool, RsvBits, Bytes) {
        (self.opcode, self.fin, self.rsv, self.payload)
    }
}
