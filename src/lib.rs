//! WebSocket permessage-deflate ([RFC 7692]) decompression for the Actix ecosystem.
//!
//! This crate implements the receiving half of the extension: a [`DeflateDecoder`] sits between
//! frame parsing and message assembly, inflates the payload of every frame of a compressed
//! message and clears the RSV1 marker. Fragmented messages, several deflate blocks in one
//! payload, and per-message opt-out through a [`FrameFilter`] are supported.
//!
//! Handshake and parameter negotiation are not handled here; configure the decoder with the
//! outcome using [`DeflateDecoderConfig`].
//!
//! # Examples
//! ```
//! use actix_ws_deflate::{DeflateDecoder, Frame, OpCode, RsvBits};
//!
//! // only decompress binary messages
//! let mut decoder = DeflateDecoder::with_filter(|frame: &Frame| frame.opcode() != OpCode::Binary);
//!
//! let text = Frame::text(true, RsvBits::RSV1, &b"\xf2H\xcd\xc9\xc9W\x08\xcf/\xcaI\x01\0"[..]);
//! let out = decoder.decode(text.clone()).unwrap();
//! assert_eq!(out, text);
//! ```
//!
//! [RFC 7692]: https://datatracker.ietf.org/doc/html/rfc7692

#![deny(rust_2018_idioms, nonstandard_style)]
#![warn(future_incompatible, missing_docs)]
#![doc(html_logo_url = "https://actix.rs/img/logo.png")]
#![doc(html_favicon_url = "https://actix.rs/favicon.ico")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod config;
mod decoder;
mod error;
mod filter;
mod frame;
mod inflate;
mod state;
mod stream;

pub use self::config::DeflateDecoderConfig;
pub use self::decoder::DeflateDecoder;
pub use self::error::DeflateError;
pub use self::filter::{AlwaysSkip, FrameFilter, NeverSkip};
pub use self::frame::{Frame, OpCode, RsvBits};
pub use self::stream::Decompressed;
