/// Default limit for a single decompressed message, 64 MiB.
const DEFAULT_MAX_SIZE: usize = 64 << 20;

/// Decoder configuration.
///
/// ```
/// use actix_ws_deflate::DeflateDecoderConfig;
///
/// let config = DeflateDecoderConfig::new()
///     .max_size(1 << 20)
///     .no_context_takeover(true);
///
/// assert_eq!(config.get_max_size(), 1 << 20);
/// assert!(config.is_no_context_takeover());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeflateDecoderConfig {
    max_size: usize,
    no_context_takeover: bool,
}

impl Default for DeflateDecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DeflateDecoderConfig {
    /// Creates configuration with default values.
    pub const fn new() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            no_context_takeover: false,
        }
    }

    /// Sets maximum size of a single decompressed message, summed across its fragments.
    ///
    /// By default max size is set to 64MiB.
    pub const fn max_size(mut self, size: usize) -> Self {
        self.max_size = size;
        self
    }

    /// Discards the sliding window after every message.
    ///
    /// Set this when `client_no_context_takeover` (server side) or `server_no_context_takeover`
    /// (client side) was negotiated. By default the window is kept, as RFC 7692 allows the peer
    /// to reference previous messages.
    pub const fn no_context_takeover(mut self, value: bool) -> Self {
        self.no_context_takeover = value;
        self
    }

    /// Returns the configured maximum message size.
    #[inline]
    pub const fn get_max_size(&self) -> usize {
        self.max_size
    }

    /// Returns `true` if the sliding window is discarded after every message.
    #[inline]
    pub const fn is_no_context_takeover(&self) -> bool {
        self.no_context_takeover
    }
}
