//! SDN-prefixed error types with structured error codes.

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, NotifierError>;

/// Top-level error type for sd-notifier.
///
/// Absent or malformed supervision configuration is deliberately *not* an
/// error: it degrades to a disabled notifier (`enabled() == false`,
/// `timeout() == 0`). Only transmission itself can fail.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// The resolved address cannot be expressed on this platform.
    #[error("[SDN-1001] invalid channel address {address}: {details}")]
    InvalidAddress {
        /// Human-readable form of the offending address.
        address: String,
        /// What made the address unusable.
        details: String,
    },

    /// The one-shot datagram transmission failed.
    #[error("[SDN-2001] datagram send failure to {address}: {source}")]
    Transport {
        /// Human-readable form of the destination address.
        address: String,
        /// Underlying socket error, untranslated.
        #[source]
        source: std::io::Error,
    },
}

impl NotifierError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidAddress { .. } => "SDN-1001",
            Self::Transport { .. } => "SDN-2001",
        }
    }

    /// Whether retrying might resolve the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
