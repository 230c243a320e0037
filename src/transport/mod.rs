//! Wire addressing and the datagram send capability.

use std::fmt;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::net::UnixDatagram;
use std::path::Path;

use tracing::debug;

use crate::core::errors::{NotifierError, Result};

/// Resolved supervision-channel address, stored as the wire-level byte value.
///
/// systemd publishes abstract-namespace sockets in `NOTIFY_SOCKET` with a
/// leading `@`, but the kernel expects that byte to be a NUL instead. The
/// transform happens exactly once, here, so everything downstream sees the
/// value the transport actually needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireAddress(Vec<u8>);

impl WireAddress {
    /// Parse an address as published in the environment. Returns `None` for
    /// an empty value, which means supervision is disabled.
    #[must_use]
    pub fn from_env_value(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        let mut bytes = raw.as_bytes().to_vec();
        // Only the first byte carries the abstract-namespace marker.
        if bytes[0] == b'@' {
            bytes[0] = 0;
        }
        Some(Self(bytes))
    }

    /// The wire-level address bytes handed to the transport.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether this is an abstract-namespace address (leading NUL).
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.0.first() == Some(&0)
    }
}

impl fmt::Display for WireAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_abstract() {
            write!(f, "@{}", String::from_utf8_lossy(&self.0[1..]))
        } else {
            write!(f, "{}", String::from_utf8_lossy(&self.0))
        }
    }
}

/// One-shot "send these bytes to that address" capability.
///
/// Satisfied by [`UnixDatagramTransport`] in production and by recording
/// doubles in tests. Fire-and-forget: no retry, no buffering, no
/// acknowledgment. Failures surface untranslated to the caller.
pub trait Transport {
    /// Attempt a single datagram transmission.
    fn send_to(&self, payload: &[u8], address: &WireAddress) -> Result<()>;
}

/// Production transport: an unbound unix datagram socket per send.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnixDatagramTransport;

impl Transport for UnixDatagramTransport {
    fn send_to(&self, payload: &[u8], address: &WireAddress) -> Result<()> {
        let socket = UnixDatagram::unbound().map_err(|source| NotifierError::Transport {
            address: address.to_string(),
            source,
        })?;
        if address.is_abstract() {
            send_abstract(&socket, payload, address)?;
        } else {
            let path = Path::new(std::ffi::OsStr::from_bytes(address.as_bytes()));
            socket
                .send_to(payload, path)
                .map_err(|source| NotifierError::Transport {
                    address: address.to_string(),
                    source,
                })?;
        }
        debug!(address = %address, bytes = payload.len(), "sent notification datagram");
        Ok(())
    }
}

#[cfg(target_os = "linux")]
fn send_abstract(socket: &UnixDatagram, payload: &[u8], address: &WireAddress) -> Result<()> {
    use std::os::linux::net::SocketAddrExt;

    let name = &address.as_bytes()[1..];
    let target = std::os::unix::net::SocketAddr::from_abstract_name(name).map_err(|source| {
        NotifierError::Transport {
            address: address.to_string(),
            source,
        }
    })?;
    socket
        .send_to_addr(payload, &target)
        .map_err(|source| NotifierError::Transport {
            address: address.to_string(),
            source,
        })?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn send_abstract(_socket: &UnixDatagram, _payload: &[u8], address: &WireAddress) -> Result<()> {
    Err(NotifierError::InvalidAddress {
        address: address.to_string(),
        details: "abstract-namespace sockets are only available on linux".to_string(),
    })
}
