//! The notifier: lifecycle, status, and heartbeat reporting plus due-time
//! tracking for the supervisor's watchdog window.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::config::WatchdogConfig;
use crate::core::errors::Result;
use crate::transport::{Transport, UnixDatagramTransport, WireAddress};

/// Client handle for the supervision channel.
///
/// One instance per supervised process. The channel address and watchdog
/// window are fixed at construction; the only mutable state is the timestamp
/// of the last heartbeat, written solely by [`notify`](Self::notify) (the
/// `&mut self` receiver makes concurrent writes a compile error rather than
/// a documentation footnote).
///
/// When no channel address resolved, every message operation is a silent
/// no-op. That is the normal state for a process started outside the
/// supervisor and deliberately not an error.
pub struct Notifier {
    address: Option<WireAddress>,
    window: Duration,
    last_ping: Option<Instant>,
    transport: Box<dyn Transport>,
}

impl Notifier {
    /// Build from the real process environment and the production unix
    /// datagram transport.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(WatchdogConfig::from_env(), Box::new(UnixDatagramTransport))
    }

    /// Build from explicit parts. This is the injection seam: tests pass a
    /// recording transport, embedders can pass anything that satisfies
    /// [`Transport`].
    #[must_use]
    pub fn new(config: WatchdogConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            address: config.address,
            window: config.window,
            last_ping: None,
            transport,
        }
    }

    /// Whether a supervision channel resolved at construction.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.address.is_some()
    }

    /// The resolved channel address, if any.
    #[must_use]
    pub fn address(&self) -> Option<&WireAddress> {
        self.address.as_ref()
    }

    /// Report completed startup (`READY=1`).
    pub fn ready(&self) -> Result<()> {
        self.send("READY=1\n")
    }

    /// Report a free-form status line (`STATUS=<msg>`).
    ///
    /// The message must not contain NUL bytes; newlines would start a new
    /// protocol line on the supervisor side.
    pub fn status(&self, msg: &str) -> Result<()> {
        self.send(&format!("STATUS={msg}\n"))
    }

    /// Send a watchdog heartbeat (`WATCHDOG=1`) and record its time.
    pub fn notify(&mut self) -> Result<()> {
        if self.enabled() {
            self.last_ping = Some(Instant::now());
        }
        self.send("WATCHDOG=1\n")
    }

    /// Trip the watchdog immediately (`WATCHDOG=trigger`), optionally
    /// reporting `msg` as a status line first.
    ///
    /// The status and the trigger are two independent datagrams, in that
    /// order. The supervisor will likely kill this process shortly after
    /// the trigger arrives.
    pub fn notify_error(&self, msg: Option<&str>) -> Result<()> {
        if let Some(msg) = msg {
            self.status(msg)?;
        }
        self.send("WATCHDOG=trigger\n")
    }

    /// The watchdog window in microseconds; zero when no deadline applies.
    #[must_use]
    pub fn timeout(&self) -> u64 {
        u64::try_from(self.window.as_micros()).unwrap_or(u64::MAX)
    }

    /// The watchdog window as a [`Duration`]; zero when no deadline applies.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether a heartbeat is due now.
    ///
    /// True once half the watchdog window has elapsed since the last
    /// [`notify`](Self::notify) — heartbeating at twice the required rate is
    /// the safety margin against being killed for a single late ping. Before
    /// the first heartbeat this is always true.
    #[must_use]
    pub fn notify_due(&self) -> bool {
        self.notify_due_at(Instant::now())
    }

    /// Due-time predicate against an explicit clock reading.
    #[must_use]
    pub fn notify_due_at(&self, now: Instant) -> bool {
        self.last_ping
            .is_none_or(|last| now.duration_since(last) >= self.window / 2)
    }

    /// Encode and transmit one protocol line; no-op while disabled.
    fn send(&self, text: &str) -> Result<()> {
        let Some(address) = &self.address else {
            trace!(payload = text.trim_end(), "supervision disabled, dropping message");
            return Ok(());
        };
        self.transport.send_to(text.as_bytes(), address)
    }
}
