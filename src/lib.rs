//! sd_notify(3) client for systemd-supervised services.
//!
//! A supervised process reports lifecycle and health state — readiness,
//! status text, watchdog heartbeats, fatal-error triggers — over the unix
//! datagram socket systemd publishes in `NOTIFY_SOCKET`, and learns from
//! `WATCHDOG_USEC`/`WATCHDOG_PID` whether and how often it must heartbeat to
//! avoid being killed as unresponsive.
//!
//! Outside a supervisor everything degrades to a silent no-op, so the same
//! binary runs unchanged on a developer machine and under `Type=notify`.
//!
//! ```no_run
//! use sd_notifier::Notifier;
//!
//! let mut notify = Notifier::from_env();
//!
//! notify.status("initialising")?;
//! // ... startup work ...
//! notify.ready()?;
//!
//! // Main loop: heartbeat at twice the supervisor's required rate.
//! for _ in 0..100 {
//!     if notify.notify_due() {
//!         notify.notify()?;
//!     }
//!     std::thread::sleep(std::time::Duration::from_millis(250));
//! }
//!
//! // On an unrecoverable fault, ask the supervisor to take us down.
//! notify.notify_error(Some("irrecoverable error, requesting restart"))?;
//! # Ok::<(), sd_notifier::NotifierError>(())
//! ```

#[cfg(feature = "cli")]
pub mod cli_app;
pub mod config;
pub mod core;
pub mod notifier;
pub mod transport;

pub use crate::core::errors::{NotifierError, Result};
pub use config::{ProcessEnv, SystemEnv, WatchdogConfig};
pub use notifier::Notifier;
pub use transport::{Transport, UnixDatagramTransport, WireAddress};
