//! Environment boundary: supervision-channel discovery and watchdog-deadline
//! resolution from the variables systemd publishes into the service's
//! environment.
//!
//! All environment access goes through the [`ProcessEnv`] seam so the
//! resolution rules stay testable without mutating process state.

use std::time::Duration;

use tracing::debug;

use crate::transport::WireAddress;

/// Variable carrying the notification-socket address.
pub const NOTIFY_SOCKET_VAR: &str = "NOTIFY_SOCKET";
/// Variable carrying the watchdog window in microseconds.
pub const WATCHDOG_USEC_VAR: &str = "WATCHDOG_USEC";
/// Variable naming the pid the watchdog window applies to.
pub const WATCHDOG_PID_VAR: &str = "WATCHDOG_PID";

/// Read-only view of the process environment.
pub trait ProcessEnv {
    /// Look up a variable; `None` when unset or not valid unicode.
    fn var(&self, key: &str) -> Option<String>;

    /// The calling process id.
    fn pid(&self) -> u32;
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnv;

impl ProcessEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn pid(&self) -> u32 {
        std::process::id()
    }
}

/// Construction-time supervision parameters, resolved exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchdogConfig {
    /// Resolved channel address; `None` disables every operation.
    pub address: Option<WireAddress>,
    /// Watchdog window; zero means no heartbeat deadline applies.
    pub window: Duration,
}

impl WatchdogConfig {
    /// Resolve from the real process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::resolve(&SystemEnv, None)
    }

    /// Resolve from an environment view, preferring `address_override` (used
    /// by tests and embedders) over `NOTIFY_SOCKET`.
    ///
    /// The watchdog window is only consulted when an address resolved: a
    /// process that cannot reach the supervisor has no deadline to meet.
    #[must_use]
    pub fn resolve(env: &dyn ProcessEnv, address_override: Option<&str>) -> Self {
        let raw = address_override
            .map(str::to_owned)
            .or_else(|| env.var(NOTIFY_SOCKET_VAR));
        let address = raw.as_deref().and_then(WireAddress::from_env_value);
        let window = if address.is_some() {
            resolve_window(env)
        } else {
            Duration::ZERO
        };
        debug!(
            enabled = address.is_some(),
            window = ?window,
            "resolved supervision config"
        );
        Self { address, window }
    }
}

/// `WATCHDOG_USEC` is only authoritative for the process systemd is actually
/// tracking. When `WATCHDOG_PID` is present it must name the current process;
/// a foreign or malformed pid (an inherited environment, say as PID 1 inside
/// a container) leaves the window at zero instead of honoring the deadline
/// blindly.
fn resolve_window(env: &dyn ProcessEnv) -> Duration {
    let Some(usec) = env
        .var(WATCHDOG_USEC_VAR)
        .and_then(|raw| raw.parse::<u64>().ok())
    else {
        return Duration::ZERO;
    };
    match env.var(WATCHDOG_PID_VAR) {
        None => Duration::from_micros(usec),
        Some(raw) => match raw.parse::<u32>() {
            Ok(pid) if pid == env.pid() => Duration::from_micros(usec),
            _ => Duration::ZERO,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::{
        NOTIFY_SOCKET_VAR, ProcessEnv, WATCHDOG_PID_VAR, WATCHDOG_USEC_VAR, WatchdogConfig,
    };

    const TEST_ADDR: &str = "/run/test/notify";

    struct FakeEnv {
        vars: HashMap<&'static str, String>,
        pid: u32,
    }

    impl FakeEnv {
        fn new(entries: &[(&'static str, &str)]) -> Self {
            Self {
                vars: entries
                    .iter()
                    .map(|(key, value)| (*key, (*value).to_string()))
                    .collect(),
                pid: 4242,
            }
        }
    }

    impl ProcessEnv for FakeEnv {
        fn var(&self, key: &str) -> Option<String> {
            self.vars.get(key).cloned()
        }

        fn pid(&self) -> u32 {
            self.pid
        }
    }

    #[test]
    fn unset_socket_disables_supervision() {
        let config = WatchdogConfig::resolve(&FakeEnv::new(&[]), None);
        assert_eq!(config.address, None);
        assert_eq!(config.window, Duration::ZERO);
    }

    #[test]
    fn empty_socket_is_treated_as_unset() {
        let env = FakeEnv::new(&[(NOTIFY_SOCKET_VAR, "")]);
        let config = WatchdogConfig::resolve(&env, None);
        assert_eq!(config.address, None);
    }

    #[test]
    fn override_wins_over_environment() {
        let env = FakeEnv::new(&[(NOTIFY_SOCKET_VAR, "/run/other/notify")]);
        let config = WatchdogConfig::resolve(&env, Some(TEST_ADDR));
        let address = config.address.expect("override should resolve");
        assert_eq!(address.as_bytes(), TEST_ADDR.as_bytes());
    }

    #[test]
    fn window_accepted_without_pid_var() {
        let env = FakeEnv::new(&[
            (NOTIFY_SOCKET_VAR, TEST_ADDR),
            (WATCHDOG_USEC_VAR, "15000000"),
        ]);
        let config = WatchdogConfig::resolve(&env, None);
        assert_eq!(config.window, Duration::from_micros(15_000_000));
    }

    #[test]
    fn window_accepted_when_pid_matches() {
        let env = FakeEnv::new(&[
            (NOTIFY_SOCKET_VAR, TEST_ADDR),
            (WATCHDOG_USEC_VAR, "15000000"),
            (WATCHDOG_PID_VAR, "4242"),
        ]);
        let config = WatchdogConfig::resolve(&env, None);
        assert_eq!(config.window, Duration::from_micros(15_000_000));
    }

    #[test]
    fn window_rejected_for_foreign_pid() {
        // The classic container trap: environment inherited by PID 1.
        let env = FakeEnv::new(&[
            (NOTIFY_SOCKET_VAR, TEST_ADDR),
            (WATCHDOG_USEC_VAR, "15000000"),
            (WATCHDOG_PID_VAR, "1"),
        ]);
        let config = WatchdogConfig::resolve(&env, None);
        assert_eq!(config.window, Duration::ZERO);
        assert!(config.address.is_some(), "address stays resolved");
    }

    #[test]
    fn window_rejected_for_malformed_pid() {
        let env = FakeEnv::new(&[
            (NOTIFY_SOCKET_VAR, TEST_ADDR),
            (WATCHDOG_USEC_VAR, "15000000"),
            (WATCHDOG_PID_VAR, "not even a number"),
        ]);
        let config = WatchdogConfig::resolve(&env, None);
        assert_eq!(config.window, Duration::ZERO);
    }

    #[test]
    fn window_rejected_for_malformed_usec() {
        for bad in ["", "abc", "-5", "1.5"] {
            let env = FakeEnv::new(&[(NOTIFY_SOCKET_VAR, TEST_ADDR), (WATCHDOG_USEC_VAR, bad)]);
            let config = WatchdogConfig::resolve(&env, None);
            assert_eq!(config.window, Duration::ZERO, "usec {bad:?} should be rejected");
        }
    }

    #[test]
    fn window_not_consulted_without_address() {
        let env = FakeEnv::new(&[(WATCHDOG_USEC_VAR, "15000000")]);
        let config = WatchdogConfig::resolve(&env, None);
        assert_eq!(config.address, None);
        assert_eq!(config.window, Duration::ZERO);
    }
}
