//! Top-level CLI definition and dispatch.

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::notifier::Notifier;
use crate::transport::WireAddress;

/// sd-notifier — report readiness, status, and watchdog heartbeats to the
/// supervising service manager.
#[derive(Parser)]
#[command(name = "sdn", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Report completed startup (READY=1).
    Ready,
    /// Set the status line shown by `systemctl status`.
    Status {
        /// Status text; newlines and NUL bytes are not allowed.
        message: String,
    },
    /// Send a single watchdog heartbeat (WATCHDOG=1).
    Watchdog,
    /// Trip the watchdog immediately (WATCHDOG=trigger).
    Trigger {
        /// Status message to report before tripping the watchdog.
        #[arg(long)]
        status: Option<String>,
    },
    /// Show supervision-channel state for the current environment.
    Info {
        /// Emit machine-readable JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct InfoPayload {
    enabled: bool,
    address: Option<String>,
    abstract_namespace: bool,
    timeout_usec: u64,
}

impl InfoPayload {
    fn gather(notifier: &Notifier) -> Self {
        Self {
            enabled: notifier.enabled(),
            address: notifier.address().map(WireAddress::to_string),
            abstract_namespace: notifier.address().is_some_and(WireAddress::is_abstract),
            timeout_usec: notifier.timeout(),
        }
    }
}

/// Dispatch CLI commands against a notifier built from the environment.
///
/// A missing supervision channel is a successful no-op, matching the library
/// contract; only transport failures exit nonzero.
///
/// # Errors
/// Returns an error if the subcommand fails.
pub fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut notifier = Notifier::from_env();
    match &cli.command {
        Command::Ready => notifier.ready()?,
        Command::Status { message } => notifier.status(message)?,
        Command::Watchdog => notifier.notify()?,
        Command::Trigger { status } => notifier.notify_error(status.as_deref())?,
        Command::Info { json } => {
            let info = InfoPayload::gather(&notifier);
            if *json {
                println!("{}", serde_json::to_string(&info)?);
            } else {
                println!("enabled: {}", info.enabled);
                println!(
                    "address: {}",
                    info.address.as_deref().unwrap_or("(not set)")
                );
                println!("abstract namespace: {}", info.abstract_namespace);
                println!("watchdog timeout: {} usec", info.timeout_usec);
            }
        }
    }
    Ok(())
}
