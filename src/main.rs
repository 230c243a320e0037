//! `sdn` binary entry point.

use clap::Parser;

use sd_notifier::cli_app;

fn main() {
    let cli = cli_app::Cli::parse();
    if let Err(err) = cli_app::run(&cli) {
        eprintln!("sdn: {err}");
        std::process::exit(1);
    }
}
