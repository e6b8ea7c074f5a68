//! driver-installer
//!
//! Install hook that fetches ChromeDriver for the current platform and
//! places it next to the package being installed.

mod cli;
mod console;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::info!("Starting driver-installer v{}", driver_installer_core::VERSION);

    // One install run is strictly sequential, so a single-threaded runtime is enough.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("driver-installer error: failed to start runtime: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = runtime.block_on(cli.run()) {
        eprintln!("driver-installer error: {:#}", err);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays reserved for status lines and JSON.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
