use std::process;

use clap::Parser;
use tracing::error;

use example_app::cli::Cli;
use example_app::logging::init_logging;
use example_app::Shutdown;

#[tokio::main]
async fn main() {
    if let Err(e) = init_logging() {
        eprintln!("[FATAL] Failed to initialise logging: {e}");
        process::exit(1);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help / --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            error!("{e}");
            process::exit(e.exit_code());
        }
    };

    let shutdown = Shutdown::new();
    let listener = shutdown.listen();
    let _signals = shutdown.monitor_signals();

    if let Err(e) = cli.run(listener).await {
        error!("[FATAL] {e:#}");
        process::exit(1);
    }
}
