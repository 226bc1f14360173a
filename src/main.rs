//! Main entry point for the quickdl server

use anyhow::Context;
use clap::Parser;
use quickdl::cli::{Args, OutputFormatter, VerbosityLevel};
use quickdl::server::{run_server, AppState};
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbosity_level());
    debug!("Starting quickdl with args: {:?}", args);

    let formatter = OutputFormatter::new(args.verbosity_level());
    let options = args.resolver_options();
    let addr = args.listen_addr();

    let state = AppState::new(&options).context("building upstream HTTP clients")?;

    formatter.print_server_start(addr, &options);
    info!(
        "Serving with {} mirror(s), lookup timeout {:?}, stream timeout {:?}",
        options.mirrors.len(),
        options.lookup_timeout,
        options.stream_timeout
    );

    let started = Instant::now();
    if let Err(e) = run_server(addr, state).await {
        formatter.error(&format!("Server error: {}", e));
        return Err(e).with_context(|| format!("running server on {}", addr));
    }

    formatter.print_server_stop(started.elapsed());
    Ok(())
}

/// Initialize logging system; `RUST_LOG` takes precedence over the CLI verbosity
fn init_logging(verbosity: VerbosityLevel) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(verbosity.log_filter()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}
