//! queuecalc CLI
//!
//! Command-line interface for computing queueing model metrics.

use std::process::ExitCode;

use queuecalc::cli::{run_cli, Args};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("queuecalc=warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run_cli(Args::parse())
}
