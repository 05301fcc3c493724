use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::args::LogArgs;

/// Installs the stderr subscriber. `RUST_LOG` overrides the flag-derived level.
pub fn init(args: &LogArgs) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for(args).into())
        .from_env_lossy();

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    // A second init (tests driving several commands) is not an error worth surfacing.
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

fn level_for(args: &LogArgs) -> LevelFilter {
    if args.debug {
        LevelFilter::DEBUG
    } else if args.verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}
