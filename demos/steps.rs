//! Walk through a few steps to show both render modes.
//!
//! Run `cargo run --example steps` in a terminal for the animated mode, and
//! `cargo run --example steps | cat` (or with `CI=1`) for the static one.

use std::thread;
use std::time::Duration;

use clap::Parser;
use humanlog::{fields, Fields};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// humanlog demo.
#[derive(Debug, Parser)]
#[command(name = "steps")]
struct Cli {
    /// Milliseconds each step pretends to work
    #[arg(long, default_value_t = 400)]
    delay: u64,

    /// Make the last step fail
    #[arg(long)]
    fail: bool,

    /// Enable debug logging
    #[arg(long, env = "HUMANLOG_DEBUG")]
    debug: bool,
}

#[derive(Debug)]
struct UploadError(String);

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN, which keeps the demo output clean
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("humanlog=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("humanlog=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let delay = Duration::from_millis(cli.delay);
    let mut log = humanlog::log();

    log.info(
        "starting",
        fields! { animate = humanlog::can_animate(), delay_ms = cli.delay },
    );

    {
        let _step = log.step("resolve dependencies").scoped();
        thread::sleep(delay);
    }

    log.step("download");
    thread::sleep(delay);
    log.done(fields! { files = 12, size = "3.4 MB" });

    log.step("index");
    thread::sleep(delay);
    log.warn("cache is stale", fields! { age_days = 9 });

    let upload = log.run("upload", |_| {
        thread::sleep(delay);
        if cli.fail {
            Err(UploadError("remote closed the connection".to_string()))
        } else {
            Ok(3)
        }
    });

    match upload {
        Ok(count) => log.info("finished", fields! { uploaded = count }),
        Err(err) => log.error("giving up", Fields::new().with("reason", err.0)),
    }
}
