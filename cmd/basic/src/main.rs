//! Basic errkind example
//!
//! Declares templates, wraps a foreign `std::io::Error`, recovers typed data
//! from the chain, and logs the diagnostic tree. Then throttles capture and
//! shows how many occurrences in a burst keep their frames.
//!
//! Log level follows `RUST_LOG` (default `debug`).

use std::fs::File;
use std::time::{Duration, Instant};

use errkind::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

define_template! {
    static ERR_OPEN = "can not open file %s" { "subsystem" => "storage" };
    static ERR_LOAD = "loading %s configuration failed";
}

fn open(path: &str) -> Result<File, Occurrence> {
    File::open(path).map_err(|e| ERR_OPEN.args([path]).set("path", path).wrap(e))
}

fn load(name: &str) -> Result<File, Occurrence> {
    let path = format!("/nonexistent/{}.toml", name);
    open(&path).map_err(|e| ERR_LOAD.args([name]).set("attempt", 1).wrap(e))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    println!("=== errkind Basic Example ===\n");

    let err = match load("server") {
        Ok(_) => {
            println!("unexpectedly opened the file");
            return;
        }
        Err(err) => err,
    };

    println!("error:   {}", err);
    println!("message: {}", err.message());
    println!("is ERR_OPEN somewhere in the chain: {}", ERR_OPEN.matches(&err));

    if let Some(innermost) = last(&err) {
        println!(
            "innermost: {:?} (subsystem={:?})",
            innermost.message(),
            innermost.get_str("subsystem")
        );
    }

    let mut slot = Some(ERR_OPEN.instantiate());
    if extract(&err, &mut slot) {
        if let Some(open_err) = &slot {
            println!("extracted path: {:?}", open_err.get_str("path"));
        }
    }

    let attrs = err.attributes("err", true);
    error!(%attrs, "configuration load failed");

    println!("\n--- Throttled burst ---");
    if let Err(e) = errkind::throttle(Duration::from_millis(10), 5) {
        error!(error = %e, "could not throttle capture");
        return;
    }

    let start = Instant::now();
    let (mut with_frames, mut without) = (0usize, 0usize);
    while start.elapsed() < Duration::from_millis(40) {
        if ERR_LOAD.instantiate().frames().is_empty() {
            without += 1;
        } else {
            with_frames += 1;
        }
    }
    errkind::unthrottle();

    info!(with_frames, without, "burst finished");
    println!("{} occurrences with frames, {} without", with_frames, without);

    println!("\n=== Example Complete ===");
}
