//! Subscriber setup for the command-line tools. The core library only emits
//! events; installing a subscriber is left to the binaries.

use std::io;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info";

static TRACING_INIT: Once = Once::new();

/// Installs a compact stderr subscriber. `RUST_LOG` wins over `fallback`.
/// Only the first call has any effect.
pub fn init_tracing(fallback: &str) {
    let fallback = fallback.to_string();
    TRACING_INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(&fallback).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        });

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .compact();

        // A test harness may already have installed one.
        let _ = subscriber.try_init();
    });
}
