// src/log.rs
use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::consts::LOG_FILE;
use crate::config::options::{LogOptions, RunOptions};

/// Install the global subscriber: stderr always, `<store_dir>/debug.log`
/// when enabled. `RUST_LOG` wins over `--verbose`.
/// Safe to call more than once; later calls are ignored.
pub fn init(log: &LogOptions, run: &RunOptions) {
    let default_level = if log.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = if log.to_file {
        let _ = fs::create_dir_all(&run.store_dir);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(run.store_dir.join(LOG_FILE))
            .ok()
            .map(|file| {
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false)
            })
    } else {
        None
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::tracing::error!($($arg)*)
    };
}
