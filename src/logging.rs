use simplelog::{CombinedLogger, Config, LevelFilter, WriteLogger};
use std::fs::{self, OpenOptions};
use std::io::{Error, ErrorKind};
use std::path::Path;

/// Appends Debug-level logs to `<log_dir>/app.log`. Fails if a logger is
/// already installed.
pub fn init_logger(log_dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(log_dir)?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("app.log"))?;

    CombinedLogger::init(vec![WriteLogger::new(
        LevelFilter::Debug,
        Config::default(),
        log_file,
    )])
    .map_err(|e| Error::new(ErrorKind::Other, format!("Logger initialization failed: {}", e)))
}

/// Logs to stderr, filtered by `RUST_LOG` (default `debug`).
pub fn init_stderr_logger() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .try_init()
        .map_err(|e| Error::new(ErrorKind::Other, format!("Logger initialization failed: {}", e)))
}
