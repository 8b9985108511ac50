//! Logger setup: console always, plus an append-only log file when one is
//! configured.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};

use env_logger::{Env, Target};

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "app.log";

/// Copies every record to stderr and to the log file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// `LOG_FILE` unset means [`DEFAULT_LOG_FILE`]; set but empty means console only.
pub fn log_file_from_env() -> Option<String> {
    match std::env::var("LOG_FILE") {
        Ok(path) if path.is_empty() => None,
        Ok(path) => Some(path),
        Err(_) => Some(DEFAULT_LOG_FILE.to_string()),
    }
}

/// Installs the global logger. `RUST_LOG` picks the filter, default `info`.
pub fn init(log_file: Option<&str>) -> io::Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(path) = log_file {
        builder.target(Target::Pipe(Box::new(Tee { file: open(path)? })));
    }
    builder.init();
    Ok(())
}

fn open(path: &str) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
