//! Logger setup: console output plus an optional daily log file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use log::LevelFilter;

/// Writes every record to stderr and, if present, to a log file.
struct TeeWriter {
    file: Option<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

/// Log file for today inside `log_dir`: `ml_tn_sync_YYYY-MM-DD.log`
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("ml_tn_sync_{}.log", Local::now().format("%Y-%m-%d")))
}

/// Initializes the global logger.
///
/// `RUST_LOG` still overrides the level chosen by `debug`. Returns the log
/// file path when file logging is enabled.
pub fn init(debug: bool, log_dir: Option<&Path>) -> io::Result<Option<PathBuf>> {
    let (file, path) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let path = log_file_path(dir);
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            (Some(file), Some(path))
        }
        None => (None, None),
    };

    let level = if debug { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(TeeWriter { file })))
        .init();

    log::info!("Logger initialized at level {}", level);
    if let Some(path) = &path {
        log::info!("Writing logs to {}", path.display());
    }
    Ok(path)
}
