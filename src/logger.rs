//! Session logger - a `log` backend writing to a single file.
//!
//! The file is **truncated at each launch**, so it only ever contains output
//! from the most recent run. Each record is written as
//! `[HH:MM:SS] [LEVEL] target: message`. Warnings and errors are mirrored to
//! stderr. A panic hook copies panic messages into the log before the default
//! handler runs.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{Level, LevelFilter, Log, Metadata, Record};

static LOGGER: OnceLock<SessionLogger> = OnceLock::new();

struct SessionLogger {
    file: Mutex<File>,
    path: PathBuf,
    level: LevelFilter,
}

impl Log for SessionLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{}] {}: {}",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", line);
        }
        if record.level() <= Level::Warn {
            eprintln!("{}", line);
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Path of the current session log, once [`init`] has succeeded.
pub fn log_path() -> Option<&'static Path> {
    LOGGER.get().map(|l| l.path.as_path())
}

/// Install the session logger as the global `log` backend.
///
/// * Creates (or truncates) the log file at `path`.
/// * Installs a panic hook that writes the panic message to the log before
///   running the previous hook.
pub fn init(path: &Path, level: LevelFilter) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let logger = LOGGER.get_or_init(|| SessionLogger {
        file: Mutex::new(file),
        path: path.to_path_buf(),
        level,
    });
    log::set_logger(logger).map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))?;
    log::set_max_level(level);

    if let Ok(mut file) = logger.file.lock() {
        let _ = writeln!(file, "=== paint-engine session started {} ===", human_timestamp());
    }

    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log::error!(target: "panic", "{}", info);
        log::logger().flush();
        prev(info);
    }));
    Ok(())
}

/// Default log location: `$XDG_DATA_HOME/paint-engine/paint-engine.log`,
/// falling back to `~/.local/share` and finally the working directory.
pub fn default_log_path() -> PathBuf {
    data_dir().join("paint-engine").join("paint-engine.log")
}

fn data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata);
        }
    }
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    PathBuf::from(".")
}

/// Time of day as `HH:MM:SS` (UTC).
fn timestamp() -> String {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => {
            let secs = d.as_secs();
            format!("{:02}:{:02}:{:02}", (secs % 86400) / 3600, (secs % 3600) / 60, secs % 60)
        }
        Err(_) => "??:??:??".to_string(),
    }
}

fn human_timestamp() -> String {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => format!("(unix {})", d.as_secs()),
        Err(_) => "(unknown time)".to_string(),
    }
}
