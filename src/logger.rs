//! Logging setup: `🦀`-prefixed text through env_logger, or JSON lines

use chrono::{Local, Utc};
use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use serde_json::json;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};

/// Environment variable holding the log level, optionally `json:`-prefixed
pub const LOG_LEVEL_ENV: &str = "BUNDLEFS_LOG_LEVEL";
/// Environment variable naming a file that receives JSON log lines
pub const LOG_PATH_ENV: &str = "BUNDLEFS_LOG_PATH";

const DEFAULT_LEVEL: &str = "info";

/// JSON logger implementation
#[derive(Debug)]
pub struct JsonLogger {
    level: Level,
    target_file: Mutex<Option<File>>,
}

impl JsonLogger {
    pub fn new(level: Level, log_path: Option<String>) -> Self {
        let target_file =
            log_path.and_then(|path| OpenOptions::new().create(true).append(true).open(path).ok());

        JsonLogger {
            level,
            target_file: Mutex::new(target_file),
        }
    }

    /// Install the global logger for `level_str` ("debug", "json:trace", ...)
    ///
    /// Returns the effective level and the source it came from.
    pub fn init_with_level(level_str: &str, source: &str) -> (String, String) {
        let (use_json, actual_level) = split_level(level_str);

        if !use_json {
            let installed = env_logger::Builder::new()
                .filter_level(parse_filter(actual_level))
                .format(|buf, record| {
                    writeln!(
                        buf,
                        "🦀 [{} {} {}] {}",
                        Local::now().format("%Y-%m-%dT%H:%M:%S"),
                        record.level(),
                        record.target(),
                        record.args()
                    )
                })
                .try_init();
            if let Err(e) = installed {
                eprintln!("Failed to initialize logger: {e}");
            }
            return (actual_level.to_string(), source.to_string());
        }

        let filter = parse_filter(actual_level);
        let level = filter.to_level().unwrap_or(Level::Error);
        let logger = Box::new(JsonLogger::new(level, env::var(LOG_PATH_ENV).ok()));

        if let Err(e) = log::set_boxed_logger(logger) {
            eprintln!("Failed to initialize JSON logger: {e}");
            return (actual_level.to_string(), source.to_string());
        }

        log::set_max_level(filter);
        (actual_level.to_string(), source.to_string())
    }

    /// Install the global logger from `BUNDLEFS_LOG_LEVEL`, defaulting to info
    pub fn init() -> (String, String) {
        let log_level = env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| DEFAULT_LEVEL.to_string());
        Self::init_with_level(&log_level, LOG_LEVEL_ENV)
    }

    fn write_line(&self, line: &str) {
        let mut guard = self.target_file.lock();
        if let Some(file) = guard.as_mut() {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        } else {
            let mut stderr = io::stderr().lock();
            let _ = stderr.write_all(line.as_bytes());
            let _ = stderr.flush();
        }
    }
}

impl Log for JsonLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!("{}\n", json_line(record));
        self.write_line(&line);
    }

    fn flush(&self) {
        if let Some(file) = self.target_file.lock().as_mut() {
            let _ = file.flush();
        }
        let _ = io::stderr().flush();
    }
}

fn json_line(record: &Record<'_>) -> String {
    let entry = json!({
        "@timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        "@level": record.level().to_string().to_lowercase(),
        "@message": record.args().to_string(),
        "@module": record.target(),
        "@pid": std::process::id(),
        "@file": record.file().unwrap_or("unknown"),
        "@line": record.line().unwrap_or(0),
    });
    serde_json::to_string(&entry).unwrap_or_default()
}

/// Split `json:<level>` / `json` / `<level>` into (is_json, level)
fn split_level(level_str: &str) -> (bool, &str) {
    if let Some(stripped) = level_str.strip_prefix("json:") {
        (true, stripped)
    } else if level_str == "json" {
        (true, DEFAULT_LEVEL)
    } else {
        (false, level_str)
    }
}

fn parse_filter(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// Helper to check if JSON logging is enabled
pub fn is_json_logging() -> bool {
    env::var(LOG_LEVEL_ENV)
        .map(|v| v.starts_with("json"))
        .unwrap_or(false)
}
