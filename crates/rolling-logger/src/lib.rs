//! Rolling Logger
//!
//! `log` backend keeping the most recent formatted records in a circular
//! buffer. Records are echoed to `console.*` in the browser and to stderr
//! elsewhere.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

pub struct RollingLogger {
    app_name: String,
    capacity: usize,
    level: LevelFilter,
    echo: bool,
    buffer: Mutex<VecDeque<String>>,
}

impl RollingLogger {
    pub fn new(app_name: impl Into<String>, capacity: usize, level: LevelFilter) -> Self {
        Self {
            app_name: app_name.into(),
            capacity: capacity.max(1),
            level,
            echo: true,
            buffer: Mutex::new(VecDeque::new()),
        }
    }

    /// Keep records in the buffer only
    pub fn silent(mut self) -> Self {
        self.echo = false;
        self
    }

    fn format(&self, record: &Record) -> String {
        format!(
            "[{}] {:<5} {}: {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            self.app_name,
            record.args()
        )
    }

    fn push(&self, line: String) {
        let Ok(mut buffer) = self.buffer.lock() else {
            return;
        };
        while buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(line);
    }

    /// Up to `n` most recent lines, oldest first
    pub fn recent(&self, n: usize) -> Vec<String> {
        match self.buffer.lock() {
            Ok(buffer) => buffer.iter().skip(buffer.len().saturating_sub(n)).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.clear();
        }
    }
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record);
        if self.echo {
            echo(record.level(), &line);
        }
        self.push(line);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn echo(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::log_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn echo(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// Install the global logger. Fails if a logger is already set.
pub fn init_logger(app_name: &str, capacity: usize, level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| RollingLogger::new(app_name, capacity, level));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// The installed logger, if any
pub fn logger() -> Option<&'static RollingLogger> {
    LOGGER.get()
}

/// Recent lines from the installed logger
pub fn recent(n: usize) -> Vec<String> {
    logger().map(|l| l.recent(n)).unwrap_or_default()
}

pub fn info(message: &str) {
    log::info!("{}", message);
}

pub fn error(message: &str) {
    log::error!("{}", message);
}
