//! Logging Setup
//!
//! Routes `tracing` and `log` output through the rolling logger into the
//! browser console, keeping the recent lines for the error view.

use std::sync::{Arc, OnceLock};

use rolling_logger::{LogLine, LogSink, RollingBuffer};
use tracing::Level;

use crate::config::AppConfig;

static BUFFER: OnceLock<RollingBuffer> = OnceLock::new();

/// Sink writing each line to the matching console method
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write(&self, line: &LogLine) {
        let text = wasm_bindgen::JsValue::from_str(&line.to_string());
        match line.level {
            Level::ERROR => web_sys::console::error_1(&text),
            Level::WARN => web_sys::console::warn_1(&text),
            Level::INFO => web_sys::console::info_1(&text),
            Level::DEBUG => web_sys::console::debug_1(&text),
            Level::TRACE => web_sys::console::log_1(&text),
        }
    }
}

pub fn init(config: &AppConfig) {
    match rolling_logger::init(config.log_capacity, &config.log_level, Arc::new(ConsoleSink)) {
        Ok(buffer) => {
            let _ = BUFFER.set(buffer);
            tracing::info!("[APP] Logging at {} ({} lines kept)", config.log_level, config.log_capacity);
        }
        Err(e) => web_sys::console::warn_1(&format!("[APP] Logger not installed: {}", e).into()),
    }
}

/// Last `n` captured lines, oldest first
pub fn recent_lines(n: usize) -> Vec<String> {
    BUFFER
        .get()
        .map(|buffer| buffer.tail(n).iter().map(ToString::to_string).collect())
        .unwrap_or_default()
}
