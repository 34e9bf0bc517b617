//! Rolling Logger
//!
//! Keeps the most recent log lines in a bounded in-memory buffer and hands
//! every line to a [`LogSink`]. Installs itself both as a `tracing` layer and
//! as the `log` backend so records from either facade land in one place.

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Default number of lines kept in memory
pub const DEFAULT_CAPACITY: usize = 500;

/// A single captured log line
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>5} {}: {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.level,
            self.target,
            self.message
        )
    }
}

/// Destination for formatted lines (console, file, test collector...)
pub trait LogSink: Send + Sync + 'static {
    fn write(&self, line: &LogLine);
}

/// Sink that discards everything; the buffer still records lines
pub struct NullSink;

impl LogSink for NullSink {
    fn write(&self, _line: &LogLine) {}
}

#[derive(Debug, Error)]
pub enum InitError {
    #[error("a tracing subscriber is already installed")]
    TracingAlreadySet,
    #[error("a log backend is already installed")]
    LogAlreadySet,
}

/// Circular buffer of the most recent lines
#[derive(Clone)]
pub struct RollingBuffer {
    lines: Arc<Mutex<VecDeque<LogLine>>>,
    capacity: usize,
}

impl RollingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogLine>> {
        // A panic while holding the lock leaves the deque intact
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, line: LogLine) {
        let mut lines = self.lock();
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// All buffered lines, oldest first
    pub fn snapshot(&self) -> Vec<LogLine> {
        self.lock().iter().cloned().collect()
    }

    /// The last `n` lines, oldest first
    pub fn tail(&self, n: usize) -> Vec<LogLine> {
        let lines = self.lock();
        let skip = lines.len().saturating_sub(n);
        lines.iter().skip(skip).cloned().collect()
    }

    /// Buffered lines rendered one per row, for copy/paste into bug reports
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for line in self.lock().iter() {
            let _ = writeln!(out, "{}", line);
        }
        out
    }
}

/// Collects the `message` field plus any extra `key=value` fields of an event
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

impl MessageVisitor {
    fn finish(mut self) -> String {
        self.message.push_str(&self.fields);
        self.message
    }
}

/// `tracing` layer that records events into a [`RollingBuffer`]
pub struct RollingLayer {
    buffer: RollingBuffer,
    sink: Arc<dyn LogSink>,
    max_level: Level,
}

impl RollingLayer {
    pub fn new(buffer: RollingBuffer, sink: Arc<dyn LogSink>, max_level: Level) -> Self {
        Self { buffer, sink, max_level }
    }

    fn record(&self, line: LogLine) {
        self.sink.write(&line);
        self.buffer.push(line);
    }
}

impl<S: Subscriber> Layer<S> for RollingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        // More verbose levels compare greater
        if *meta.level() > self.max_level {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.record(LogLine {
            timestamp: Utc::now(),
            level: *meta.level(),
            target: meta.target().to_string(),
            message: visitor.finish(),
        });
    }
}

/// `log` backend writing into the same buffer and sink
pub struct LogBridge {
    buffer: RollingBuffer,
    sink: Arc<dyn LogSink>,
    max_level: log::LevelFilter,
}

impl LogBridge {
    pub fn new(buffer: RollingBuffer, sink: Arc<dyn LogSink>, max_level: Level) -> Self {
        Self { buffer, sink, max_level: to_log_filter(max_level) }
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = LogLine {
            timestamp: Utc::now(),
            level: from_log_level(record.level()),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };
        self.sink.write(&line);
        self.buffer.push(line);
    }

    fn flush(&self) {}
}

/// Parse a level name, falling back to INFO for anything unknown
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_ascii_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" | "warning" => Level::WARN,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    }
}

fn to_log_filter(level: Level) -> log::LevelFilter {
    match level {
        Level::ERROR => log::LevelFilter::Error,
        Level::WARN => log::LevelFilter::Warn,
        Level::INFO => log::LevelFilter::Info,
        Level::DEBUG => log::LevelFilter::Debug,
        Level::TRACE => log::LevelFilter::Trace,
    }
}

fn from_log_level(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::ERROR,
        log::Level::Warn => Level::WARN,
        log::Level::Info => Level::INFO,
        log::Level::Debug => Level::DEBUG,
        log::Level::Trace => Level::TRACE,
    }
}

/// Install the rolling logger as global `tracing` subscriber and `log` backend
pub fn init(capacity: usize, level: &str, sink: Arc<dyn LogSink>) -> Result<RollingBuffer, InitError> {
    let buffer = RollingBuffer::new(capacity);
    let max_level = parse_level(level);

    let layer = RollingLayer::new(buffer.clone(), sink.clone(), max_level);
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::set_global_default(subscriber).map_err(|_| InitError::TracingAlreadySet)?;

    let bridge: &'static LogBridge = Box::leak(Box::new(LogBridge::new(buffer.clone(), sink, max_level)));
    log::set_logger(bridge).map_err(|_| InitError::LogAlreadySet)?;
    log::set_max_level(to_log_filter(max_level));

    Ok(buffer)
}
