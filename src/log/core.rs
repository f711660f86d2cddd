//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Map, Value};

/// Target used when records are forwarded to the `log` facade.
pub const LOG_TARGET: &str = "zi_onecsv";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZiLogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl ZiLogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZiLogLevel::Debug => "DEBUG",
            ZiLogLevel::Info => "INFO",
            ZiLogLevel::Warning => "WARNING",
            ZiLogLevel::Error => "ERROR",
        }
    }

    /// Parses a level name, falling back to `Info` for anything unknown.
    pub fn parse(s: &str) -> ZiLogLevel {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => ZiLogLevel::Debug,
            "WARNING" | "WARN" => ZiLogLevel::Warning,
            "ERROR" => ZiLogLevel::Error,
            _ => ZiLogLevel::Info,
        }
    }
}

/// One structured diagnostic event.
#[derive(Clone, Debug)]
pub struct ZiLogRecord {
    pub level: ZiLogLevel,
    pub event: String,
    pub message: String,
    pub fields: Map<String, Value>,
    pub timestamp: SystemTime,
}

impl ZiLogRecord {
    pub fn to_json(&self) -> Value {
        let ts = self
            .timestamp
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        let mut data = Map::new();
        data.insert("level".into(), json!(self.level.as_str()));
        data.insert("event".into(), json!(self.event));
        data.insert("message".into(), json!(self.message));
        data.insert("timestamp_ms".into(), json!(ts));
        data.insert("fields".into(), Value::Object(self.fields.clone()));
        Value::Object(data)
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Destination for diagnostic events.
pub trait ZiLogSink: Send + Sync {
    fn emit(&self, record: ZiLogRecord);

    /// Lets a sink skip building records it would discard.
    fn enabled(&self, _level: ZiLogLevel) -> bool {
        true
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZiNoopSink;

impl ZiLogSink for ZiNoopSink {
    fn emit(&self, _record: ZiLogRecord) {}

    fn enabled(&self, _level: ZiLogLevel) -> bool {
        false
    }
}

fn facade_level(level: ZiLogLevel) -> ::log::Level {
    match level {
        ZiLogLevel::Debug => ::log::Level::Debug,
        ZiLogLevel::Info => ::log::Level::Info,
        ZiLogLevel::Warning => ::log::Level::Warn,
        ZiLogLevel::Error => ::log::Level::Error,
    }
}

/// Forwards records to the `log` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZiFacadeSink;

impl ZiLogSink for ZiFacadeSink {
    fn emit(&self, record: ZiLogRecord) {
        let level = facade_level(record.level);
        if record.fields.is_empty() {
            ::log::log!(target: LOG_TARGET, level, "[{}] {}", record.event, record.message);
        } else {
            ::log::log!(
                target: LOG_TARGET,
                level,
                "[{}] {} {}",
                record.event,
                record.message,
                Value::Object(record.fields)
            );
        }
    }

    fn enabled(&self, level: ZiLogLevel) -> bool {
        ::log::log_enabled!(target: LOG_TARGET, facade_level(level))
    }
}

/// Keeps every record in memory, mostly for assertions in tests.
#[derive(Debug, Default)]
pub struct ZiMemorySink {
    records: Mutex<Vec<ZiLogRecord>>,
}

impl ZiMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ZiLogRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Event names in emission order.
    pub fn events(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.event).collect()
    }

    pub fn find(&self, event: &str) -> Option<ZiLogRecord> {
        self.records().into_iter().find(|r| r.event == event)
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl ZiLogSink for ZiMemorySink {
    fn emit(&self, record: ZiLogRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}

/// Cheap, cloneable handle to an injected sink.
///
/// The default logger discards everything.
#[derive(Clone)]
pub struct ZiLogger {
    sink: Arc<dyn ZiLogSink>,
}

impl Default for ZiLogger {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for ZiLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiLogger").finish_non_exhaustive()
    }
}

impl ZiLogger {
    pub fn new(sink: Arc<dyn ZiLogSink>) -> Self {
        Self { sink }
    }

    pub fn noop() -> Self {
        Self::new(Arc::new(ZiNoopSink))
    }

    /// Logger backed by the `log` facade.
    pub fn facade() -> Self {
        Self::new(Arc::new(ZiFacadeSink))
    }

    /// Emits a structured event. Object `fields` become the record's fields;
    /// any other non-null value is stored under `value`.
    pub fn event(&self, level: ZiLogLevel, event: &str, message: impl Into<String>, fields: Value) {
        if !self.sink.enabled(level) {
            return;
        }
        let fields = match fields {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".into(), other);
                map
            }
        };
        self.sink.emit(ZiLogRecord {
            level,
            event: event.to_string(),
            message: message.into(),
            fields,
            timestamp: SystemTime::now(),
        });
    }

    pub fn debug(&self, event: &str, message: impl Into<String>, fields: Value) {
        self.event(ZiLogLevel::Debug, event, message, fields);
    }

    pub fn info(&self, event: &str, message: impl Into<String>, fields: Value) {
        self.event(ZiLogLevel::Info, event, message, fields);
    }

    pub fn warn(&self, event: &str, message: impl Into<String>, fields: Value) {
        self.event(ZiLogLevel::Warning, event, message, fields);
    }

    pub fn error(&self, event: &str, message: impl Into<String>, fields: Value) {
        self.event(ZiLogLevel::Error, event, message, fields);
    }
}
