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

use std::io::Write;
use std::sync::Mutex;

use crate::log::config::ZiLogConfig;
use crate::log::core::{ZiLogLevel, ZiLogRecord, ZiLogSink};
use crate::log::formatters::{ZiJsonFormatter, ZiTextFormatter};

/// Writes formatted lines to stderr, filtered by the configured level.
pub struct ZiStderrSink {
    config: ZiLogConfig,
    lock: Mutex<()>,
}

impl ZiStderrSink {
    pub fn new(config: ZiLogConfig) -> Self {
        ZiStderrSink {
            config,
            lock: Mutex::new(()),
        }
    }

    fn render(&self, record: &ZiLogRecord) -> String {
        if self.config.json_format {
            ZiJsonFormatter::format(record)
        } else {
            ZiTextFormatter::format(record)
        }
    }
}

impl ZiLogSink for ZiStderrSink {
    fn emit(&self, record: ZiLogRecord) {
        if !self.config.should_log(record.level) {
            return;
        }
        let line = self.render(&record);
        // Keep lines from concurrent writers whole.
        let _guard = self.lock.lock();
        let _ = writeln!(std::io::stderr().lock(), "{}", line);
    }

    fn enabled(&self, level: ZiLogLevel) -> bool {
        self.config.should_log(level)
    }
}
