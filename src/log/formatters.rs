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

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::log::core::ZiLogRecord;

pub struct ZiJsonFormatter;

impl ZiJsonFormatter {
    pub fn format(record: &ZiLogRecord) -> String {
        record.to_json().to_string()
    }
}

/// `<time> - <LEVEL> - <message> <fields>`
pub struct ZiTextFormatter;

impl ZiTextFormatter {
    pub fn format(record: &ZiLogRecord) -> String {
        let time: DateTime<Local> = record.timestamp.into();
        let mut line = format!(
            "{} - {} - {}",
            time.format("%Y-%m-%d %H:%M:%S,%3f"),
            record.level.as_str(),
            record.message
        );
        if !record.fields.is_empty() {
            line.push(' ');
            line.push_str(&Value::Object(record.fields.clone()).to_string());
        }
        line
    }
}
