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

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::core::ZiLogLevel;

/// Configuration for the console sink: level threshold and line format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiLogConfig {
    pub level: String,
    pub json_format: bool,
}

impl Default for ZiLogConfig {
    fn default() -> Self {
        ZiLogConfig {
            level: "INFO".to_string(),
            json_format: false,
        }
    }
}

impl ZiLogConfig {
    pub fn threshold(&self) -> ZiLogLevel {
        ZiLogLevel::parse(&self.level)
    }

    pub fn should_log(&self, level: ZiLogLevel) -> bool {
        level >= self.threshold()
    }

    /// Reads a config from JSON, keeping defaults for missing or invalid input.
    pub fn from_json(value: &Value) -> ZiLogConfig {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}
