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

//! # Structured Logging Module
//!
//! Diagnostic events are sent to an injected [`ZiLogSink`] through a
//! [`ZiLogger`] handle. Nothing is global: the default logger discards every
//! event, and tests pass a [`ZiMemorySink`] to inspect what was emitted.
//!
//! ## Sinks
//!
//! - **ZiNoopSink**: Discards events (default)
//! - **ZiFacadeSink**: Forwards to the `log` crate under target `zi_onecsv`
//! - **ZiMemorySink**: Collects events in memory
//! - **ZiStderrSink**: Prints JSON or text lines filtered by [`ZiLogConfig`]

pub mod config;
pub mod core;
pub mod formatters;
pub mod handlers;

pub use self::config::ZiLogConfig;
pub use self::core::{
    ZiFacadeSink, ZiLogLevel, ZiLogRecord, ZiLogSink, ZiLogger, ZiMemorySink, ZiNoopSink,
    LOG_TARGET,
};
pub use self::formatters::{ZiJsonFormatter, ZiTextFormatter};
pub use self::handlers::ZiStderrSink;
