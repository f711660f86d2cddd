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

//! # Zi OneCSV
//!
//! Writes a partitioned data frame as exactly one CSV file instead of the
//! directory of `part-*` files a distributed write produces, so the output
//! shows up as a single dataset artifact.
//!
//! ## Module Overview
//!
//! - **writer**: [`ZiSingleFileWriter`], mode dispatch and consolidation
//! - **backend**: The [`ZiWriteBackend`] trait and the local CSV backend
//! - **frame**: [`ZiDataFrame`], an in-memory partitioned table
//! - **request**: Write modes, compression codecs and [`ZiWriteRequest`]
//! - **fs**: The [`ZiFileSystem`] trait and its `std::fs` implementation
//! - **log**: Injected structured logging, no-op by default
//! - **errors**: [`ZiError`] and the crate-wide `Result`
//!
//! ## Feature Flags
//!
//! - `parallel`: Writes partition files concurrently with Rayon
//! - `compression`: Enables gzip, deflate and zstd output
//! - `full`: Enables all features (default)
//!
//! ## Quick Start
//!
//! ```rust
//! use zi_onecsv::{write_one_csv, ZiDataFrame, ZiWriteMode, ZiWriteRequest};
//!
//! let frame = ZiDataFrame::sample(1_000, 10, 123)?;
//! let request = ZiWriteRequest::new("/project/data/sample.csv.gz")
//!     .with_mode(ZiWriteMode::Overwrite);
//! let report = write_one_csv(&frame, &request)?;
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, ZiError>`. Errors raised by a backend are
//! returned unchanged; the only suppressed case is `ignore` against an
//! existing file, which reports [`ZiWriteReport::Skipped`].

pub mod backend;
pub mod errors;
pub mod frame;
pub mod fs;
pub mod log;
pub mod request;
pub mod writer;

pub use backend::{
    ZiBackendWriteRequest, ZiCsvFormat, ZiLocalBackendConfig, ZiLocalCsvBackend, ZiWriteBackend,
    SUCCESS_MARKER,
};
pub use errors::{Result, ZiError};
pub use frame::{ZiDataFrame, ZiRow};
pub use fs::{ZiFileSystem, ZiLocalFileSystem};
pub use self::log::{ZiLogConfig, ZiLogLevel, ZiLogRecord, ZiLogSink, ZiLogger, ZiMemorySink};
pub use request::{ZiCompression, ZiWriteMode, ZiWriteOptions, ZiWriteRequest};
pub use writer::{write_one_csv, ZiPartitionSet, ZiSingleFileWriter, ZiWriterConfig, ZiWriteReport};
