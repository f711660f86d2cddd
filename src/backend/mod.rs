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

//! # Write Backend Module
//!
//! A write backend is the engine that turns a data frame into a directory of
//! partition files (`part-*`) plus marker files such as `_SUCCESS`. The
//! single-file writer only ever talks to it through [`ZiWriteBackend`].
//!
//! ## Implementations
//!
//! - **ZiLocalCsvBackend** ([local.rs](local/index.html)): Writes a
//!   [`ZiDataFrame`](crate::frame::ZiDataFrame) to the local filesystem,
//!   one CSV file per partition

pub mod local;

use std::path::Path;

use crate::errors::Result;
use crate::request::{ZiCompression, ZiWriteMode, ZiWriteOptions, ZiWriteRequest};

pub use local::{ZiCsvFormat, ZiLocalBackendConfig, ZiLocalCsvBackend, SUCCESS_MARKER};

/// Parameters of one partitioned write.
#[derive(Clone, Debug, PartialEq)]
pub struct ZiBackendWriteRequest {
    /// Number of partitions to reduce the frame to before writing.
    pub num_partitions: usize,
    /// Directory-level write mode.
    pub mode: Option<ZiWriteMode>,
    pub compression: ZiCompression,
    pub header: bool,
    /// Engine-specific options, untouched.
    pub options: ZiWriteOptions,
}

impl ZiBackendWriteRequest {
    /// Forwards a single-file request, asking for exactly one partition.
    pub fn single_partition(request: &ZiWriteRequest) -> Self {
        Self {
            num_partitions: 1,
            mode: request.mode,
            compression: request.compression,
            header: request.header,
            options: request.options.clone(),
        }
    }
}

/// Engine that writes a frame into a directory of partition files.
pub trait ZiWriteBackend {
    /// Data frame handle understood by this backend.
    type Frame: ?Sized;

    /// Writes `frame` as CSV partitions under `dir`.
    fn write_csv(&self, frame: &Self::Frame, dir: &Path, request: &ZiBackendWriteRequest) -> Result<()>;
}

impl<B: ZiWriteBackend + ?Sized> ZiWriteBackend for &B {
    type Frame = B::Frame;

    fn write_csv(&self, frame: &Self::Frame, dir: &Path, request: &ZiBackendWriteRequest) -> Result<()> {
        (**self).write_csv(frame, dir, request)
    }
}
