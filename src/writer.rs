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

//! # Single-File Writer Module
//!
//! A partitioned write normally produces a directory of `part-*` files plus
//! marker files. [`ZiSingleFileWriter`] turns that into exactly one file at
//! the requested path:
//!
//! 1. If the destination exists, the write mode decides what happens:
//!    `append` fails, `ignore` returns without doing anything, `error` (or an
//!    absent mode) fails, `overwrite` carries on.
//! 2. The backend writes the frame, reduced to one partition, into a scratch
//!    directory named by a random UUID next to the destination.
//! 3. The single `part*` file is moved to the destination and the scratch
//!    directory is removed.
//!
//! When the scratch directory holds zero or several partition files the call
//! fails and the directory is left in place for inspection.
//!
//! Nothing here guards against two writers targeting the same destination at
//! once: both may pass the existence check before either moves its file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::backend::{ZiBackendWriteRequest, ZiLocalCsvBackend, ZiWriteBackend};
use crate::errors::{Result, ZiError};
use crate::frame::ZiDataFrame;
use crate::fs::{ZiFileSystem, ZiLocalFileSystem};
use crate::log::ZiLogger;
use crate::request::{ZiWriteMode, ZiWriteRequest};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Configuration for [`ZiSingleFileWriter`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiWriterConfig {
    /// Name prefix identifying partition files in the scratch directory.
    pub partition_prefix: String,
    /// Where scratch directories are created. Defaults to the destination's
    /// parent directory.
    pub temp_dir_parent: Option<PathBuf>,
}

impl Default for ZiWriterConfig {
    fn default() -> Self {
        Self {
            partition_prefix: "part".to_string(),
            temp_dir_parent: None,
        }
    }
}

/// Outcome of a successful call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZiWriteReport {
    /// The file at `path` now holds the frame's data.
    Written { path: PathBuf, bytes: u64 },
    /// The destination existed under `ignore`; nothing was touched.
    Skipped { path: PathBuf },
}

impl ZiWriteReport {
    pub fn path(&self) -> &Path {
        match self {
            ZiWriteReport::Written { path, .. } | ZiWriteReport::Skipped { path } => path,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, ZiWriteReport::Written { .. })
    }
}

/// Partition files found in a scratch directory after a backend write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZiPartitionSet {
    temp_dir: PathBuf,
    files: Vec<PathBuf>,
}

impl ZiPartitionSet {
    /// Lists files in `temp_dir` whose names start with `prefix`.
    ///
    /// A missing directory yields an empty set.
    pub fn discover(fs: &dyn ZiFileSystem, temp_dir: &Path, prefix: &str) -> Result<Self> {
        let files = if fs.exists(temp_dir) {
            fs.list_files(temp_dir)?
                .into_iter()
                .filter(|path| {
                    path.file_name()
                        .map(|name| name.to_string_lossy().starts_with(prefix))
                        .unwrap_or(false)
                })
                .collect()
        } else {
            Vec::new()
        };
        Ok(Self {
            temp_dir: temp_dir.to_path_buf(),
            files,
        })
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The only partition file, or the error matching the count.
    pub fn into_single(mut self) -> Result<PathBuf> {
        match self.files.len() {
            1 => Ok(self.files.remove(0)),
            0 => Err(ZiError::BackendWriteFailure {
                temp_dir: self.temp_dir,
            }),
            count => Err(ZiError::PartitionReductionFailure {
                count,
                temp_dir: self.temp_dir,
            }),
        }
    }
}

/// Writes a data frame as exactly one file.
#[derive(Debug)]
pub struct ZiSingleFileWriter<B, F = ZiLocalFileSystem> {
    backend: B,
    fs: F,
    config: ZiWriterConfig,
    logger: ZiLogger,
}

impl<B: ZiWriteBackend> ZiSingleFileWriter<B> {
    /// Writer over the local filesystem with a no-op logger.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            fs: ZiLocalFileSystem,
            config: ZiWriterConfig::default(),
            logger: ZiLogger::noop(),
        }
    }
}

impl<B: ZiWriteBackend, F: ZiFileSystem> ZiSingleFileWriter<B, F> {
    /// Replaces the filesystem implementation.
    pub fn with_file_system<G: ZiFileSystem>(self, fs: G) -> ZiSingleFileWriter<B, G> {
        ZiSingleFileWriter {
            backend: self.backend,
            fs,
            config: self.config,
            logger: self.logger,
        }
    }

    pub fn with_config(mut self, config: ZiWriterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: ZiLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &ZiWriterConfig {
        &self.config
    }

    /// Fresh scratch directory path for a write to `destination`.
    pub fn temp_path_for(&self, destination: &Path) -> PathBuf {
        let parent = match &self.config.temp_dir_parent {
            Some(dir) => dir.as_path(),
            None => destination.parent().unwrap_or_else(|| Path::new("")),
        };
        parent.join(Uuid::new_v4().to_string())
    }

    /// Writes `frame` to `request.path` as a single file.
    pub fn write(&self, frame: &B::Frame, request: &ZiWriteRequest) -> Result<ZiWriteReport> {
        let path = request.path();
        self.logger.debug(
            "write.arguments",
            "Function arguments",
            json!({
                "path": path.display().to_string(),
                "mode": request.mode.map(|m| m.as_str()),
                "compression": request.compression.as_str(),
                "header": request.header,
                "options": request.options,
            }),
        );

        if self.fs.exists(path) {
            self.logger.info(
                "write.exists",
                "File already exists.",
                json!({"path": path.display().to_string()}),
            );
            match request.effective_mode() {
                ZiWriteMode::Append => {
                    return Err(ZiError::UnsupportedOperation {
                        path: path.to_path_buf(),
                    })
                }
                ZiWriteMode::Ignore => {
                    self.logger.info(
                        "write.ignored",
                        "File exists but mode set to \"ignore\". No action taken.",
                        json!({"path": path.display().to_string()}),
                    );
                    return Ok(ZiWriteReport::Skipped {
                        path: path.to_path_buf(),
                    });
                }
                ZiWriteMode::ErrorIfExists => return Err(ZiError::already_exists(path)),
                ZiWriteMode::Overwrite => {
                    if self.fs.is_dir(path) {
                        return Err(ZiError::validation(format!(
                            "path {} is a directory and cannot be overwritten by a single file",
                            path.display()
                        )));
                    }
                    self.logger.info(
                        "write.overwrite",
                        "Existing file will be overwritten.",
                        json!({"path": path.display().to_string()}),
                    );
                }
            }
        }

        let temp_dir = self.temp_path_for(path);
        self.logger.debug(
            "write.temp_path",
            "Temporary path",
            json!({"temp_dir": temp_dir.display().to_string()}),
        );

        self.backend
            .write_csv(frame, &temp_dir, &ZiBackendWriteRequest::single_partition(request))?;

        let parts = ZiPartitionSet::discover(&self.fs, &temp_dir, &self.config.partition_prefix)?;
        self.logger.debug(
            "write.partitions",
            "Partitions",
            json!({
                "count": parts.len(),
                "files": parts
                    .files()
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>(),
            }),
        );

        let part = parts.into_single()?;
        self.logger.debug(
            "write.moved",
            "Single-partition output file found. Moving and renaming ...",
            json!({"from": part.display().to_string(), "to": path.display().to_string()}),
        );
        self.fs.move_file(&part, path)?;

        let bytes = self.fs.file_size(path)?;
        let size_mb = bytes as f64 / BYTES_PER_MB;
        self.logger.info(
            "write.completed",
            format!(
                "The file {} ({:.1} MB) is now available as a single CSV file.",
                path.display(),
                size_mb
            ),
            json!({"path": path.display().to_string(), "bytes": bytes, "size_mb": size_mb}),
        );

        self.fs.remove_tree(&temp_dir)?;

        Ok(ZiWriteReport::Written {
            path: path.to_path_buf(),
            bytes,
        })
    }
}

/// Writes `frame` to one CSV file with the local backend, logging through
/// the `log` facade.
pub fn write_one_csv(frame: &ZiDataFrame, request: &ZiWriteRequest) -> Result<ZiWriteReport> {
    let logger = ZiLogger::facade();
    ZiSingleFileWriter::new(ZiLocalCsvBackend::new().with_logger(logger.clone()))
        .with_logger(logger)
        .write(frame, request)
}
