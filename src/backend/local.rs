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

//! # Local CSV Backend
//!
//! Writes a [`ZiDataFrame`] into a directory the way a distributed engine
//! does: one `part-NNNNN-<job>-c000.csv[.ext]` file per non-empty partition,
//! followed by an empty `_SUCCESS` marker once every partition is on disk.
//!
//! Partitions are written concurrently on a Rayon pool when the `parallel`
//! feature is enabled.
//!
//! ## Options
//!
//! | option | meaning |
//! |---|---|
//! | `sep` / `delimiter` | field separator, one byte |
//! | `quote` | quote character, one byte |
//! | `escape` | escape character; disables doubled quotes |
//! | `quoteAll` | quote every field |
//! | `nullValue` | text written for null cells |
//! | `lineSep` | `"\n"` or `"\r\n"` |
//!
//! Option names are case-insensitive. Anything else is logged and ignored.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::backend::{ZiBackendWriteRequest, ZiWriteBackend};
use crate::errors::{Result, ZiError};
use crate::frame::{ZiDataFrame, ZiRow};
use crate::log::ZiLogger;
use crate::request::{ZiCompression, ZiWriteMode, ZiWriteOptions};

/// Marker file written after all partitions succeed.
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Configuration for [`ZiLocalCsvBackend`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiLocalBackendConfig {
    /// Writer threads; defaults to the number of CPUs.
    pub parallelism: Option<usize>,
    /// Fixed job identifier used in partition file names. A fresh UUID is
    /// used for every write when unset.
    pub job_id: Option<String>,
    pub write_success_marker: bool,
}

impl Default for ZiLocalBackendConfig {
    fn default() -> Self {
        Self {
            parallelism: None,
            job_id: None,
            write_success_marker: true,
        }
    }
}

/// CSV dialect derived from the pass-through options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZiCsvFormat {
    pub delimiter: u8,
    pub quote: u8,
    pub escape: Option<u8>,
    pub quote_all: bool,
    pub null_value: String,
    pub crlf: bool,
}

impl Default for ZiCsvFormat {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            escape: None,
            quote_all: false,
            null_value: String::new(),
            crlf: false,
        }
    }
}

impl ZiCsvFormat {
    /// Reads the supported options; unknown ones are reported to `logger`.
    pub fn from_options(options: &ZiWriteOptions, logger: &ZiLogger) -> Result<Self> {
        let mut format = Self::default();
        for (key, value) in options {
            match key.to_ascii_lowercase().as_str() {
                "sep" | "delimiter" => format.delimiter = single_byte(key, value)?,
                "quote" => format.quote = single_byte(key, value)?,
                "escape" => format.escape = Some(single_byte(key, value)?),
                "quoteall" => format.quote_all = boolean(key, value)?,
                "nullvalue" => format.null_value = text(key, value)?,
                "linesep" => {
                    format.crlf = match text(key, value)?.as_str() {
                        "\n" => false,
                        "\r\n" => true,
                        other => {
                            return Err(ZiError::validation(format!(
                                "option '{}' must be \"\\n\" or \"\\r\\n\", got {:?}",
                                key, other
                            )))
                        }
                    }
                }
                _ => logger.debug(
                    "backend.option_ignored",
                    format!("Option '{}' is not used by the local backend", key),
                    json!({"option": key, "value": value}),
                ),
            }
        }
        Ok(format)
    }

    fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .quote_style(if self.quote_all {
                csv::QuoteStyle::Always
            } else {
                csv::QuoteStyle::Necessary
            })
            .terminator(if self.crlf {
                csv::Terminator::CRLF
            } else {
                csv::Terminator::Any(b'\n')
            });
        if let Some(escape) = self.escape {
            builder.double_quote(false).escape(escape);
        }
        builder
    }

    /// Text written for one cell.
    pub fn render<'a>(&'a self, cell: &'a Value) -> Cow<'a, str> {
        match cell {
            Value::String(s) => Cow::Borrowed(s.as_str()),
            Value::Null => Cow::Borrowed(self.null_value.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }
}

fn single_byte(key: &str, value: &Value) -> Result<u8> {
    match value.as_str().map(str::as_bytes) {
        Some([byte]) => Ok(*byte),
        _ => Err(ZiError::validation(format!(
            "option '{}' must be a single-byte string, got {}",
            key, value
        ))),
    }
}

fn boolean(key: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(ZiError::validation(format!(
            "option '{}' must be a boolean, got {}",
            key, value
        ))),
    }
}

fn text(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(_) | Value::Bool(_) => Ok(value.to_string()),
        _ => Err(ZiError::validation(format!(
            "option '{}' must be a string, got {}",
            key, value
        ))),
    }
}

fn ensure_supported(compression: ZiCompression) -> Result<()> {
    if cfg!(feature = "compression") || compression == ZiCompression::None {
        Ok(())
    } else {
        Err(ZiError::validation(format!(
            "compression '{}' requires the 'compression' feature",
            compression
        )))
    }
}

/// Output stream of one partition file.
enum ZiPartitionSink {
    Plain(BufWriter<File>),
    #[cfg(feature = "compression")]
    Gzip(flate2::write::GzEncoder<BufWriter<File>>),
    #[cfg(feature = "compression")]
    Deflate(flate2::write::DeflateEncoder<BufWriter<File>>),
    #[cfg(feature = "compression")]
    Zstd(zstd::Encoder<'static, BufWriter<File>>),
}

impl ZiPartitionSink {
    fn create(path: &Path, compression: ZiCompression) -> Result<Self> {
        let file = BufWriter::new(File::create(path)?);
        match compression {
            ZiCompression::None => Ok(ZiPartitionSink::Plain(file)),
            #[cfg(feature = "compression")]
            ZiCompression::Gzip => Ok(ZiPartitionSink::Gzip(flate2::write::GzEncoder::new(
                file,
                flate2::Compression::default(),
            ))),
            #[cfg(feature = "compression")]
            ZiCompression::Deflate => Ok(ZiPartitionSink::Deflate(
                flate2::write::DeflateEncoder::new(file, flate2::Compression::default()),
            )),
            #[cfg(feature = "compression")]
            ZiCompression::Zstd => Ok(ZiPartitionSink::Zstd(zstd::Encoder::new(file, 0)?)),
            #[cfg(not(feature = "compression"))]
            other => Err(ZiError::validation(format!(
                "compression '{}' requires the 'compression' feature",
                other
            ))),
        }
    }

    /// Writes codec trailers and flushes the file.
    fn finish(self) -> Result<()> {
        match self {
            ZiPartitionSink::Plain(mut w) => w.flush()?,
            #[cfg(feature = "compression")]
            ZiPartitionSink::Gzip(e) => e.finish()?.flush()?,
            #[cfg(feature = "compression")]
            ZiPartitionSink::Deflate(e) => e.finish()?.flush()?,
            #[cfg(feature = "compression")]
            ZiPartitionSink::Zstd(e) => e.finish()?.flush()?,
        }
        Ok(())
    }
}

impl Write for ZiPartitionSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ZiPartitionSink::Plain(w) => w.write(buf),
            #[cfg(feature = "compression")]
            ZiPartitionSink::Gzip(w) => w.write(buf),
            #[cfg(feature = "compression")]
            ZiPartitionSink::Deflate(w) => w.write(buf),
            #[cfg(feature = "compression")]
            ZiPartitionSink::Zstd(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ZiPartitionSink::Plain(w) => w.flush(),
            #[cfg(feature = "compression")]
            ZiPartitionSink::Gzip(w) => w.flush(),
            #[cfg(feature = "compression")]
            ZiPartitionSink::Deflate(w) => w.flush(),
            #[cfg(feature = "compression")]
            ZiPartitionSink::Zstd(w) => w.flush(),
        }
    }
}

/// Brings `frame` to exactly `n` partitions, borrowing when it already has them.
fn reduce(frame: &ZiDataFrame, n: usize) -> Result<Cow<'_, ZiDataFrame>> {
    let current = frame.num_partitions();
    if n == current {
        Ok(Cow::Borrowed(frame))
    } else if n < current {
        Ok(Cow::Owned(frame.coalesce(n)?))
    } else {
        Ok(Cow::Owned(frame.repartition(n)?))
    }
}

/// Partitioned CSV writer on the local filesystem.
#[derive(Debug, Default)]
pub struct ZiLocalCsvBackend {
    config: ZiLocalBackendConfig,
    logger: ZiLogger,
}

impl ZiLocalCsvBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ZiLocalBackendConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: ZiLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &ZiLocalBackendConfig {
        &self.config
    }

    fn write_partition(
        &self,
        dir: &Path,
        job_id: &str,
        index: usize,
        columns: &[String],
        rows: &[ZiRow],
        request: &ZiBackendWriteRequest,
        format: &ZiCsvFormat,
    ) -> Result<PathBuf> {
        let path = dir.join(format!(
            "part-{:05}-{}-c000.csv{}",
            index,
            job_id,
            request.compression.extension()
        ));

        let sink = ZiPartitionSink::create(&path, request.compression)?;
        let mut writer = format.writer_builder().from_writer(sink);
        if request.header {
            writer.write_record(columns)?;
        }
        for row in rows {
            writer.write_record(row.iter().map(|cell| format.render(cell).into_owned()))?;
        }
        let sink = writer
            .into_inner()
            .map_err(|e| ZiError::Csv(e.to_string()))?;
        sink.finish()?;

        self.logger.debug(
            "backend.partition_written",
            format!("Wrote partition {}", index),
            json!({"path": path.display().to_string(), "rows": rows.len()}),
        );
        Ok(path)
    }

    #[cfg(feature = "parallel")]
    fn write_partitions(
        &self,
        dir: &Path,
        job_id: &str,
        columns: &[String],
        work: &[(usize, &[ZiRow])],
        request: &ZiBackendWriteRequest,
        format: &ZiCsvFormat,
    ) -> Result<Vec<PathBuf>> {
        use rayon::prelude::*;

        let threads = self.config.parallelism.unwrap_or_else(num_cpus::get).max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| ZiError::backend(format!("failed to build writer pool: {}", e)))?;

        pool.install(|| {
            work.par_iter()
                .map(|&(index, rows)| {
                    self.write_partition(dir, job_id, index, columns, rows, request, format)
                })
                .collect()
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn write_partitions(
        &self,
        dir: &Path,
        job_id: &str,
        columns: &[String],
        work: &[(usize, &[ZiRow])],
        request: &ZiBackendWriteRequest,
        format: &ZiCsvFormat,
    ) -> Result<Vec<PathBuf>> {
        work.iter()
            .map(|&(index, rows)| {
                self.write_partition(dir, job_id, index, columns, rows, request, format)
            })
            .collect()
    }
}

impl ZiWriteBackend for ZiLocalCsvBackend {
    type Frame = ZiDataFrame;

    fn write_csv(&self, frame: &ZiDataFrame, dir: &Path, request: &ZiBackendWriteRequest) -> Result<()> {
        if request.num_partitions == 0 {
            return Err(ZiError::validation("number of partitions must be positive"));
        }
        if frame.columns().is_empty() {
            return Err(ZiError::validation("data frame has no columns"));
        }
        ensure_supported(request.compression)?;
        let format = ZiCsvFormat::from_options(&request.options, &self.logger)?;

        if dir.exists() {
            match ZiWriteMode::resolve(request.mode) {
                ZiWriteMode::Overwrite => {
                    if dir.is_dir() {
                        fs::remove_dir_all(dir)?;
                    } else {
                        fs::remove_file(dir)?;
                    }
                }
                ZiWriteMode::Append => {}
                ZiWriteMode::Ignore => {
                    self.logger.debug(
                        "backend.ignored",
                        "Output directory exists and mode is ignore",
                        json!({"dir": dir.display().to_string()}),
                    );
                    return Ok(());
                }
                ZiWriteMode::ErrorIfExists => return Err(ZiError::already_exists(dir)),
            }
        }
        fs::create_dir_all(dir)?;

        let frame = reduce(frame, request.num_partitions)?;
        let job_id = self
            .config
            .job_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut work: Vec<(usize, &[ZiRow])> = frame
            .partitions()
            .iter()
            .enumerate()
            .filter(|(_, rows)| !rows.is_empty())
            .map(|(index, rows)| (index, rows.as_slice()))
            .collect();
        if work.is_empty() {
            // An empty frame still yields one header-only file.
            let empty: &[ZiRow] = &[];
            work.push((0, empty));
        }

        self.write_partitions(dir, &job_id, frame.columns(), &work, request, &format)?;

        if self.config.write_success_marker {
            File::create(dir.join(SUCCESS_MARKER))?;
        }
        Ok(())
    }
}
