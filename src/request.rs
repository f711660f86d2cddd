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

//! # Write Request Module
//!
//! Describes one single-file write: destination, write mode, compression
//! codec, header flag and the pass-through options handed to the backend.
//!
//! Requests are plain serde types, so they can be built in code or loaded
//! from JSON or YAML:
//!
//! ```yaml
//! path: /project/data/out.csv.gz
//! mode: overwrite
//! compression: gzip
//! header: true
//! options:
//!   sep: ";"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::{Result, ZiError};

/// Pass-through writer options, keyed by the backend's option names.
pub type ZiWriteOptions = BTreeMap<String, Value>;

/// Policy applied when the destination already exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZiWriteMode {
    /// Replace the existing file.
    Overwrite,
    /// Refused against an existing file.
    Append,
    /// Leave the existing file alone and return.
    Ignore,
    /// Fail when the destination exists.
    #[serde(rename = "error", alias = "errorifexists")]
    ErrorIfExists,
}

impl ZiWriteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZiWriteMode::Overwrite => "overwrite",
            ZiWriteMode::Append => "append",
            ZiWriteMode::Ignore => "ignore",
            ZiWriteMode::ErrorIfExists => "error",
        }
    }

    /// Resolves an optional mode; an absent mode behaves like `ErrorIfExists`.
    pub fn resolve(mode: Option<ZiWriteMode>) -> ZiWriteMode {
        mode.unwrap_or(ZiWriteMode::ErrorIfExists)
    }
}

impl fmt::Display for ZiWriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZiWriteMode {
    type Err = ZiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(ZiWriteMode::Overwrite),
            "append" => Ok(ZiWriteMode::Append),
            "ignore" => Ok(ZiWriteMode::Ignore),
            "error" | "errorifexists" => Ok(ZiWriteMode::ErrorIfExists),
            other => Err(ZiError::validation(format!("unknown write mode '{}'", other))),
        }
    }
}

/// Compression codec applied to partition files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZiCompression {
    /// Plain text output.
    #[serde(alias = "uncompressed")]
    None,
    /// GZIP (RFC 1952).
    #[default]
    Gzip,
    /// Raw DEFLATE (RFC 1951).
    Deflate,
    /// Zstandard.
    Zstd,
}

impl ZiCompression {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZiCompression::None => "none",
            ZiCompression::Gzip => "gzip",
            ZiCompression::Deflate => "deflate",
            ZiCompression::Zstd => "zstd",
        }
    }

    /// File name suffix appended after `.csv` for this codec.
    pub fn extension(&self) -> &'static str {
        match self {
            ZiCompression::None => "",
            ZiCompression::Gzip => ".gz",
            ZiCompression::Deflate => ".deflate",
            ZiCompression::Zstd => ".zst",
        }
    }
}

impl fmt::Display for ZiCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZiCompression {
    type Err = ZiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "uncompressed" | "" => Ok(ZiCompression::None),
            "gzip" | "gz" => Ok(ZiCompression::Gzip),
            "deflate" => Ok(ZiCompression::Deflate),
            "zstd" | "zst" => Ok(ZiCompression::Zstd),
            other => Err(ZiError::validation(format!(
                "unsupported compression codec '{}'",
                other
            ))),
        }
    }
}

fn default_mode() -> Option<ZiWriteMode> {
    Some(ZiWriteMode::Overwrite)
}

fn default_header() -> bool {
    true
}

/// A null codec means uncompressed output.
fn null_as_uncompressed<'de, D>(deserializer: D) -> std::result::Result<ZiCompression, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ZiCompression>::deserialize(deserializer)?.unwrap_or(ZiCompression::None))
}

/// A single-file write request.
///
/// Defaults differ from a plain partitioned write: the mode is `overwrite`,
/// output is gzip-compressed, and a header row is written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiWriteRequest {
    /// Full path of the resulting file, including its extension.
    pub path: PathBuf,
    /// Write mode. `None` behaves like `error`.
    #[serde(default = "default_mode")]
    pub mode: Option<ZiWriteMode>,
    /// Compression codec. Missing means gzip; null means none.
    #[serde(default, deserialize_with = "null_as_uncompressed")]
    pub compression: ZiCompression,
    /// Whether to write a header row.
    #[serde(default = "default_header")]
    pub header: bool,
    /// Additional backend options, forwarded unmodified.
    #[serde(default)]
    pub options: ZiWriteOptions,
}

impl ZiWriteRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: default_mode(),
            compression: ZiCompression::default(),
            header: default_header(),
            options: ZiWriteOptions::new(),
        }
    }

    pub fn with_mode(mut self, mode: ZiWriteMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Clears the mode so the request behaves like `error`.
    pub fn without_mode(mut self) -> Self {
        self.mode = None;
        self
    }

    pub fn with_compression(mut self, compression: ZiCompression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Adds a pass-through option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The mode after resolving an absent value.
    pub fn effective_mode(&self) -> ZiWriteMode {
        ZiWriteMode::resolve(self.mode)
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(input)?)
    }
}
