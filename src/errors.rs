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

//! # Zi OneCSV Error Module
//!
//! This module defines the error type returned by every fallible operation in
//! the crate.
//!
//! ## Error Categories
//!
//! - **UnsupportedOperation**: Appending to an existing single file
//! - **AlreadyExists**: Destination present under the error mode
//! - **BackendWriteFailure**: The backend produced no partition file
//! - **PartitionReductionFailure**: The backend produced several partition files
//! - **Backend**: Failures raised by a write backend, propagated unchanged
//! - **Io / Csv / Serde**: Wrapped library errors
//! - **Validation**: Invalid parameters or option values
//!
//! The two partition-count variants carry the scratch directory, which is left
//! on disk so its contents can be inspected.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ZiError>;

/// Canonical error enumeration for the single-file writer.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ZiError {
    /// Appending to an existing single file is not supported.
    #[error("path {} already exists; appending to an existing file is not supported", path.display())]
    UnsupportedOperation { path: PathBuf },

    /// The destination exists and the mode does not allow replacing it.
    #[error("path file:{} already exists", path.display())]
    AlreadyExists { path: PathBuf },

    /// The backend finished without producing any partition file.
    #[error(
        "no partition files found in {}; something went wrong writing the partitioned data frame",
        temp_dir.display()
    )]
    BackendWriteFailure { temp_dir: PathBuf },

    /// The backend produced more than one partition file.
    #[error(
        "found {count} partition files in {}; data frame was not successfully reduced to a single partition",
        temp_dir.display()
    )]
    PartitionReductionFailure { count: usize, temp_dir: PathBuf },

    /// Failure raised by a write backend implementation.
    #[error("backend error: {message}")]
    Backend { message: String },

    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Errors raised by the CSV serializer.
    #[error("csv error: {0}")]
    Csv(String),

    /// Wrapper for JSON/YAML serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },
}

impl From<io::Error> for ZiError {
    fn from(err: io::Error) -> Self {
        ZiError::Io(err.to_string())
    }
}

impl From<csv::Error> for ZiError {
    fn from(err: csv::Error) -> Self {
        ZiError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for ZiError {
    fn from(err: serde_json::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for ZiError {
    fn from(err: serde_yaml::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl ZiError {
    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        ZiError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct backend errors.
    pub fn backend<T: Into<String>>(message: T) -> Self {
        ZiError::Backend {
            message: message.into(),
        }
    }

    pub fn already_exists(path: impl Into<PathBuf>) -> Self {
        ZiError::AlreadyExists { path: path.into() }
    }

    /// Scratch directory retained by a partition-count failure, if any.
    pub fn retained_temp_dir(&self) -> Option<&PathBuf> {
        match self {
            ZiError::BackendWriteFailure { temp_dir } => Some(temp_dir),
            ZiError::PartitionReductionFailure { temp_dir, .. } => Some(temp_dir),
            _ => None,
        }
    }
}
