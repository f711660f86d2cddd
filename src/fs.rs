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

//! # Filesystem Module
//!
//! The filesystem operations the single-file writer relies on, behind a
//! trait so tests can observe or replace them.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::Result;

/// `EXDEV` on Linux and macOS; rename cannot cross mount points.
const CROSS_DEVICE_ERRNO: i32 = 18;

/// Filesystem operations used during consolidation.
pub trait ZiFileSystem: Send + Sync {
    /// Whether anything (file or directory) exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Regular files directly inside `dir`, sorted by name.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Moves `from` to `to`, replacing an existing file at `to`.
    fn move_file(&self, from: &Path, to: &Path) -> Result<()>;

    /// Recursively deletes `dir`.
    fn remove_tree(&self, dir: &Path) -> Result<()>;

    fn file_size(&self, path: &Path) -> Result<u64>;
}

macro_rules! forward_file_system {
    ($($ty:ty),*) => {$(
        impl<T: ZiFileSystem + ?Sized> ZiFileSystem for $ty {
            fn exists(&self, path: &Path) -> bool {
                (**self).exists(path)
            }

            fn is_dir(&self, path: &Path) -> bool {
                (**self).is_dir(path)
            }

            fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
                (**self).list_files(dir)
            }

            fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
                (**self).move_file(from, to)
            }

            fn remove_tree(&self, dir: &Path) -> Result<()> {
                (**self).remove_tree(dir)
            }

            fn file_size(&self, path: &Path) -> Result<u64> {
                (**self).file_size(path)
            }
        }
    )*};
}

forward_file_system!(&T, Box<T>, Arc<T>);

/// `std::fs` backed implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZiLocalFileSystem;

impl ZiLocalFileSystem {
    pub fn new() -> Self {
        ZiLocalFileSystem
    }
}

impl ZiFileSystem for ZiLocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err) if err.raw_os_error() == Some(CROSS_DEVICE_ERRNO) => {
                fs::copy(from, to)?;
                fs::remove_file(from)?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn remove_tree(&self, dir: &Path) -> Result<()> {
        fs::remove_dir_all(dir)?;
        Ok(())
    }

    fn file_size(&self, path: &Path) -> Result<u64> {
        Ok(fs::metadata(path)?.len())
    }
}
