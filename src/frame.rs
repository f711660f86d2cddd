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

//! # Data Frame Module
//!
//! An in-memory, partitioned table used by the local write backend. Each
//! partition is a list of rows and each row holds one JSON value per column.
//!
//! Partitioning follows the usual engine rules:
//!
//! - `coalesce(n)` merges adjacent partitions and never increases their number
//! - `repartition(n)` redistributes rows round-robin and can grow or shrink
//!
//! Both keep every row exactly once.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{Result, ZiError};

/// One row of cells, aligned with the frame's columns.
pub type ZiRow = Vec<Value>;

/// A partitioned table of JSON cells.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZiDataFrame {
    columns: Vec<String>,
    partitions: Vec<Vec<ZiRow>>,
}

impl ZiDataFrame {
    /// Builds a frame and spreads `rows` over `num_partitions` contiguous slices.
    ///
    /// Every row must have one cell per column.
    pub fn from_rows(columns: Vec<String>, rows: Vec<ZiRow>, num_partitions: usize) -> Result<Self> {
        if num_partitions == 0 {
            return Err(ZiError::validation("number of partitions must be positive"));
        }
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(ZiError::validation(format!(
                "row {} has {} cells but the frame has {} columns",
                idx,
                row.len(),
                columns.len()
            )));
        }

        let total = rows.len();
        let mut partitions: Vec<Vec<ZiRow>> = Vec::with_capacity(num_partitions);
        let mut iter = rows.into_iter();
        for idx in 0..num_partitions {
            let len = total / num_partitions + usize::from(idx < total % num_partitions);
            partitions.push(iter.by_ref().take(len).collect());
        }

        Ok(Self {
            columns,
            partitions,
        })
    }

    /// Generates `rows` rows of seeded random integers.
    ///
    /// Columns are `ID`, `COLUMN_ONE`, `COLUMN_TWO` and `COLUMN_THREE`; the
    /// numbered columns fall in `[k * rows, (k + 1) * rows)`.
    pub fn sample(rows: usize, num_partitions: usize, seed: u64) -> Result<Self> {
        let columns = ["ID", "COLUMN_ONE", "COLUMN_TWO", "COLUMN_THREE"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let mut rng = SmallRng::seed_from_u64(seed);
        let span = rows.max(1) as u64;
        let data = (0..rows as u64)
            .map(|id| {
                let mut row = vec![json!(id)];
                for k in 1..=3u64 {
                    row.push(json!(k * span + rng.gen_range(0..span)));
                }
                row
            })
            .collect();
        Self::from_rows(columns, data, num_partitions)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    pub fn partitions(&self) -> &[Vec<ZiRow>] {
        &self.partitions
    }

    /// Total number of rows across partitions.
    pub fn count(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    /// Rows in partition order.
    pub fn rows(&self) -> impl Iterator<Item = &ZiRow> {
        self.partitions.iter().flatten()
    }

    /// Merges adjacent partitions down to at most `n`.
    ///
    /// Asking for more partitions than exist leaves the frame unchanged.
    pub fn coalesce(&self, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(ZiError::validation("number of partitions must be positive"));
        }
        let current = self.partitions.len();
        if n >= current {
            return Ok(self.clone());
        }

        let mut partitions: Vec<Vec<ZiRow>> = vec![Vec::new(); n];
        for (idx, part) in self.partitions.iter().enumerate() {
            // Contiguous groups: partition idx lands in bucket idx * n / current.
            partitions[idx * n / current].extend(part.iter().cloned());
        }
        Ok(Self {
            columns: self.columns.clone(),
            partitions,
        })
    }

    /// Redistributes rows round-robin over exactly `n` partitions.
    pub fn repartition(&self, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(ZiError::validation("number of partitions must be positive"));
        }
        let mut partitions: Vec<Vec<ZiRow>> = vec![Vec::new(); n];
        for (idx, row) in self.rows().enumerate() {
            partitions[idx % n].push(row.clone());
        }
        Ok(Self {
            columns: self.columns.clone(),
            partitions,
        })
    }
}
