/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

use std::io::Read;
use std::path::Path;

use crate::source::TabularSource;
use crate::{Inventory, InventoryError, InventoryResult};

impl Inventory {
    /// Import the spreadsheet export at `path`, inserting new machines and
    /// replacing every attribute of machines whose MAC is already known.
    ///
    /// Returns the number of rows applied. Rows without a MAC are skipped and
    /// not counted. The import is all-or-nothing: if any row fails, nothing
    /// from this call is kept.
    #[tracing::instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn import_source(&self, path: &Path) -> InventoryResult<usize> {
        // Opening reads the header row, so a missing or unreadable file is
        // reported before the database is touched.
        let source = TabularSource::open(path, self.delimiter, &self.config.columns)?;
        self.import(source).await
    }

    /// Same as [`Inventory::import_source`], reading the export from `reader`.
    /// `name` identifies the source in errors and logs.
    #[tracing::instrument(skip(self, reader))]
    pub async fn import_reader<R: Read>(&self, reader: R, name: &str) -> InventoryResult<usize> {
        let source = TabularSource::from_reader(reader, name, self.delimiter, &self.config.columns)?;
        self.import(source).await
    }

    async fn import<R: Read>(&self, mut source: TabularSource<R>) -> InventoryResult<usize> {
        let (applied, skipped) = self
            .store
            .with_txn(async |txn| -> InventoryResult<(usize, usize)> {
                let mut applied = 0;
                let mut skipped = 0;
                for row in source.rows() {
                    let row = row?;
                    if row.machine.mac.is_empty() {
                        tracing::debug!(line = row.line, "Skipping row without MAC address");
                        skipped += 1;
                        continue;
                    }
                    if !model::mac::is_well_formed(&row.machine.mac) {
                        tracing::warn!(
                            line = row.line,
                            mac = %row.machine.mac,
                            "MAC address is not a six octet address; importing it as is"
                        );
                    }
                    db::machine::upsert(txn, &row.machine)
                        .await
                        .map_err(|e| {
                            InventoryError::from_database(
                                e,
                                format!("line {} (MAC {})", row.line, row.machine.mac),
                            )
                        })?;
                    applied += 1;
                }
                Ok((applied, skipped))
            })
            .await?;

        tracing::info!(
            source = source.name(),
            applied,
            skipped,
            "Imported machines"
        );
        Ok(applied)
    }
}
