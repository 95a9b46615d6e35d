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

//! Machine inventory: imports a spreadsheet export of machines keyed by MAC
//! address into a local SQLite database and keeps an append-only history of
//! events per machine.
//!
//! Every operation on [`Inventory`] opens its own connection, runs one
//! transaction and closes the connection before returning.

use db::SqliteStore;

pub mod config;
pub mod display;
pub mod errors;
pub mod events;
pub mod importer;
pub mod machines;
pub mod source;

pub use config::Config;
pub use errors::{InventoryError, InventoryResult};

pub struct Inventory {
    store: SqliteStore,
    config: Config,
    delimiter: u8,
}

impl Inventory {
    pub fn new(config: Config) -> InventoryResult<Self> {
        let delimiter = config.delimiter_byte()?;
        let store = SqliteStore::open(&config.database_path, config.busy_timeout);
        Ok(Self {
            store,
            config,
            delimiter,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create the tables and indexes if they are missing and bring an older
    /// history table up to date. Safe to call on every startup.
    pub async fn ensure_schema(&self) -> InventoryResult<()> {
        self.store
            .with_txn(async |txn| db::schema::ensure_schema(txn).await)
            .await
            .map_err(InventoryError::Schema)
    }
}
