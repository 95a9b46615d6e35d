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

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use inventory::{Config, Inventory};
use sqlx_testing::TestDatabase;
use tempfile::NamedTempFile;

pub const HEADER: &str = "Linha,Nome,Usuário,Setor,Andar,IP,Endereço MAC,Ponto,Comentario";

/// An [`Inventory`] on its own throwaway database.
pub struct TestInventory {
    pub inventory: Inventory,
    pub db: TestDatabase,
}

impl TestInventory {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Like [`TestInventory::new`], letting the caller adjust the config. The
    /// database path is always the test database's.
    pub async fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let db = TestDatabase::new().await;
        let mut config = Config::default();
        adjust(&mut config);
        config.database_path = db.path().to_path_buf();
        let inventory = Inventory::new(config).expect("test config is valid");
        Self { inventory, db }
    }

    /// Runs one statement on a separate connection, e.g. to install a trigger.
    pub async fn execute(&self, sql: &str) {
        let mut conn = self.db.connect().await;
        sqlx::query(sql).execute(&mut conn).await.unwrap();
    }

    pub async fn machine_count(&self) -> i64 {
        let mut conn = self.db.connect().await;
        db::machine::count(&mut conn).await.unwrap()
    }

    pub async fn event_count(&self) -> i64 {
        let mut conn = self.db.connect().await;
        db::machine_history::count(&mut conn).await.unwrap()
    }

    pub async fn import_str(&self, data: &str) -> usize {
        self.inventory
            .import_reader(data.as_bytes(), "test.csv")
            .await
            .unwrap()
    }
}

/// Writes `data` to a temporary CSV file, kept alive by the returned handle.
pub fn csv_file(data: &[u8]) -> (NamedTempFile, PathBuf) {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    let path = file.path().to_path_buf();
    (file, path)
}
