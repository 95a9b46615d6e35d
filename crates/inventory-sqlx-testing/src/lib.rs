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

//! Throwaway SQLite databases for tests. Every [`TestDatabase`] lives in its own
//! temporary directory, which is removed when the value is dropped, so tests
//! never share state and can run in parallel.

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use tempfile::TempDir;

static DB_FILE_NAME: &str = "inventory_test.db";

pub struct TestDatabase {
    // Held so the directory outlives every connection handed out.
    _dir: TempDir,
    path: PathBuf,
}

impl TestDatabase {
    /// A database with the inventory schema already in place.
    pub async fn new() -> Self {
        let test_db = Self::empty().await;
        let mut conn = test_db.connect().await;
        let mut txn = conn
            .begin()
            .await
            .expect("failed to begin schema transaction");
        db::schema::ensure_schema(&mut txn)
            .await
            .expect("cannot create schema in test database");
        txn.commit().await.expect("failed to commit test schema");
        conn.close()
            .await
            .expect("failed to close setup connection");
        test_db
    }

    /// A database file with no tables at all, for exercising schema creation
    /// and migrations.
    pub async fn empty() -> Self {
        let dir = tempfile::tempdir().expect("failed to create test database directory");
        let path = dir.path().join(DB_FILE_NAME);
        let test_db = Self { _dir: dir, path };
        // Touch the file so every later connection sees the same database.
        test_db
            .connect()
            .await
            .close()
            .await
            .expect("failed to close setup connection");
        test_db
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Connection options equivalent to what the inventory uses in production.
    pub fn connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
            .foreign_keys(true)
    }

    pub async fn connect(&self) -> SqliteConnection {
        self.connect_options()
            .connect()
            .await
            .expect("failed to connect to test database")
    }
}
