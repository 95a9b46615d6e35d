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
use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};

use crate::{DatabaseError, DatabaseResult};

/// Hands out one SQLite connection per unit of work. A SqliteStore keeps no
/// connection open between calls: [`SqliteStore::with_txn`] opens a connection,
/// runs a single transaction on it and closes it again on every exit path.
///
/// Foreign keys are switched on for every connection, which is what makes the
/// `ON DELETE CASCADE` from machines to their history take effect.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    options: SqliteConnectOptions,
}

impl SqliteStore {
    pub fn open(path: &Path, busy_timeout: Duration) -> Self {
        SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .busy_timeout(busy_timeout)
            .into()
    }

    pub fn path(&self) -> &Path {
        self.options.get_filename()
    }

    pub async fn connect(&self) -> DatabaseResult<SqliteConnection> {
        self.options
            .connect()
            .await
            .map_err(|source| DatabaseError::Connect {
                path: self.path().display().to_string(),
                source,
            })
    }

    /// Closes `conn`. Failing to close is logged, not returned: by the time we
    /// get here the unit of work has either been committed or rolled back.
    pub async fn release(&self, conn: SqliteConnection) {
        if let Err(e) = conn.close().await {
            tracing::warn!(
                path = %self.path().display(),
                error = %e,
                "Failed to close database connection"
            );
        }
    }

    /// Runs `f` inside a transaction on a fresh connection. The transaction is
    /// committed if `f` returns `Ok` and rolled back otherwise. The connection
    /// is closed before returning in either case.
    pub async fn with_txn<T, E>(
        &self,
        f: impl AsyncFnOnce(&mut SqliteConnection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<DatabaseError>,
    {
        let mut conn = self.connect().await?;
        let result = run_in_txn(&mut conn, f).await;
        self.release(conn).await;
        result
    }
}

async fn run_in_txn<T, E>(
    conn: &mut SqliteConnection,
    f: impl AsyncFnOnce(&mut SqliteConnection) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<DatabaseError>,
{
    let mut txn = conn.begin().await.map_err(DatabaseError::begin)?;
    match f(&mut *txn).await {
        Ok(output) => {
            txn.commit().await.map_err(DatabaseError::commit)?;
            Ok(output)
        }
        Err(e) => {
            txn.rollback().await.ok();
            Err(e)
        }
    }
}

impl From<SqliteConnectOptions> for SqliteStore {
    fn from(options: SqliteConnectOptions) -> Self {
        Self {
            options: options.foreign_keys(true),
        }
    }
}
