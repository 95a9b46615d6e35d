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

//! Creates the inventory tables and brings older databases up to date.
//!
//! Everything here is written to be run on every startup: tables and indexes
//! use `IF NOT EXISTS`, and each [`ColumnMigration`] first checks through
//! `pragma_table_info` whether its column is already there.

use sqlx::SqliteConnection;

use crate::{DatabaseError, DatabaseResult};

const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS machines (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        row_ordinal INTEGER,
        name TEXT,
        assigned_user TEXT,
        sector TEXT,
        floor TEXT,
        ip TEXT,
        mac TEXT UNIQUE NOT NULL,
        port TEXT,
        comment TEXT
    )",
    "CREATE TABLE IF NOT EXISTS machine_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        machine_id INTEGER NOT NULL,
        event TEXT,
        responsible TEXT,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        ip TEXT,
        mac TEXT,
        FOREIGN KEY(machine_id) REFERENCES machines(id) ON DELETE CASCADE
    )",
];

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_machines_ip ON machines(ip)",
    "CREATE INDEX IF NOT EXISTS idx_machine_history_machine_id ON machine_history(machine_id)",
];

/// An additive change to an existing table. Only ever adds a nullable column
/// (or one with a constant default), so it is safe on tables that already
/// hold rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMigration {
    pub table: &'static str,
    pub column: &'static str,
    pub sql_type: &'static str,
    pub default: Option<&'static str>,
}

impl ColumnMigration {
    fn alter_statement(&self) -> String {
        let mut statement = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            self.table, self.column, self.sql_type
        );
        if let Some(default) = self.default {
            statement.push_str(" DEFAULT ");
            statement.push_str(default);
        }
        statement
    }
}

/// History tables created before IP/MAC snapshots existed lack these columns.
/// Rows that predate the migration keep NULL in both.
pub const COLUMN_MIGRATIONS: &[ColumnMigration] = &[
    ColumnMigration {
        table: "machine_history",
        column: "ip",
        sql_type: "TEXT",
        default: None,
    },
    ColumnMigration {
        table: "machine_history",
        column: "mac",
        sql_type: "TEXT",
        default: None,
    },
];

/// Create any missing table or index and apply pending column migrations.
///
/// Run this inside a transaction: SQLite DDL is transactional, so a failure
/// half way leaves the database exactly as it was.
#[tracing::instrument(skip(txn))]
pub async fn ensure_schema(txn: &mut SqliteConnection) -> DatabaseResult<()> {
    for statement in CREATE_TABLES {
        sqlx::query(statement)
            .execute(&mut *txn)
            .await
            .map_err(|e| DatabaseError::query(statement, e))?;
    }

    for migration in COLUMN_MIGRATIONS {
        apply_column_migration(txn, migration).await?;
    }

    for statement in CREATE_INDEXES {
        sqlx::query(statement)
            .execute(&mut *txn)
            .await
            .map_err(|e| DatabaseError::query(statement, e))?;
    }

    Ok(())
}

/// Names of the columns of `table`, in declaration order. Empty if the table
/// does not exist.
pub async fn table_columns(
    txn: &mut SqliteConnection,
    table: &str,
) -> DatabaseResult<Vec<String>> {
    let query = "SELECT name FROM pragma_table_info(?) ORDER BY cid";
    sqlx::query_scalar(query)
        .bind(table)
        .fetch_all(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))
}

/// Returns whether the column had to be added.
async fn apply_column_migration(
    txn: &mut SqliteConnection,
    migration: &ColumnMigration,
) -> DatabaseResult<bool> {
    let columns = table_columns(txn, migration.table).await?;
    if columns
        .iter()
        .any(|column| column.eq_ignore_ascii_case(migration.column))
    {
        return Ok(false);
    }

    let statement = migration.alter_statement();
    sqlx::query(&statement)
        .execute(&mut *txn)
        .await
        .map_err(|e| DatabaseError::query(&statement, e))?;
    tracing::info!(
        table = migration.table,
        column = migration.column,
        "Added missing column"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use sqlx::Connection;
    use sqlx_testing::TestDatabase;

    use super::*;

    const LEGACY_HISTORY_TABLE: &str = "CREATE TABLE machine_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        machine_id INTEGER NOT NULL,
        event TEXT,
        responsible TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY(machine_id) REFERENCES machines(id) ON DELETE CASCADE
    )";

    async fn index_names(conn: &mut SqliteConnection) -> Vec<String> {
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'index' ORDER BY name")
            .fetch_all(conn)
            .await
            .unwrap()
    }

    #[test]
    fn test_alter_statement() {
        let migration = ColumnMigration {
            table: "machine_history",
            column: "note",
            sql_type: "TEXT",
            default: Some("''"),
        };
        assert_eq!(
            migration.alter_statement(),
            "ALTER TABLE machine_history ADD COLUMN note TEXT DEFAULT ''"
        );
        assert_eq!(
            COLUMN_MIGRATIONS[0].alter_statement(),
            "ALTER TABLE machine_history ADD COLUMN ip TEXT"
        );
    }

    #[tokio::test]
    async fn ensure_schema_creates_tables_and_indexes() {
        let db = TestDatabase::empty().await;
        let mut conn = db.connect().await;

        ensure_schema(&mut conn).await.unwrap();

        assert_eq!(
            table_columns(&mut conn, "machines").await.unwrap(),
            vec![
                "id",
                "row_ordinal",
                "name",
                "assigned_user",
                "sector",
                "floor",
                "ip",
                "mac",
                "port",
                "comment"
            ]
        );
        assert_eq!(
            table_columns(&mut conn, "machine_history").await.unwrap(),
            vec![
                "id",
                "machine_id",
                "event",
                "responsible",
                "created_at",
                "ip",
                "mac"
            ]
        );
        let indexes = index_names(&mut conn).await;
        assert!(indexes.contains(&"idx_machines_ip".to_string()));
        assert!(indexes.contains(&"idx_machine_history_machine_id".to_string()));
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let db = TestDatabase::new().await;
        let mut conn = db.connect().await;

        sqlx::query("INSERT INTO machines (mac, name) VALUES ('AA:BB:CC:DD:EE:FF', 'PC1')")
            .execute(&mut conn)
            .await
            .unwrap();

        ensure_schema(&mut conn).await.unwrap();
        ensure_schema(&mut conn).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM machines")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            table_columns(&mut conn, "machine_history")
                .await
                .unwrap()
                .len(),
            7
        );
    }

    #[tokio::test]
    async fn ensure_schema_adds_snapshot_columns_to_legacy_history() {
        let db = TestDatabase::empty().await;
        let mut conn = db.connect().await;

        sqlx::query(CREATE_TABLES[0])
            .execute(&mut conn)
            .await
            .unwrap();
        sqlx::query(LEGACY_HISTORY_TABLE)
            .execute(&mut conn)
            .await
            .unwrap();
        sqlx::query("INSERT INTO machines (mac, ip) VALUES ('AA:BB:CC:DD:EE:FF', '10.0.0.1')")
            .execute(&mut conn)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO machine_history (machine_id, event, responsible) VALUES (1, 'Disk swap', 'Igor')",
        )
        .execute(&mut conn)
        .await
        .unwrap();

        let mut txn = conn.begin().await.unwrap();
        ensure_schema(&mut txn).await.unwrap();
        txn.commit().await.unwrap();

        let columns = table_columns(&mut conn, "machine_history").await.unwrap();
        assert!(columns.contains(&"ip".to_string()));
        assert!(columns.contains(&"mac".to_string()));

        let (event, ip, mac): (String, Option<String>, Option<String>) =
            sqlx::query_as("SELECT event, ip, mac FROM machine_history")
                .fetch_one(&mut conn)
                .await
                .unwrap();
        assert_eq!(event, "Disk swap");
        assert_eq!(ip, None);
        assert_eq!(mac, None);
    }

    #[tokio::test]
    async fn ensure_schema_rolls_back_with_transaction() {
        let db = TestDatabase::empty().await;
        let mut conn = db.connect().await;

        let mut txn = conn.begin().await.unwrap();
        ensure_schema(&mut txn).await.unwrap();
        txn.rollback().await.unwrap();

        assert!(table_columns(&mut conn, "machines").await.unwrap().is_empty());
        assert!(index_names(&mut conn).await.is_empty());
    }
}
