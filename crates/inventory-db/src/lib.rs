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

//! Database functions for the machine inventory. Functions in the table
//! modules take a `&mut SqliteConnection` (usually a transaction) and leave
//! connection and transaction scope to the caller, see [`SqliteStore`].

use sqlx::error::ErrorKind;

pub mod machine;
pub mod machine_history;
pub mod schema;
mod sqlite_store;

pub use sqlite_store::SqliteStore;

pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[derive(thiserror::Error, Debug)]
pub enum DatabaseError {
    #[error("Could not open database {path}: {source}")]
    Connect { path: String, source: sqlx::Error },
    #[error("Database query failed: {query}: {source}")]
    Query { query: String, source: sqlx::Error },
    #[error("Could not {action} transaction: {source}")]
    Transaction {
        action: &'static str,
        source: sqlx::Error,
    },
}

impl DatabaseError {
    pub fn query(query: &str, source: sqlx::Error) -> Self {
        Self::Query {
            query: query.trim().to_string(),
            source,
        }
    }

    pub fn begin(source: sqlx::Error) -> Self {
        Self::Transaction {
            action: "begin",
            source,
        }
    }

    pub fn commit(source: sqlx::Error) -> Self {
        Self::Transaction {
            action: "commit",
            source,
        }
    }

    /// Whether the database rejected a statement because of a UNIQUE, NOT NULL,
    /// FOREIGN KEY or CHECK constraint.
    pub fn is_constraint_violation(&self) -> bool {
        let source = match self {
            Self::Connect { source, .. }
            | Self::Query { source, .. }
            | Self::Transaction { source, .. } => source,
        };
        match source {
            sqlx::Error::Database(e) => matches!(
                e.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            ),
            _ => false,
        }
    }
}
